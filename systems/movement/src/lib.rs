#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that advances the actor once per tick.

use std::time::Duration;

use iso_room_core::{
    ActorSnapshot, CellCoord, Command, Event, Facing, GridPosition, MotionMode, NavigationView,
    PathPlan,
};
use tracing::trace;

/// Outcome of advancing the actor by one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionStep {
    /// Position after the step.
    pub position: GridPosition,
    /// Facing after the step.
    pub facing: Facing,
    /// Motion mode that remains active after the step.
    pub mode: MotionMode,
}

impl MotionStep {
    fn unchanged(actor: &ActorSnapshot) -> Self {
        Self {
            position: actor.position,
            facing: actor.facing,
            mode: actor.mode.clone(),
        }
    }
}

/// Advances the actor by `dt` at `speed` cells per second.
///
/// Held directions move in a straight line clamped to the interior and only
/// commit when the destination rounds to a walkable cell; the facing turns
/// toward the held direction either way. Paths interpolate between nodes and
/// snap to the final node once progress runs out.
#[must_use]
pub fn advance(
    actor: &ActorSnapshot,
    dt: Duration,
    speed: f32,
    navigation: NavigationView<'_>,
) -> MotionStep {
    let (columns, rows) = navigation.dimensions();
    if columns < 3 || rows < 3 {
        return MotionStep::unchanged(actor);
    }

    let distance = speed * dt.as_secs_f32();
    match &actor.mode {
        MotionMode::Idle => MotionStep::unchanged(actor),
        MotionMode::HeldDirection(direction) => {
            held_step(actor, *direction, distance, columns, rows, navigation)
        }
        MotionMode::FollowingPath(plan) => path_step(actor, plan, distance),
    }
}

fn held_step(
    actor: &ActorSnapshot,
    direction: Facing,
    distance: f32,
    columns: u32,
    rows: u32,
    navigation: NavigationView<'_>,
) -> MotionStep {
    let (column_offset, row_offset) = direction.offset();
    let column = (actor.position.column() + column_offset as f32 * distance)
        .clamp(1.0, (columns - 2) as f32);
    let row = (actor.position.row() + row_offset as f32 * distance).clamp(1.0, (rows - 2) as f32);
    let candidate = GridPosition::new(column, row);

    let position = if candidate
        .nearest_cell()
        .is_some_and(|cell| navigation.is_walkable(cell))
    {
        candidate
    } else {
        trace!(?direction, "held step blocked");
        actor.position
    };

    MotionStep {
        position,
        facing: direction,
        mode: actor.mode.clone(),
    }
}

fn path_step(actor: &ActorSnapshot, plan: &PathPlan, distance: f32) -> MotionStep {
    let nodes = plan.nodes();
    let progress = plan.progress() + distance;
    let last_segment = plan.segment_count();

    if progress >= last_segment as f32 {
        return MotionStep {
            position: plan.destination().to_position(),
            facing: actor.facing,
            mode: MotionMode::Idle,
        };
    }

    let segment = (progress.floor() as usize).min(last_segment - 1);
    let fraction = progress - segment as f32;
    let from = nodes[segment];
    let to = nodes[segment + 1];
    let (column_delta, row_delta) = delta(from, to);

    MotionStep {
        position: GridPosition::new(
            from.column() as f32 + column_delta * fraction,
            from.row() as f32 + row_delta * fraction,
        ),
        facing: Facing::from_delta(column_delta, row_delta).unwrap_or(actor.facing),
        mode: MotionMode::FollowingPath(plan.clone().with_progress(progress)),
    }
}

fn delta(from: CellCoord, to: CellCoord) -> (f32, f32) {
    (
        to.column() as f32 - from.column() as f32,
        to.row() as f32 - from.row() as f32,
    )
}

/// Pure system that turns elapsed time into committed actor motion.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Emits one [`Command::CommitMotion`] for the time advanced in `events`.
    ///
    /// Nothing is emitted while the actor is idle or when no time passed.
    pub fn handle(
        &mut self,
        events: &[Event],
        actor: &ActorSnapshot,
        navigation: NavigationView<'_>,
        speed: f32,
        out: &mut Vec<Command>,
    ) {
        let dt: Duration = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .sum();

        if dt.is_zero() || !actor.mode.is_moving() {
            return;
        }

        let step = advance(actor, dt, speed, navigation);
        out.push(Command::CommitMotion {
            position: step.position,
            facing: step.facing,
            mode: step.mode,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room(columns: u32, rows: u32) -> Vec<bool> {
        (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |column| {
                    column > 0 && row > 0 && column + 1 < columns && row + 1 < rows
                })
            })
            .collect()
    }

    fn actor(position: GridPosition, mode: MotionMode) -> ActorSnapshot {
        ActorSnapshot {
            position,
            facing: Facing::South,
            mode,
        }
    }

    #[test]
    fn idle_actor_stays_put() {
        let cells = open_room(6, 6);
        let idle = actor(GridPosition::new(2.0, 2.0), MotionMode::Idle);

        let step = advance(
            &idle,
            Duration::from_millis(40),
            4.0,
            NavigationView::new(&cells, 6, 6),
        );

        assert_eq!(step, MotionStep::unchanged(&idle));
    }

    #[test]
    fn held_direction_moves_along_its_axis() {
        let cells = open_room(8, 8);
        let held = actor(
            GridPosition::new(2.0, 2.0),
            MotionMode::HeldDirection(Facing::East),
        );

        let step = advance(
            &held,
            Duration::from_millis(250),
            2.0,
            NavigationView::new(&cells, 8, 8),
        );

        assert_eq!(step.position, GridPosition::new(2.5, 2.0));
        assert_eq!(step.facing, Facing::East);
        assert_eq!(step.mode, MotionMode::HeldDirection(Facing::East));
    }

    #[test]
    fn held_direction_clamps_to_interior() {
        let cells = open_room(6, 6);
        let held = actor(
            GridPosition::new(1.2, 3.0),
            MotionMode::HeldDirection(Facing::West),
        );

        let step = advance(
            &held,
            Duration::from_secs(1),
            5.0,
            NavigationView::new(&cells, 6, 6),
        );

        assert_eq!(step.position, GridPosition::new(1.0, 3.0));
    }

    #[test]
    fn tiny_grids_leave_actor_untouched() {
        let cells = [true; 4];
        let held = actor(
            GridPosition::new(1.0, 1.0),
            MotionMode::HeldDirection(Facing::North),
        );

        let step = advance(
            &held,
            Duration::from_millis(50),
            3.0,
            NavigationView::new(&cells, 2, 2),
        );

        assert_eq!(step, MotionStep::unchanged(&held));
    }

    #[test]
    fn path_interpolates_within_current_segment() {
        let plan = PathPlan::new(vec![
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
            CellCoord::new(2, 2),
        ])
        .expect("plan");
        let walker = actor(
            GridPosition::new(1.0, 1.0),
            MotionMode::FollowingPath(plan.clone().with_progress(0.75)),
        );
        let cells = open_room(5, 5);

        let step = advance(
            &walker,
            Duration::from_millis(500),
            1.0,
            NavigationView::new(&cells, 5, 5),
        );

        assert_eq!(step.position, GridPosition::new(2.0, 1.25));
        assert_eq!(step.facing, Facing::South);
        assert_eq!(
            step.mode,
            MotionMode::FollowingPath(plan.with_progress(1.25))
        );
    }

    #[test]
    fn movement_ignores_batches_without_time() {
        let cells = open_room(5, 5);
        let held = actor(
            GridPosition::new(2.0, 2.0),
            MotionMode::HeldDirection(Facing::North),
        );
        let mut movement = Movement::default();
        let mut commands = Vec::new();

        movement.handle(
            &[Event::FacingChanged {
                facing: Facing::North,
            }],
            &held,
            NavigationView::new(&cells, 5, 5),
            3.0,
            &mut commands,
        );

        assert!(commands.is_empty());
    }
}
