//! Per-frame tick pipeline wiring the room, its systems and the HUD.

use std::time::Duration;

use iso_room_core::{dispatch, Command, Event, Facing};
use iso_room_rendering::{
    AvatarPresentation, CollectiblePresentation, FrameInput, FurniturePresentation,
    HotspotIndicator, HudPresentation, Outfit, RenderingError, RoomPresentation, Scene,
};
use iso_room_system_interaction::Interaction;
use iso_room_system_movement::Movement;
use iso_room_system_pathfinding::WalkPlanner;
use iso_room_world::{self as world, query, Room};

use crate::hud::Hud;

/// Owns the room together with the systems that drive it.
#[derive(Debug)]
pub(crate) struct Simulation {
    room: Room,
    walk_planner: WalkPlanner,
    movement: Movement,
    interaction: Interaction,
    hud: Hud,
    held_direction: Option<Facing>,
}

impl Simulation {
    /// Creates a simulation around a freshly mounted room.
    pub(crate) fn new(room: Room) -> Self {
        Self {
            room,
            walk_planner: WalkPlanner::default(),
            movement: Movement::default(),
            interaction: Interaction::default(),
            hud: Hud::default(),
            held_direction: None,
        }
    }

    /// Builds the initial scene for the room at the requested zoom.
    pub(crate) fn scene(&self, zoom: f32) -> Result<Scene, RenderingError> {
        let (columns, rows) = query::navigation_view(&self.room).dimensions();
        let (tile_width, tile_height) = query::tile_size(&self.room);
        let presentation = RoomPresentation::new(columns, rows, tile_width, tile_height, zoom)?;

        let mut scene = Scene::new(presentation, self.avatar_presentation());
        self.populate_scene(&mut scene);
        Ok(scene)
    }

    /// Runs one frame: input, tick, systems, then scene refresh.
    pub(crate) fn frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        self.advance(dt, &input);
        scene.animation_time += dt.as_secs_f32();
        self.populate_scene(scene);
    }

    fn advance(&mut self, dt: Duration, input: &FrameInput) {
        let mut commands = self.input_commands(input);
        commands.push(Command::Tick { dt });

        while !commands.is_empty() {
            let events = self.apply_all(&mut commands);

            let mut motion = Vec::new();
            self.movement.handle(
                &events,
                &query::actor(&self.room),
                query::navigation_view(&self.room),
                query::speed(&self.room),
                &mut motion,
            );
            let _ = self.apply_all(&mut motion);

            self.interaction.handle(
                &events,
                query::actor(&self.room).position,
                &query::hotspot_view(&self.room),
                &query::collectible_view(&self.room),
                query::active_hotspot(&self.room),
                query::pickup_radius(&self.room),
                &mut commands,
            );
        }
    }

    fn input_commands(&mut self, input: &FrameInput) -> Vec<Command> {
        let mut commands = Vec::new();

        if input.held_direction != self.held_direction {
            match (input.held_direction, self.held_direction) {
                (Some(direction), _) => commands.push(Command::HoldDirection { direction }),
                (None, Some(direction)) => commands.push(Command::ReleaseDirection { direction }),
                (None, None) => {}
            }
            self.held_direction = input.held_direction;
        }

        self.walk_planner.handle(
            input.click_cell,
            &query::actor(&self.room),
            query::navigation_view(&self.room),
            &mut commands,
        );

        if input.interact {
            commands.push(Command::Interact);
        }

        commands
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands.drain(..) {
            world::apply(&mut self.room, command, &mut events);
        }
        dispatch(&events, &mut self.hud);
        events
    }

    fn avatar_presentation(&self) -> AvatarPresentation {
        let actor = query::actor(&self.room);
        let avatar = query::avatar(&self.room);
        AvatarPresentation {
            position: actor.position,
            facing: actor.facing,
            moving: actor.mode.is_moving(),
            outfit: Outfit {
                shirt: avatar.shirt.into(),
                pants: avatar.pants.into(),
                hair: avatar.hair.into(),
            },
            name: avatar.name.clone(),
        }
    }

    fn populate_scene(&self, scene: &mut Scene) {
        let position = query::actor(&self.room).position;

        scene.furniture = query::furniture(&self.room)
            .iter()
            .map(|piece| FurniturePresentation {
                kind: piece.kind,
                cell: piece.cell,
            })
            .collect();
        scene.collectibles = query::collectible_view(&self.room)
            .iter()
            .map(|coin| CollectiblePresentation {
                cell: coin.anchor,
                value: coin.value,
            })
            .collect();
        scene.indicators = query::hotspot_view(&self.room)
            .iter()
            .map(|hotspot| HotspotIndicator {
                anchor: hotspot.anchor,
                label: hotspot.label.clone(),
                near: position.distance_to_cell(hotspot.anchor) < hotspot.radius,
            })
            .collect();
        scene.avatar = self.avatar_presentation();
        scene.hud = HudPresentation {
            score: self.hud.score(),
            prompt: self.hud.prompt(),
            player_name: scene.avatar.name.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iso_room_core::{GridPosition, HotspotId, MotionMode};
    use iso_room_system_bootstrap::lobby;

    const FRAME: Duration = Duration::from_millis(16);

    fn lobby_simulation() -> (Simulation, Scene) {
        let simulation = Simulation::new(Room::new(&lobby()).expect("lobby mounts"));
        let scene = simulation.scene(1.0).expect("valid zoom");
        (simulation, scene)
    }

    fn click(column: i32, row: i32) -> FrameInput {
        FrameInput {
            click_cell: Some((column, row)),
            ..FrameInput::default()
        }
    }

    fn run(simulation: &mut Simulation, scene: &mut Scene, frames: usize, input: &FrameInput) {
        for _ in 0..frames {
            simulation.frame(FRAME, input.clone(), scene);
        }
    }

    #[test]
    fn spawning_inside_a_hotspot_shows_its_prompt() {
        let (mut simulation, mut scene) = lobby_simulation();

        run(&mut simulation, &mut scene, 1, &FrameInput::default());

        assert_eq!(
            query::active_hotspot(&simulation.room),
            Some(HotspotId::new(1))
        );
        assert_eq!(scene.hud.prompt.as_deref(), Some("Press E to view Skills"));
        let near: Vec<&str> = scene
            .indicators
            .iter()
            .filter(|indicator| indicator.near)
            .map(|indicator| indicator.label.as_str())
            .collect();
        assert_eq!(near, vec!["Skills"]);
    }

    #[test]
    fn clicking_a_cell_walks_the_actor_there() {
        let (mut simulation, mut scene) = lobby_simulation();

        simulation.frame(FRAME, click(10, 7), &mut scene);
        assert!(scene.avatar.moving);
        run(&mut simulation, &mut scene, 60, &FrameInput::default());

        let actor = query::actor(&simulation.room);
        assert_eq!(actor.position, GridPosition::new(10.0, 7.0));
        assert_eq!(actor.mode, MotionMode::Idle);
        assert!(!scene.avatar.moving);
    }

    #[test]
    fn walking_onto_a_coin_scores_it_once() {
        let (mut simulation, mut scene) = lobby_simulation();

        simulation.frame(FRAME, click(9, 8), &mut scene);
        run(&mut simulation, &mut scene, 90, &FrameInput::default());

        assert_eq!(scene.hud.score, 5);
        assert_eq!(scene.collectibles.len(), 9);
        assert!(scene
            .collectibles
            .iter()
            .all(|coin| coin.cell != iso_room_core::CellCoord::new(9, 8)));
    }

    #[test]
    fn walking_away_clears_the_prompt() {
        let (mut simulation, mut scene) = lobby_simulation();

        simulation.frame(FRAME, click(11, 8), &mut scene);
        run(&mut simulation, &mut scene, 120, &FrameInput::default());

        assert_eq!(query::active_hotspot(&simulation.room), None);
        assert_eq!(scene.hud.prompt, None);
        assert!(scene.indicators.iter().all(|indicator| !indicator.near));
    }

    #[test]
    fn held_direction_moves_until_released() {
        let (mut simulation, mut scene) = lobby_simulation();
        let east = FrameInput {
            held_direction: Some(Facing::East),
            ..FrameInput::default()
        };

        run(&mut simulation, &mut scene, 20, &east);
        let moved = query::actor(&simulation.room);
        assert!(moved.position.column() > 8.5);
        assert_eq!(moved.position.row(), 7.0);
        assert_eq!(moved.facing, Facing::East);

        run(&mut simulation, &mut scene, 1, &FrameInput::default());
        let stopped = query::actor(&simulation.room);
        assert_eq!(stopped.mode, MotionMode::Idle);

        run(&mut simulation, &mut scene, 10, &FrameInput::default());
        assert_eq!(query::actor(&simulation.room).position, stopped.position);
    }

    #[test]
    fn clicks_are_ignored_while_a_direction_is_held() {
        let (mut simulation, mut scene) = lobby_simulation();
        let input = FrameInput {
            held_direction: Some(Facing::South),
            click_cell: Some((15, 7)),
            interact: false,
        };

        simulation.frame(FRAME, input, &mut scene);

        assert_eq!(
            query::actor(&simulation.room).mode,
            MotionMode::HeldDirection(Facing::South)
        );
    }

    #[test]
    fn scene_mirrors_the_room() {
        let (_, scene) = lobby_simulation();

        assert_eq!(scene.furniture.len(), 5);
        assert_eq!(scene.collectibles.len(), 10);
        assert_eq!(scene.indicators.len(), 5);
        assert_eq!(scene.avatar.name, "Guest");
        assert_eq!(scene.hud.player_name, "Guest");
        assert_eq!(scene.hud.score, 0);
    }
}
