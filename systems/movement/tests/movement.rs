use std::time::Duration;

use iso_room_core::{
    CellCoord, Command, Event, Facing, GridPosition, MotionMode, RoomDefinition, SpawnDefinition,
};
use iso_room_system_movement::{advance, Movement};
use iso_room_world::{self as world, query, Room};

fn room_with_obstacle() -> Room {
    room_spawning_at(GridPosition::new(3.0, 2.0))
}

fn room_spawning_at(position: GridPosition) -> Room {
    let mut definition = RoomDefinition::new("Movement", 10, 8, 54.0, 27.0);
    definition.obstacles = vec![CellCoord::new(4, 2)];
    definition.spawn = SpawnDefinition {
        position,
        facing: Facing::South,
    };
    definition.speed = 4.0;
    Room::new(&definition).expect("valid room")
}

/// Applies the command and lets movement react until the event stream settles.
fn step(room: &mut Room, movement: &mut Movement, command: Command) -> Vec<Event> {
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(room, command, &mut events);

    while !events.is_empty() {
        log.extend(events.iter().cloned());
        let mut commands = Vec::new();
        movement.handle(
            &events,
            &query::actor(room),
            query::navigation_view(room),
            query::speed(room),
            &mut commands,
        );

        events.clear();
        for command in commands {
            world::apply(room, command, &mut events);
        }
    }

    log
}

fn tick(room: &mut Room, movement: &mut Movement, millis: u64) -> Vec<Event> {
    step(
        room,
        movement,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
    )
}

#[test]
fn held_move_into_blocked_cell_keeps_position_and_turns() {
    let mut room = room_spawning_at(GridPosition::new(3.4, 2.0));
    let mut movement = Movement::default();
    let _ = step(
        &mut room,
        &mut movement,
        Command::HoldDirection {
            direction: Facing::East,
        },
    );

    let events = tick(&mut room, &mut movement, 50);

    assert!(events.contains(&Event::FacingChanged {
        facing: Facing::East
    }));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ActorMoved { .. })));
    let actor = query::actor(&room);
    assert_eq!(actor.position, GridPosition::new(3.4, 2.0));
    assert_eq!(actor.facing, Facing::East);
}

#[test]
fn held_move_in_open_direction_advances() {
    let mut room = room_with_obstacle();
    let mut movement = Movement::default();
    let _ = step(
        &mut room,
        &mut movement,
        Command::HoldDirection {
            direction: Facing::South,
        },
    );

    let _ = tick(&mut room, &mut movement, 50);

    let actor = query::actor(&room);
    assert_eq!(actor.position, GridPosition::new(3.0, 2.2));
    assert_eq!(actor.facing, Facing::South);
}

#[test]
fn oversized_frames_are_clamped_before_moving() {
    let mut room = room_with_obstacle();
    let mut movement = Movement::default();
    let _ = step(
        &mut room,
        &mut movement,
        Command::HoldDirection {
            direction: Facing::South,
        },
    );

    let _ = tick(&mut room, &mut movement, 2_000);

    assert_eq!(query::actor(&room).position, GridPosition::new(3.0, 2.2));
}

#[test]
fn path_snaps_to_final_node_and_keeps_facing() {
    let mut room = room_with_obstacle();
    let mut movement = Movement::default();
    let nodes = vec![
        CellCoord::new(3, 2),
        CellCoord::new(3, 3),
        CellCoord::new(4, 3),
    ];
    let _ = step(&mut room, &mut movement, Command::FollowPath { nodes });

    let mut log = Vec::new();
    for _ in 0..20 {
        log.extend(tick(&mut room, &mut movement, 50));
    }

    let actor = query::actor(&room);
    assert_eq!(actor.position, GridPosition::new(4.0, 3.0));
    assert_eq!(actor.facing, Facing::East);
    assert_eq!(actor.mode, MotionMode::Idle);
    let completions = log
        .iter()
        .filter(|event| matches!(event, Event::PathCompleted { .. }))
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn path_faces_along_each_segment() {
    let mut room = room_with_obstacle();
    let mut movement = Movement::default();
    let nodes = vec![
        CellCoord::new(3, 2),
        CellCoord::new(3, 3),
        CellCoord::new(4, 3),
    ];
    let _ = step(&mut room, &mut movement, Command::FollowPath { nodes });

    let _ = tick(&mut room, &mut movement, 50);
    assert_eq!(query::actor(&room).facing, Facing::South);

    for _ in 0..5 {
        let _ = tick(&mut room, &mut movement, 50);
    }
    assert_eq!(query::actor(&room).facing, Facing::East);
}

#[test]
fn advance_matches_committed_motion() {
    let mut room = room_with_obstacle();
    let mut movement = Movement::default();
    let _ = step(
        &mut room,
        &mut movement,
        Command::HoldDirection {
            direction: Facing::North,
        },
    );

    let expected = advance(
        &query::actor(&room),
        Duration::from_millis(30),
        query::speed(&room),
        query::navigation_view(&room),
    );
    let _ = tick(&mut room, &mut movement, 30);

    assert_eq!(query::actor(&room).position, expected.position);
}
