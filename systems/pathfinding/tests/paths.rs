use std::collections::VecDeque;

use iso_room_core::{CellCoord, Command, Facing, GridPosition, RoomDefinition, SpawnDefinition};
use iso_room_system_pathfinding::{find_path, WalkPlanner};
use iso_room_world::{query, Room};

/// Dense walkability map used to drive `find_path` in tests.
struct Map {
    columns: u32,
    rows: u32,
    walkable: Vec<bool>,
}

impl Map {
    fn enclosed(columns: u32, rows: u32, obstacles: &[(u32, u32)]) -> Self {
        let mut walkable = vec![true; (columns * rows) as usize];
        for row in 0..rows {
            for column in 0..columns {
                if column == 0 || row == 0 || column + 1 == columns || row + 1 == rows {
                    walkable[(row * columns + column) as usize] = false;
                }
            }
        }
        for &(column, row) in obstacles {
            walkable[(row * columns + column) as usize] = false;
        }
        Self {
            columns,
            rows,
            walkable,
        }
    }

    fn is_walkable(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns
            && cell.row() < self.rows
            && self.walkable[(cell.row() * self.columns + cell.column()) as usize]
    }

    fn open_cells(&self) -> Vec<CellCoord> {
        (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |column| CellCoord::new(column, row)))
            .filter(|cell| self.is_walkable(*cell))
            .collect()
    }

    fn path(&self, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
        find_path(start, goal, self.columns, self.rows, |cell| {
            self.is_walkable(cell)
        })
    }

    /// Brute-force breadth-first distance, or `None` when unreachable.
    fn bfs_distance(&self, start: CellCoord, goal: CellCoord) -> Option<usize> {
        let mut distances = vec![usize::MAX; self.walkable.len()];
        let mut queue = VecDeque::new();
        distances[(start.row() * self.columns + start.column()) as usize] = 0;
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            let distance = distances[(cell.row() * self.columns + cell.column()) as usize];
            if cell == goal {
                return Some(distance);
            }
            let (column, row) = (cell.column() as i64, cell.row() as i64);
            for (dc, dr) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                let (nc, nr) = (column + dc, row + dr);
                if nc < 0 || nr < 0 {
                    continue;
                }
                let neighbor = CellCoord::new(nc as u32, nr as u32);
                if !self.is_walkable(neighbor) {
                    continue;
                }
                let slot = &mut distances[(neighbor.row() * self.columns + neighbor.column()) as usize];
                if *slot == usize::MAX {
                    *slot = distance + 1;
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }
}

fn assert_valid_path(map: &Map, path: &[CellCoord], start: CellCoord, goal: CellCoord) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    for pair in path.windows(2) {
        assert_eq!(
            pair[0].manhattan_distance(pair[1]),
            1,
            "path must move one orthogonal step at a time: {pair:?}"
        );
    }
    for cell in path {
        assert!(map.is_walkable(*cell), "path crosses blocked cell {cell:?}");
    }
}

#[test]
fn lobby_scenario_matches_breadth_first_distance() {
    let map = Map::enclosed(22, 18, &[(10, 9)]);
    let start = CellCoord::new(2, 2);
    let goal = CellCoord::new(19, 16);

    let path = map.path(start, goal);

    assert_valid_path(&map, &path, start, goal);
    assert_eq!(path.len() - 1, 31);
    assert_eq!(map.bfs_distance(start, goal), Some(31));
}

#[test]
fn path_lengths_match_breadth_first_search_on_every_pair() {
    let maps = [
        Map::enclosed(9, 7, &[]),
        Map::enclosed(9, 7, &[(4, 1), (4, 2), (4, 3), (4, 4)]),
        Map::enclosed(
            9,
            7,
            &[(2, 2), (3, 2), (4, 2), (5, 2), (6, 2), (6, 3), (6, 4), (2, 4), (3, 4), (4, 4)],
        ),
        Map::enclosed(8, 8, &[(3, 1), (3, 2), (3, 3), (5, 6), (5, 5), (5, 4), (1, 5), (2, 5)]),
    ];

    for map in &maps {
        let cells = map.open_cells();
        for &start in &cells {
            for &goal in &cells {
                let path = map.path(start, goal);
                match map.bfs_distance(start, goal) {
                    Some(distance) => {
                        assert_valid_path(map, &path, start, goal);
                        assert_eq!(
                            path.len() - 1,
                            distance,
                            "suboptimal path from {start:?} to {goal:?}"
                        );
                    }
                    None => assert_eq!(path, vec![start]),
                }
            }
        }
    }
}

#[test]
fn enclosed_goal_returns_only_start() {
    let map = Map::enclosed(9, 9, &[(4, 3), (5, 4), (4, 5), (3, 4)]);
    let start = CellCoord::new(1, 1);

    assert_eq!(map.path(start, CellCoord::new(4, 4)), vec![start]);
}

#[test]
fn blocked_goal_returns_only_start() {
    let map = Map::enclosed(9, 9, &[(6, 6)]);
    let start = CellCoord::new(2, 2);

    assert_eq!(map.path(start, CellCoord::new(6, 6)), vec![start]);
    assert_eq!(map.path(start, CellCoord::new(0, 3)), vec![start]);
}

#[test]
fn search_is_deterministic() {
    let map = Map::enclosed(12, 10, &[(5, 3), (5, 4), (5, 5)]);
    let start = CellCoord::new(2, 4);
    let goal = CellCoord::new(9, 4);

    assert_eq!(map.path(start, goal), map.path(start, goal));
}

fn planner_room(obstacles: Vec<CellCoord>) -> Room {
    let mut definition = RoomDefinition::new("Planner", 10, 8, 54.0, 27.0);
    definition.obstacles = obstacles;
    definition.spawn = SpawnDefinition {
        position: GridPosition::new(2.2, 1.9),
        facing: Facing::South,
    };
    Room::new(&definition).expect("valid room")
}

#[test]
fn planner_walks_from_rounded_actor_cell() {
    let room = planner_room(Vec::new());
    let mut planner = WalkPlanner::default();
    let mut commands = Vec::new();

    planner.handle(
        Some((4, 2)),
        &query::actor(&room),
        query::navigation_view(&room),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::FollowPath {
            nodes: vec![
                CellCoord::new(2, 2),
                CellCoord::new(3, 2),
                CellCoord::new(4, 2),
            ]
        }]
    );
}

#[test]
fn planner_clamps_clicks_outside_the_room() {
    let room = planner_room(Vec::new());
    let mut planner = WalkPlanner::default();
    let mut commands = Vec::new();

    planner.handle(
        Some((-12, 2)),
        &query::actor(&room),
        query::navigation_view(&room),
        &mut commands,
    );

    let Some(Command::FollowPath { nodes }) = commands.first() else {
        panic!("expected a path toward the clamped cell, got {commands:?}");
    };
    assert_eq!(nodes.last(), Some(&CellCoord::new(1, 2)));
}

#[test]
fn planner_ignores_blocked_and_current_cells() {
    let room = planner_room(vec![CellCoord::new(5, 5)]);
    let mut planner = WalkPlanner::default();
    let mut commands = Vec::new();

    planner.handle(
        Some((5, 5)),
        &query::actor(&room),
        query::navigation_view(&room),
        &mut commands,
    );
    planner.handle(
        Some((2, 2)),
        &query::actor(&room),
        query::navigation_view(&room),
        &mut commands,
    );
    planner.handle(
        None,
        &query::actor(&room),
        query::navigation_view(&room),
        &mut commands,
    );

    assert!(commands.is_empty());
}
