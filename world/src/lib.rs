#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative room state management for the isometric room engine.

mod collectibles;
mod navigation;

use std::{collections::BTreeSet, time::Duration};

use iso_room_core::{
    AvatarDefinition, CellCoord, CollectibleId, Command, Event, Facing, FurnitureDefinition,
    GridPosition, HotspotDefinition, HotspotId, MotionMode, PathPlan, RoomDefinition,
    MAX_FRAME_DELTA, WELCOME_BANNER,
};
use thiserror::Error;
use tracing::debug;

use self::{collectibles::CollectibleRegistry, navigation::NavigationGrid};

/// Smallest grid that still leaves an interior inside the wall ring.
const MIN_GRID_EDGE: u32 = 3;

/// Largest grid edge accepted at mount time.
const MAX_GRID_EDGE: u32 = 1024;

/// Reasons a room definition is rejected at mount time.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RoomError {
    /// The grid has no interior once the wall ring is removed.
    #[error("room grid must be at least 3x3 cells (received {columns}x{rows})")]
    GridTooSmall {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The grid is larger than the engine is willing to allocate.
    #[error("room grid must be at most 1024x1024 cells (received {columns}x{rows})")]
    GridTooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// Tile dimensions must be positive and finite.
    #[error("tile size must be positive (received {width}x{height})")]
    InvalidTileSize {
        /// Requested tile width.
        width: f32,
        /// Requested tile height.
        height: f32,
    },
    /// Walking speed must be positive and finite.
    #[error("walking speed must be positive (received {speed})")]
    InvalidSpeed {
        /// Requested speed in cells per second.
        speed: f32,
    },
    /// Pickup radius must be positive and finite.
    #[error("pickup radius must be positive (received {radius})")]
    InvalidPickupRadius {
        /// Requested radius in cells.
        radius: f32,
    },
    /// A hotspot is anchored outside the grid.
    #[error("hotspot {} is anchored outside the grid at {anchor}", .hotspot.get())]
    HotspotOutOfBounds {
        /// Offending hotspot.
        hotspot: HotspotId,
        /// Anchor that failed validation.
        anchor: CellCoord,
    },
    /// A hotspot radius is not positive.
    #[error("hotspot {} must have a positive radius (received {radius})", .hotspot.get())]
    InvalidHotspotRadius {
        /// Offending hotspot.
        hotspot: HotspotId,
        /// Radius that failed validation.
        radius: f32,
    },
    /// Two hotspots share an identifier.
    #[error("hotspot {} is declared more than once", .hotspot.get())]
    DuplicateHotspot {
        /// Repeated identifier.
        hotspot: HotspotId,
    },
    /// A collectible rests outside the grid.
    #[error("collectible {} rests outside the grid at {anchor}", .collectible.get())]
    CollectibleOutOfBounds {
        /// Offending collectible.
        collectible: CollectibleId,
        /// Anchor that failed validation.
        anchor: CellCoord,
    },
    /// Two collectibles share an identifier.
    #[error("collectible {} is declared more than once", .collectible.get())]
    DuplicateCollectible {
        /// Repeated identifier.
        collectible: CollectibleId,
    },
    /// The spawn position does not round to a walkable cell.
    #[error("spawn position ({column}, {row}) is not on a walkable cell")]
    SpawnNotWalkable {
        /// Requested spawn column.
        column: f32,
        /// Requested spawn row.
        row: f32,
    },
}

#[derive(Clone, Debug)]
struct Actor {
    position: GridPosition,
    facing: Facing,
    mode: MotionMode,
}

/// Represents the authoritative state of one mounted room.
#[derive(Debug)]
pub struct Room {
    banner: &'static str,
    name: String,
    tile_size: (f32, f32),
    navigation: NavigationGrid,
    furniture: Vec<FurnitureDefinition>,
    hotspots: Vec<HotspotDefinition>,
    collectibles: CollectibleRegistry,
    actor: Actor,
    active_hotspot: Option<HotspotId>,
    speed: f32,
    pickup_radius: f32,
    avatar: AvatarDefinition,
    elapsed: Duration,
}

impl Room {
    /// Mounts a room from its definition, validating every static record.
    pub fn new(definition: &RoomDefinition) -> Result<Self, RoomError> {
        let RoomDefinition {
            name,
            columns,
            rows,
            tile_width,
            tile_height,
            obstacles,
            furniture,
            hotspots,
            collectibles,
            spawn,
            speed,
            pickup_radius,
            avatar,
        } = definition;
        let (columns, rows) = (*columns, *rows);

        if columns < MIN_GRID_EDGE || rows < MIN_GRID_EDGE {
            return Err(RoomError::GridTooSmall { columns, rows });
        }
        if columns > MAX_GRID_EDGE || rows > MAX_GRID_EDGE {
            return Err(RoomError::GridTooLarge { columns, rows });
        }
        if !is_positive(*tile_width) || !is_positive(*tile_height) {
            return Err(RoomError::InvalidTileSize {
                width: *tile_width,
                height: *tile_height,
            });
        }
        if !is_positive(*speed) {
            return Err(RoomError::InvalidSpeed { speed: *speed });
        }
        if !is_positive(*pickup_radius) {
            return Err(RoomError::InvalidPickupRadius {
                radius: *pickup_radius,
            });
        }

        let in_bounds = |cell: CellCoord| cell.column() < columns && cell.row() < rows;

        let mut hotspot_ids = BTreeSet::new();
        for hotspot in hotspots {
            if !in_bounds(hotspot.anchor) {
                return Err(RoomError::HotspotOutOfBounds {
                    hotspot: hotspot.id,
                    anchor: hotspot.anchor,
                });
            }
            if !is_positive(hotspot.radius) {
                return Err(RoomError::InvalidHotspotRadius {
                    hotspot: hotspot.id,
                    radius: hotspot.radius,
                });
            }
            if !hotspot_ids.insert(hotspot.id) {
                return Err(RoomError::DuplicateHotspot {
                    hotspot: hotspot.id,
                });
            }
        }

        let mut collectible_ids = BTreeSet::new();
        for collectible in collectibles {
            if !in_bounds(collectible.anchor) {
                return Err(RoomError::CollectibleOutOfBounds {
                    collectible: collectible.id,
                    anchor: collectible.anchor,
                });
            }
            if !collectible_ids.insert(collectible.id) {
                return Err(RoomError::DuplicateCollectible {
                    collectible: collectible.id,
                });
            }
        }

        let navigation = NavigationGrid::enclosed(columns, rows, obstacles);
        let spawn_walkable = spawn
            .position
            .nearest_cell()
            .is_some_and(|cell| navigation.is_walkable(cell));
        if !spawn_walkable {
            return Err(RoomError::SpawnNotWalkable {
                column: spawn.position.column(),
                row: spawn.position.row(),
            });
        }

        Ok(Self {
            banner: WELCOME_BANNER,
            name: name.clone(),
            tile_size: (*tile_width, *tile_height),
            navigation,
            furniture: furniture.clone(),
            hotspots: hotspots.clone(),
            collectibles: CollectibleRegistry::seeded(collectibles),
            actor: Actor {
                position: spawn.position,
                facing: spawn.facing,
                mode: MotionMode::Idle,
            },
            active_hotspot: None,
            speed: *speed,
            pickup_radius: *pickup_radius,
            avatar: avatar.clone(),
            elapsed: Duration::ZERO,
        })
    }

    fn cancel_path(&mut self, out_events: &mut Vec<Event>) {
        if let MotionMode::FollowingPath(plan) = &self.actor.mode {
            out_events.push(Event::PathCancelled {
                destination: plan.destination(),
            });
            self.actor.mode = MotionMode::Idle;
        }
    }

    fn is_walkable_path(&self, nodes: &[CellCoord]) -> bool {
        nodes.iter().all(|cell| self.navigation.is_walkable(*cell))
            && nodes
                .windows(2)
                .all(|pair| pair[0].manhattan_distance(pair[1]) == 1)
    }

    fn commit_motion(
        &mut self,
        position: GridPosition,
        facing: Facing,
        mode: MotionMode,
        out_events: &mut Vec<Event>,
    ) {
        let lands_on_walkable = position
            .nearest_cell()
            .is_some_and(|cell| self.navigation.is_walkable(cell));
        if !lands_on_walkable {
            debug!(
                column = position.column(),
                row = position.row(),
                "rejecting motion onto a blocked cell"
            );
            return;
        }

        let from = self.actor.position;
        if from != position {
            self.actor.position = position;
            out_events.push(Event::ActorMoved { from, to: position });
        }

        if self.actor.facing != facing {
            self.actor.facing = facing;
            out_events.push(Event::FacingChanged { facing });
        }

        if let MotionMode::FollowingPath(plan) = &self.actor.mode {
            if mode == MotionMode::Idle {
                out_events.push(Event::PathCompleted {
                    destination: plan.destination(),
                });
            }
        }
        self.actor.mode = mode;
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Applies the provided command to the room, mutating state deterministically.
pub fn apply(room: &mut Room, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            let dt = dt.min(MAX_FRAME_DELTA);
            room.elapsed = room.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::HoldDirection { direction } => {
            if room.actor.mode.held_direction() == Some(direction) {
                return;
            }
            room.cancel_path(out_events);
            room.actor.mode = MotionMode::HeldDirection(direction);
        }
        Command::ReleaseDirection { direction } => {
            if room.actor.mode.held_direction() == Some(direction) {
                room.actor.mode = MotionMode::Idle;
            }
        }
        Command::FollowPath { nodes } => {
            if room.actor.mode.held_direction().is_some() {
                debug!("ignoring path request while a direction is held");
                return;
            }
            if !room.is_walkable_path(&nodes) {
                debug!(nodes = nodes.len(), "ignoring path that leaves walkable cells");
                return;
            }
            let Some(plan) = PathPlan::new(nodes) else {
                return;
            };

            room.cancel_path(out_events);
            out_events.push(Event::PathStarted {
                destination: plan.destination(),
                steps: plan.segment_count(),
            });
            room.actor.mode = MotionMode::FollowingPath(plan);
        }
        Command::CommitMotion {
            position,
            facing,
            mode,
        } => room.commit_motion(position, facing, mode, out_events),
        Command::SetActiveHotspot { hotspot } => {
            if room.active_hotspot == hotspot {
                return;
            }

            match hotspot {
                Some(id) => {
                    let Some(definition) = room.hotspots.iter().find(|entry| entry.id == id)
                    else {
                        debug!(hotspot = id.get(), "ignoring unknown hotspot");
                        return;
                    };
                    out_events.push(Event::HotspotEntered {
                        hotspot: id,
                        kind: definition.kind,
                        label: definition.label.clone(),
                    });
                }
                None => {
                    if let Some(previous) = room.active_hotspot {
                        out_events.push(Event::HotspotLeft { hotspot: previous });
                    }
                }
            }
            room.active_hotspot = hotspot;
        }
        Command::CollectItem { collectible } => {
            if let Some(state) = room.collectibles.take(collectible) {
                out_events.push(Event::ItemCollected {
                    collectible,
                    value: state.value,
                });
            }
        }
        Command::Interact => {
            out_events.push(Event::InteractRequested {
                active: room.active_hotspot,
            });
        }
    }
}

/// Query functions that provide read-only access to the room state.
pub mod query {
    use std::time::Duration;

    use super::Room;
    use iso_room_core::{
        ActorSnapshot, AvatarDefinition, CollectibleView, FurnitureDefinition, HotspotId,
        HotspotSnapshot, HotspotView, NavigationView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(room: &Room) -> &'static str {
        room.banner
    }

    /// Display name of the room.
    #[must_use]
    pub fn name(room: &Room) -> &str {
        &room.name
    }

    /// Tile size in pixels as `(width, height)`.
    #[must_use]
    pub fn tile_size(room: &Room) -> (f32, f32) {
        room.tile_size
    }

    /// Exposes a read-only view of the walkability grid.
    #[must_use]
    pub fn navigation_view(room: &Room) -> NavigationView<'_> {
        room.navigation.view()
    }

    /// Captures the actor's current state.
    #[must_use]
    pub fn actor(room: &Room) -> ActorSnapshot {
        ActorSnapshot {
            position: room.actor.position,
            facing: room.actor.facing,
            mode: room.actor.mode.clone(),
        }
    }

    /// Captures every hotspot in declaration order.
    #[must_use]
    pub fn hotspot_view(room: &Room) -> HotspotView {
        HotspotView::from_snapshots(
            room.hotspots
                .iter()
                .map(|hotspot| HotspotSnapshot {
                    id: hotspot.id,
                    kind: hotspot.kind,
                    anchor: hotspot.anchor,
                    radius: hotspot.radius,
                    label: hotspot.label.clone(),
                })
                .collect(),
        )
    }

    /// Captures the collectibles that have not been picked up yet.
    #[must_use]
    pub fn collectible_view(room: &Room) -> CollectibleView {
        CollectibleView::from_snapshots(room.collectibles.snapshots())
    }

    /// Furniture drawn in the room.
    #[must_use]
    pub fn furniture(room: &Room) -> &[FurnitureDefinition] {
        &room.furniture
    }

    /// Hotspot the actor currently stands in, if any.
    #[must_use]
    pub fn active_hotspot(room: &Room) -> Option<HotspotId> {
        room.active_hotspot
    }

    /// Walking speed in cells per second.
    #[must_use]
    pub fn speed(room: &Room) -> f32 {
        room.speed
    }

    /// Distance below which collectibles are picked up.
    #[must_use]
    pub fn pickup_radius(room: &Room) -> f32 {
        room.pickup_radius
    }

    /// Cosmetic parameters of the avatar.
    #[must_use]
    pub fn avatar(room: &Room) -> &AvatarDefinition {
        &room.avatar
    }

    /// Total clamped time simulated since the room mounted.
    #[must_use]
    pub fn elapsed(room: &Room) -> Duration {
        room.elapsed
    }
}
