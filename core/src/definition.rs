//! Declarative room description supplied once when a room mounts.

use serde::{Deserialize, Serialize};

use crate::{
    CellCoord, CollectibleId, Facing, FurnitureKind, GridPosition, HotspotId, HotspotKind, Rgb,
};

/// Walking speed used when a definition omits one, in cells per second.
pub const DEFAULT_SPEED: f32 = 3.4;

/// Pickup distance used when a definition omits one, in cells.
pub const DEFAULT_PICKUP_RADIUS: f32 = 0.8;

/// Complete description of a room: grid, obstacles, hotspots, collectibles and avatar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomDefinition {
    /// Display name of the room.
    pub name: String,
    /// Number of cell columns, including the wall ring.
    pub columns: u32,
    /// Number of cell rows, including the wall ring.
    pub rows: u32,
    /// Width of a floor diamond in pixels.
    pub tile_width: f32,
    /// Height of a floor diamond in pixels.
    pub tile_height: f32,
    /// Interior cells blocked by furniture footprints.
    #[serde(default)]
    pub obstacles: Vec<CellCoord>,
    /// Furniture drawn in the room.
    #[serde(default)]
    pub furniture: Vec<FurnitureDefinition>,
    /// Hotspots that open content sections.
    #[serde(default)]
    pub hotspots: Vec<HotspotDefinition>,
    /// Seed list of collectibles.
    #[serde(default)]
    pub collectibles: Vec<CollectibleDefinition>,
    /// Where the actor appears.
    pub spawn: SpawnDefinition,
    /// Walking speed in cells per second, shared by keyboard and click movement.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Distance below which a collectible is picked up.
    #[serde(default = "default_pickup_radius")]
    pub pickup_radius: f32,
    /// Cosmetic parameters of the avatar.
    #[serde(default)]
    pub avatar: AvatarDefinition,
}

impl RoomDefinition {
    /// Creates an empty room spawning the actor in the middle of the grid.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        columns: u32,
        rows: u32,
        tile_width: f32,
        tile_height: f32,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
            tile_width,
            tile_height,
            obstacles: Vec::new(),
            furniture: Vec::new(),
            hotspots: Vec::new(),
            collectibles: Vec::new(),
            spawn: SpawnDefinition {
                position: GridPosition::new((columns / 2) as f32, (rows / 2) as f32),
                facing: Facing::South,
            },
            speed: DEFAULT_SPEED,
            pickup_radius: DEFAULT_PICKUP_RADIUS,
            avatar: AvatarDefinition::default(),
        }
    }
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

fn default_pickup_radius() -> f32 {
    DEFAULT_PICKUP_RADIUS
}

/// Spawn location and facing of the actor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnDefinition {
    /// Starting position in grid space.
    pub position: GridPosition,
    /// Starting facing.
    #[serde(default)]
    pub facing: Facing,
}

/// Single piece of furniture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureDefinition {
    /// What to draw.
    pub kind: FurnitureKind,
    /// Cell the piece is drawn on.
    pub cell: CellCoord,
}

/// Static hotspot record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HotspotDefinition {
    /// Identifier unique within the room.
    pub id: HotspotId,
    /// Content section the hotspot opens.
    pub kind: HotspotKind,
    /// Cell the trigger radius is measured from.
    pub anchor: CellCoord,
    /// Trigger radius in cells.
    pub radius: f32,
    /// Display label.
    pub label: String,
}

/// Seed record of a collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectibleDefinition {
    /// Identifier unique within the room.
    pub id: CollectibleId,
    /// Cell the collectible rests on.
    pub anchor: CellCoord,
    /// Score value reported on pickup.
    pub value: u32,
}

/// Name and outfit of the avatar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarDefinition {
    /// Name shown on the nameplate.
    pub name: String,
    /// Shirt color.
    pub shirt: Rgb,
    /// Trousers color.
    pub pants: Rgb,
    /// Hair color.
    pub hair: Rgb,
}

impl Default for AvatarDefinition {
    fn default() -> Self {
        Self {
            name: "Guest".to_owned(),
            shirt: Rgb::from_rgb(0x3b, 0x82, 0xf6),
            pants: Rgb::from_rgb(0x2b, 0x2b, 0x2b),
            hair: Rgb::from_rgb(0x5b, 0x3a, 0x1a),
        }
    }
}
