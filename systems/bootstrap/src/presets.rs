//! Built-in rooms that ship with the engine.

use iso_room_core::{
    CellCoord, CollectibleDefinition, CollectibleId, Facing, FurnitureDefinition, FurnitureKind,
    GridPosition, HotspotDefinition, HotspotId, HotspotKind, RoomDefinition, SpawnDefinition,
};

/// Named room layouts available without a room file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoomPreset {
    /// Open 22x18 lobby with scattered coins.
    #[default]
    Lobby,
    /// Tighter 20x16 studio with multi-cell furniture and no coins.
    Studio,
    /// Lobby floor plan whose only hotspot leads back to the lobby.
    Rooftop,
    /// Same layout as the rooftop, furnished as a café.
    Cafe,
}

impl RoomPreset {
    /// Builds the definition of the preset.
    #[must_use]
    pub fn definition(self) -> RoomDefinition {
        match self {
            Self::Lobby => lobby(),
            Self::Studio => studio(),
            Self::Rooftop => rooftop(),
            Self::Cafe => cafe(),
        }
    }
}

const TILE_WIDTH: f32 = 54.0;
const TILE_HEIGHT: f32 = 27.0;

type HotspotRow = (u32, HotspotKind, (u32, u32), &'static str);

fn hotspots(rows: &[HotspotRow], radius: f32) -> Vec<HotspotDefinition> {
    rows.iter()
        .map(|&(id, kind, (column, row), label)| HotspotDefinition {
            id: HotspotId::new(id),
            kind,
            anchor: CellCoord::new(column, row),
            radius,
            label: label.to_owned(),
        })
        .collect()
}

fn furniture(rows: &[(FurnitureKind, (u32, u32))]) -> Vec<FurnitureDefinition> {
    rows.iter()
        .map(|&(kind, (column, row))| FurnitureDefinition {
            kind,
            cell: CellCoord::new(column, row),
        })
        .collect()
}

fn cells(rows: &[(u32, u32)]) -> Vec<CellCoord> {
    rows.iter()
        .map(|&(column, row)| CellCoord::new(column, row))
        .collect()
}

/// Lobby room: four single-cell obstacles, five hotspots and ten coins.
#[must_use]
pub fn lobby() -> RoomDefinition {
    let mut definition = RoomDefinition::new("Lobby", 22, 18, TILE_WIDTH, TILE_HEIGHT);
    definition.obstacles = cells(&[(5, 3), (10, 3), (3, 9), (13, 9)]);
    definition.hotspots = hotspots(
        &[
            (1, HotspotKind::Skills, (6, 5), "Skills"),
            (2, HotspotKind::Projects, (15, 5), "Projects"),
            (3, HotspotKind::About, (10, 12), "About Me"),
            (4, HotspotKind::Experience, (17, 12), "Experience"),
            (5, HotspotKind::Contact, (5, 12), "Contact"),
        ],
        3.0,
    );
    definition.furniture = furniture(&[
        (FurnitureKind::Desk, (6, 5)),
        (FurnitureKind::Bookshelf, (15, 5)),
        (FurnitureKind::Sofa, (10, 12)),
        (FurnitureKind::NoticeBoard, (17, 12)),
        (FurnitureKind::Mailbox, (5, 12)),
    ]);
    definition.collectibles = [
        (1, (6, 6), 5),
        (2, (9, 8), 5),
        (3, (11, 5), 10),
        (4, (14, 7), 5),
        (5, (8, 14), 10),
        (6, (13, 10), 5),
        (7, (4, 11), 10),
        (8, (16, 14), 5),
        (9, (18, 8), 10),
        (10, (12, 15), 10),
    ]
    .into_iter()
    .map(|(id, (column, row), value)| CollectibleDefinition {
        id: CollectibleId::new(id),
        anchor: CellCoord::new(column, row),
        value,
    })
    .collect();
    definition.spawn = SpawnDefinition {
        position: GridPosition::new(8.0, 7.0),
        facing: Facing::South,
    };
    definition.speed = 3.4;
    definition.pickup_radius = 0.8;
    definition
}

/// Rooftop room: the lobby floor plan and coins with a single way back.
#[must_use]
pub fn rooftop() -> RoomDefinition {
    lobby_annex("Rooftop")
}

/// Café room: the lobby floor plan and coins with a single way back.
#[must_use]
pub fn cafe() -> RoomDefinition {
    lobby_annex("Café")
}

fn lobby_annex(name: &str) -> RoomDefinition {
    let mut definition = lobby();
    definition.name = name.to_owned();
    definition.furniture.clear();
    definition.hotspots = hotspots(&[(1, HotspotKind::About, (3, 9), "Back to Lobby")], 2.0);
    definition
}

/// Studio room: furniture blocks several cells and hotspots sit in front of it.
#[must_use]
pub fn studio() -> RoomDefinition {
    let mut definition = RoomDefinition::new("Studio", 20, 16, TILE_WIDTH, TILE_HEIGHT);
    definition.obstacles = cells(&[
        (8, 2),
        (9, 2),
        (2, 7),
        (2, 8),
        (2, 9),
        (14, 7),
        (15, 7),
        (16, 7),
        (9, 11),
        (10, 11),
        (11, 11),
        (17, 2),
    ]);
    definition.hotspots = hotspots(
        &[
            (1, HotspotKind::Skills, (8, 3), "My Skills"),
            (2, HotspotKind::Projects, (3, 8), "Projects"),
            (3, HotspotKind::About, (15, 8), "About Me"),
            (4, HotspotKind::Experience, (10, 12), "Experience"),
            (5, HotspotKind::Contact, (17, 3), "Contact"),
        ],
        2.0,
    );
    definition.furniture = furniture(&[
        (FurnitureKind::Desk, (8, 2)),
        (FurnitureKind::Bookshelf, (2, 8)),
        (FurnitureKind::Sofa, (15, 7)),
        (FurnitureKind::NoticeBoard, (10, 11)),
        (FurnitureKind::Mailbox, (17, 2)),
    ]);
    definition.spawn = SpawnDefinition {
        position: GridPosition::new(10.0, 10.0),
        facing: Facing::South,
    };
    definition.speed = 4.0;
    definition
}
