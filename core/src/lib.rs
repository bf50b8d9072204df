#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the isometric room engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative room state, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! and listeners to react to. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod definition;
mod listener;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use definition::{
    AvatarDefinition, CollectibleDefinition, FurnitureDefinition, HotspotDefinition,
    RoomDefinition, SpawnDefinition, DEFAULT_PICKUP_RADIUS, DEFAULT_SPEED,
};
pub use listener::{dispatch, RoomListener};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str =
    "Welcome in! Walk with WASD or the arrow keys, click a tile to stroll there, press E to look closer.";

/// Longest frame delta the simulation accepts before clamping.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(50);

/// Commands that express all permissible room mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Wall-clock time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Starts steering the actor with a held direction key.
    HoldDirection {
        /// Direction the player is holding.
        direction: Facing,
    },
    /// Stops steering with the provided direction key.
    ReleaseDirection {
        /// Direction whose key was released.
        direction: Facing,
    },
    /// Requests that the actor walks along a planned path.
    FollowPath {
        /// Cells to visit in order, starting with the actor's current cell.
        nodes: Vec<CellCoord>,
    },
    /// Commits the outcome of a motion step computed by the movement system.
    CommitMotion {
        /// Position the actor occupies after the step.
        position: GridPosition,
        /// Facing of the actor after the step.
        facing: Facing,
        /// Motion mode that remains active after the step.
        mode: MotionMode,
    },
    /// Records which hotspot the actor is currently standing in.
    SetActiveHotspot {
        /// Nearest hotspot in range, or `None` when the actor is outside all of them.
        hotspot: Option<HotspotId>,
    },
    /// Picks up a collectible from the working set.
    CollectItem {
        /// Identifier of the collectible within reach.
        collectible: CollectibleId,
    },
    /// Forwards the player's interact action to the host.
    Interact,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Clamped duration that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the actor changed position.
    ActorMoved {
        /// Position before the move.
        from: GridPosition,
        /// Position after the move.
        to: GridPosition,
    },
    /// Announces that the actor turned to a new facing.
    FacingChanged {
        /// Facing adopted by the actor.
        facing: Facing,
    },
    /// Confirms that the actor started following a path.
    PathStarted {
        /// Final cell of the accepted path.
        destination: CellCoord,
        /// Number of single-cell steps in the path.
        steps: usize,
    },
    /// Reports that an in-flight path was dropped before completion.
    PathCancelled {
        /// Final cell of the abandoned path.
        destination: CellCoord,
    },
    /// Reports that the actor reached the end of its path.
    PathCompleted {
        /// Cell the actor snapped to.
        destination: CellCoord,
    },
    /// Announces that a different hotspot became active.
    HotspotEntered {
        /// Identifier of the hotspot.
        hotspot: HotspotId,
        /// Kind of content the hotspot leads to.
        kind: HotspotKind,
        /// Display label of the hotspot.
        label: String,
    },
    /// Announces that the actor left every hotspot.
    HotspotLeft {
        /// Hotspot that was active before leaving.
        hotspot: HotspotId,
    },
    /// Confirms that a collectible was removed from the room.
    ItemCollected {
        /// Identifier of the collected item.
        collectible: CollectibleId,
        /// Score value carried by the item.
        value: u32,
    },
    /// Forwards an interact action together with the active hotspot.
    InteractRequested {
        /// Hotspot active when the action arrived, if any.
        active: Option<HotspotId>,
    },
}

/// Cardinal facings available to the actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    #[default]
    South,
    /// Toward decreasing column indices.
    West,
}

impl Facing {
    /// Unit offset of the facing expressed as `(column, row)` deltas.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Derives the facing of a movement delta from its dominant axis.
    ///
    /// Column movement wins ties so diagonal-looking steps face east or west.
    /// Returns `None` for a zero delta.
    #[must_use]
    pub fn from_delta(column_delta: f32, row_delta: f32) -> Option<Self> {
        if column_delta == 0.0 && row_delta == 0.0 {
            return None;
        }

        if column_delta.abs() >= row_delta.abs() {
            if column_delta > 0.0 {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if row_delta > 0.0 {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Fractional position of the cell's anchor.
    #[must_use]
    pub fn to_position(self) -> GridPosition {
        GridPosition::new(self.column as f32, self.row as f32)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Sub-cell position of the actor in grid space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    column: f32,
    row: f32,
}

impl GridPosition {
    /// Creates a new fractional grid position.
    #[must_use]
    pub const fn new(column: f32, row: f32) -> Self {
        Self { column, row }
    }

    /// Fractional column coordinate.
    #[must_use]
    pub const fn column(&self) -> f32 {
        self.column
    }

    /// Fractional row coordinate.
    #[must_use]
    pub const fn row(&self) -> f32 {
        self.row
    }

    /// Cell obtained by rounding both coordinates, if it is non-negative.
    #[must_use]
    pub fn nearest_cell(&self) -> Option<CellCoord> {
        let column = self.column.round();
        let row = self.row.round();
        if !column.is_finite() || !row.is_finite() || column < 0.0 || row < 0.0 {
            return None;
        }

        Some(CellCoord::new(column as u32, row as u32))
    }

    /// Euclidean distance to the anchor of the provided cell.
    #[must_use]
    pub fn distance_to_cell(&self, cell: CellCoord) -> f32 {
        let column_delta = self.column - cell.column() as f32;
        let row_delta = self.row - cell.row() as f32;
        column_delta.hypot(row_delta)
    }
}

/// Unique identifier assigned to a hotspot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HotspotId(u32);

impl HotspotId {
    /// Creates a new hotspot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectibleId(u32);

impl CollectibleId {
    /// Creates a new collectible identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Content section a hotspot opens on the host page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotKind {
    /// Biography section.
    About,
    /// Skills overview.
    Skills,
    /// Project showcase.
    Projects,
    /// Work history.
    Experience,
    /// Contact form.
    Contact,
}

/// Cosmetic furniture drawn next to hotspots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureKind {
    /// Desk with a monitor.
    Desk,
    /// Shelf full of books.
    Bookshelf,
    /// Two-seat sofa.
    Sofa,
    /// Pin board on legs.
    NoticeBoard,
    /// Post box.
    Mailbox,
}

/// Click-to-move plan the actor is walking along.
///
/// The integer part of `progress` selects the segment between two nodes and
/// the fractional part interpolates within it.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPlan {
    nodes: Vec<CellCoord>,
    progress: f32,
}

impl PathPlan {
    /// Creates a plan at zero progress, or `None` when there is nothing to walk.
    #[must_use]
    pub fn new(nodes: Vec<CellCoord>) -> Option<Self> {
        if nodes.len() < 2 {
            return None;
        }

        Some(Self {
            nodes,
            progress: 0.0,
        })
    }

    /// Cells visited by the plan in order.
    #[must_use]
    pub fn nodes(&self) -> &[CellCoord] {
        &self.nodes
    }

    /// Progress along the plan measured in segments.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Number of single-cell segments in the plan.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Final cell of the plan.
    #[must_use]
    pub fn destination(&self) -> CellCoord {
        self.nodes[self.nodes.len() - 1]
    }

    /// Returns the plan advanced to the provided progress.
    #[must_use]
    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = progress;
        self
    }
}

/// Mutually exclusive ways the actor can be driven.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MotionMode {
    /// No input; position and facing stay put.
    #[default]
    Idle,
    /// A direction key is held.
    HeldDirection(Facing),
    /// The actor walks along a click-to-move plan.
    FollowingPath(PathPlan),
}

impl MotionMode {
    /// Reports whether the mode moves the actor.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Direction currently held, if any.
    #[must_use]
    pub const fn held_direction(&self) -> Option<Facing> {
        match self {
            Self::HeldDirection(direction) => Some(*direction),
            _ => None,
        }
    }

    /// Plan currently followed, if any.
    #[must_use]
    pub const fn path(&self) -> Option<&PathPlan> {
        match self {
            Self::FollowingPath(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Immutable representation of the actor used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Fractional grid position of the actor.
    pub position: GridPosition,
    /// Facing of the actor.
    pub facing: Facing,
    /// Active motion mode.
    pub mode: MotionMode,
}

/// Immutable representation of a hotspot used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct HotspotSnapshot {
    /// Identifier of the hotspot.
    pub id: HotspotId,
    /// Content section the hotspot opens.
    pub kind: HotspotKind,
    /// Cell the trigger radius is measured from.
    pub anchor: CellCoord,
    /// Distance below which the hotspot qualifies as active.
    pub radius: f32,
    /// Display label.
    pub label: String,
}

/// Read-only snapshot describing every hotspot of the room.
///
/// Snapshots keep their declaration order so ties resolve deterministically.
#[derive(Clone, Debug, Default)]
pub struct HotspotView {
    snapshots: Vec<HotspotSnapshot>,
}

impl HotspotView {
    /// Creates a new hotspot view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<HotspotSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured hotspots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &HotspotSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a hotspot by identifier.
    #[must_use]
    pub fn get(&self, id: HotspotId) -> Option<&HotspotSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }
}

/// Immutable representation of a live collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectibleSnapshot {
    /// Identifier of the collectible.
    pub id: CollectibleId,
    /// Cell the collectible rests on.
    pub anchor: CellCoord,
    /// Score value awarded on pickup.
    pub value: u32,
}

/// Read-only snapshot describing the collectibles still in the room.
#[derive(Clone, Debug, Default)]
pub struct CollectibleView {
    snapshots: Vec<CollectibleSnapshot>,
}

impl CollectibleView {
    /// Creates a new collectible view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CollectibleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured collectibles in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectibleSnapshot> {
        self.snapshots.iter()
    }

    /// Number of collectibles left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether every collectible has been picked up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Read-only view into the dense walkability grid.
#[derive(Clone, Copy, Debug)]
pub struct NavigationView<'a> {
    cells: &'a [bool],
    columns: u32,
    rows: u32,
}

impl<'a> NavigationView<'a> {
    /// Captures a new navigation view backed by the provided row-major cells.
    #[must_use]
    pub fn new(cells: &'a [bool], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Reports whether the actor may stand on the cell. Out-of-bounds cells are blocked.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Opaque RGB color parsed from `#rrggbb` notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(value: &str) -> Result<Self, ParseColorError> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError {
                input: value.to_owned(),
            });
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ParseColorError {
                input: value.to_owned(),
            })
        };

        Ok(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Error returned when a color string is not `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("expected a color in #rrggbb notation (received {input:?})")]
pub struct ParseColorError {
    input: String,
}
