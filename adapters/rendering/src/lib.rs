#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for isometric room adapters.

mod projection;

use anyhow::Result as AnyResult;
use iso_room_core::{CellCoord, Facing, FurnitureKind, GridPosition, Rgb};
use std::{error::Error, fmt, time::Duration};

pub use projection::{IsoProjection, ProjectionCache, Viewport};

/// Height of the back and left walls at zoom 1, in pixels.
pub const WALL_HEIGHT: f32 = 50.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns a new color darkened towards black by the provided amount.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);

        Self {
            red: self.red * keep,
            green: self.green * keep,
            blue: self.blue * keep,
            alpha: self.alpha,
        }
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Self {
        Self::from_rgb_u8(value.red(), value.green(), value.blue())
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Most recently pressed direction key that is still held.
    pub held_direction: Option<Facing>,
    /// Cell under a click on this frame, possibly outside the grid.
    pub click_cell: Option<(i32, i32)>,
    /// Whether the interact key was pressed on this frame.
    pub interact: bool,
}

/// Grid and tile metrics of the room being drawn, already scaled by zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomPresentation {
    columns: u32,
    rows: u32,
    tile_width: f32,
    tile_height: f32,
    zoom: f32,
}

impl RoomPresentation {
    /// Creates a new room descriptor, scaling tile and wall sizes by `zoom`.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_width: f32,
        tile_height: f32,
        zoom: f32,
    ) -> Result<Self, RenderingError> {
        if columns < 3 || rows < 3 {
            return Err(RenderingError::GridTooSmall { columns, rows });
        }
        if !is_positive(zoom) {
            return Err(RenderingError::InvalidZoom { zoom });
        }
        let (tile_width, tile_height) = (tile_width * zoom, tile_height * zoom);
        if !(is_positive(tile_width) && is_positive(tile_height)) {
            return Err(RenderingError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_width,
            tile_height,
            zoom,
        })
    }

    /// Number of columns, wall ring included.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows, wall ring included.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Scaled diamond width.
    #[must_use]
    pub const fn tile_width(&self) -> f32 {
        self.tile_width
    }

    /// Scaled diamond height.
    #[must_use]
    pub const fn tile_height(&self) -> f32 {
        self.tile_height
    }

    /// Scale factor applied to the definition's tile size.
    #[must_use]
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Scaled wall height.
    #[must_use]
    pub fn wall_height(&self) -> f32 {
        WALL_HEIGHT * self.zoom
    }

    /// Projection centering this room in `viewport`, served from `cache`.
    pub fn projection(
        &self,
        cache: &mut ProjectionCache,
        viewport: Viewport,
    ) -> Option<IsoProjection> {
        cache.projection(
            viewport,
            self.columns,
            self.rows,
            self.tile_width,
            self.tile_height,
        )
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Piece of furniture drawn on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FurniturePresentation {
    /// What to draw.
    pub kind: FurnitureKind,
    /// Cell the piece stands on.
    pub cell: CellCoord,
}

/// Coin still waiting to be picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectiblePresentation {
    /// Cell the coin floats above.
    pub cell: CellCoord,
    /// Score value of the coin.
    pub value: u32,
}

/// Marker floating above a hotspot anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct HotspotIndicator {
    /// Anchor of the hotspot.
    pub anchor: CellCoord,
    /// Label shown while highlighted.
    pub label: String,
    /// Whether the actor stands inside this hotspot's radius.
    pub near: bool,
}

/// Clothing colors of the avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outfit {
    /// Shirt color.
    pub shirt: Color,
    /// Trousers color.
    pub pants: Color,
    /// Hair color.
    pub hair: Color,
}

/// Avatar pose for the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AvatarPresentation {
    /// Fractional grid position.
    pub position: GridPosition,
    /// Facing used to place the face.
    pub facing: Facing,
    /// Whether the walking animation plays.
    pub moving: bool,
    /// Clothing colors.
    pub outfit: Outfit,
    /// Name shown on the nameplate.
    pub name: String,
}

/// Overlay text drawn on top of the room.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HudPresentation {
    /// Sum of collected coin values.
    pub score: u32,
    /// Prompt for the active hotspot, if any.
    pub prompt: Option<String>,
    /// Name shown in the player badge.
    pub player_name: String,
}

/// Which interior edge a wall face rises from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallSide {
    /// Face along the upper-right edge of row 1.
    Back,
    /// Face along the upper-left edge of column 1.
    Left,
}

/// Single entry of the painter's-order draw list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand<'a> {
    /// Clear the frame to the presentation's background color.
    Background,
    /// Interior floor diamond; `alternate` selects the checker shade.
    FloorTile {
        /// Cell being drawn.
        cell: CellCoord,
        /// Whether `column + row` is odd.
        alternate: bool,
    },
    /// Wall face along the room's back or left edge.
    WallFace {
        /// Interior cell the face borders.
        cell: CellCoord,
        /// Edge the face rises from.
        side: WallSide,
    },
    /// Furniture piece.
    Furniture(&'a FurniturePresentation),
    /// Coin.
    Collectible(&'a CollectiblePresentation),
    /// Hotspot marker or pill.
    Indicator(&'a HotspotIndicator),
    /// Avatar body.
    Avatar(&'a AvatarPresentation),
    /// Name above the avatar.
    Nameplate(&'a AvatarPresentation),
    /// Overlay text.
    Hud(&'a HudPresentation),
}

impl DrawCommand<'_> {
    fn depth(&self) -> u32 {
        let cell = match self {
            Self::Furniture(piece) => piece.cell,
            Self::Collectible(coin) => coin.cell,
            Self::Indicator(indicator) => indicator.anchor,
            _ => return 0,
        };
        cell.column() + cell.row()
    }
}

/// Everything adapters need to paint one frame of the room.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid metrics of the room.
    pub room: RoomPresentation,
    /// Furniture in declaration order.
    pub furniture: Vec<FurniturePresentation>,
    /// Coins still lying around.
    pub collectibles: Vec<CollectiblePresentation>,
    /// Hotspot markers in declaration order.
    pub indicators: Vec<HotspotIndicator>,
    /// Avatar pose.
    pub avatar: AvatarPresentation,
    /// Overlay text.
    pub hud: HudPresentation,
    /// Seconds since the scene started animating; drives bobbing and walk cycles.
    pub animation_time: f32,
}

impl Scene {
    /// Creates a scene with no furniture, coins or indicators.
    #[must_use]
    pub fn new(room: RoomPresentation, avatar: AvatarPresentation) -> Self {
        let hud = HudPresentation {
            player_name: avatar.name.clone(),
            ..HudPresentation::default()
        };
        Self {
            room,
            furniture: Vec::new(),
            collectibles: Vec::new(),
            indicators: Vec::new(),
            avatar,
            hud,
            animation_time: 0.0,
        }
    }

    /// Lists draw operations back to front.
    ///
    /// Floor tiles come row-major, then the back and left wall faces. Furniture,
    /// coins and indicators follow, stably sorted by `column + row`, before the
    /// avatar, its nameplate and the HUD.
    #[must_use]
    pub fn draw_list(&self) -> Vec<DrawCommand<'_>> {
        let columns = self.room.columns();
        let rows = self.room.rows();
        let mut commands = vec![DrawCommand::Background];

        for row in 1..rows - 1 {
            for column in 1..columns - 1 {
                commands.push(DrawCommand::FloorTile {
                    cell: CellCoord::new(column, row),
                    alternate: (column + row) % 2 == 1,
                });
            }
        }

        commands.extend((1..columns - 1).map(|column| DrawCommand::WallFace {
            cell: CellCoord::new(column, 1),
            side: WallSide::Back,
        }));
        commands.extend((1..rows - 1).map(|row| DrawCommand::WallFace {
            cell: CellCoord::new(1, row),
            side: WallSide::Left,
        }));

        let mut entities: Vec<DrawCommand<'_>> = self
            .furniture
            .iter()
            .map(DrawCommand::Furniture)
            .chain(self.collectibles.iter().map(DrawCommand::Collectible))
            .chain(self.indicators.iter().map(DrawCommand::Indicator))
            .collect();
        entities.sort_by_key(DrawCommand::depth);
        commands.extend(entities);

        commands.push(DrawCommand::Avatar(&self.avatar));
        commands.push(DrawCommand::Nameplate(&self.avatar));
        commands.push(DrawCommand::Hud(&self.hud));
        commands
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting isometric rooms.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, per-frame
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered. Returning from `run` ends the loop; no frame runs afterwards.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The grid has no interior to draw.
    GridTooSmall {
        /// Provided column count.
        columns: u32,
        /// Provided row count.
        rows: u32,
    },
    /// Zoom must be positive and finite.
    InvalidZoom {
        /// Provided zoom factor.
        zoom: f32,
    },
    /// Scaled tile dimensions must be positive and finite.
    InvalidTileSize {
        /// Scaled tile width.
        width: f32,
        /// Scaled tile height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooSmall { columns, rows } => {
                write!(f, "room must be at least 3x3 cells (received {columns}x{rows})")
            }
            Self::InvalidZoom { zoom } => {
                write!(f, "zoom must be positive (received {zoom})")
            }
            Self::InvalidTileSize { width, height } => {
                write!(f, "tile size must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar() -> AvatarPresentation {
        let white = Color::from_rgb_u8(255, 255, 255);
        AvatarPresentation {
            position: GridPosition::new(2.0, 2.0),
            facing: Facing::South,
            moving: false,
            outfit: Outfit {
                shirt: white,
                pants: white,
                hair: white,
            },
            name: "Guest".to_owned(),
        }
    }

    #[test]
    fn room_presentation_scales_by_zoom() {
        let room = RoomPresentation::new(22, 18, 54.0, 27.0, 1.5).expect("valid room");

        assert_eq!(room.tile_width(), 81.0);
        assert_eq!(room.tile_height(), 40.5);
        assert_eq!(room.wall_height(), 75.0);
    }

    #[test]
    fn room_presentation_rejects_invalid_input_without_panicking() {
        assert_eq!(
            RoomPresentation::new(2, 8, 54.0, 27.0, 1.0),
            Err(RenderingError::GridTooSmall { columns: 2, rows: 8 })
        );
        assert!(matches!(
            RoomPresentation::new(8, 8, 54.0, 27.0, 0.0),
            Err(RenderingError::InvalidZoom { .. })
        ));
        assert_eq!(
            RenderingError::InvalidZoom { zoom: -1.0 }.to_string(),
            "zoom must be positive (received -1)"
        );
    }

    #[test]
    fn scene_new_carries_player_name_into_hud() {
        let room = RoomPresentation::new(6, 5, 54.0, 27.0, 1.0).expect("valid room");
        let scene = Scene::new(room, avatar());

        assert_eq!(scene.hud.player_name, "Guest");
        assert_eq!(scene.hud.score, 0);
        assert!(scene.furniture.is_empty());
    }

    #[test]
    fn colors_convert_from_room_palette() {
        let color = Color::from(Rgb::from_rgb(255, 0, 51));

        assert_eq!(color, Color::from_rgb_u8(255, 0, 51));
        assert_eq!(color.darken(1.0), Color::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(color.with_alpha(0.5).alpha, 0.5);
    }
}
