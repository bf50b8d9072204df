//! Isometric projection between grid space and screen space.

use glam::Vec2;
use iso_room_core::GridPosition;

/// Vertical nudge applied after centering so the wall tops stay in view.
const CENTERING_LIFT: f32 = 6.0;

/// Tolerance under which a solved grid coordinate snaps to the nearest integer.
const SNAP_EPSILON: f32 = 1e-4;

/// Logical size of the drawing surface together with its pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical width in points.
    pub width: f32,
    /// Logical height in points.
    pub height: f32,
    /// Physical pixels per logical point.
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Creates a new viewport descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Reports whether nothing can be drawn into the viewport.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.pixel_ratio > 0.0)
    }

    /// Size of the backing pixel buffer as `(width, height)`.
    #[must_use]
    pub fn backing_size(&self) -> (u32, u32) {
        if self.is_empty() {
            return (0, 0);
        }
        (
            (self.width * self.pixel_ratio).floor() as u32,
            (self.height * self.pixel_ratio).floor() as u32,
        )
    }
}

/// Isometric transform anchored at the top vertex of cell `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoProjection {
    origin: Vec2,
    tile_width: f32,
    tile_height: f32,
}

impl IsoProjection {
    /// Creates a projection with an explicit origin.
    #[must_use]
    pub const fn new(origin: Vec2, tile_width: f32, tile_height: f32) -> Self {
        Self {
            origin,
            tile_width,
            tile_height,
        }
    }

    /// Creates a projection whose origin centers a `columns` x `rows` grid in the viewport.
    #[must_use]
    pub fn centered(
        viewport: Viewport,
        columns: u32,
        rows: u32,
        tile_width: f32,
        tile_height: f32,
    ) -> Self {
        let half_width = tile_width / 2.0;
        let half_height = tile_height / 2.0;
        let last_column = columns.saturating_sub(1) as f32;
        let last_row = rows.saturating_sub(1) as f32;

        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for (column, row) in [
            (0.0, 0.0),
            (last_column, 0.0),
            (0.0, last_row),
            (last_column, last_row),
        ] {
            let x = (column - row) * half_width;
            let y = (column + row) * half_height;
            min = min.min(Vec2::new(x - half_width, y));
            max = max.max(Vec2::new(x + half_width, y + tile_height));
        }

        let origin = Vec2::new(
            (viewport.width / 2.0 - (min.x + max.x) / 2.0).round(),
            (viewport.height / 2.0 - (min.y + max.y) / 2.0).round() - CENTERING_LIFT,
        );
        Self::new(origin, tile_width, tile_height)
    }

    /// Screen position of the grid origin.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width of a floor diamond.
    #[must_use]
    pub const fn tile_width(&self) -> f32 {
        self.tile_width
    }

    /// Height of a floor diamond.
    #[must_use]
    pub const fn tile_height(&self) -> f32 {
        self.tile_height
    }

    /// Screen position of the top vertex of the diamond at `(column, row)`.
    #[must_use]
    pub fn to_screen(&self, column: f32, row: f32) -> Vec2 {
        Vec2::new(
            self.origin.x + (column - row) * self.tile_width / 2.0,
            self.origin.y + (column + row) * self.tile_height / 2.0,
        )
    }

    /// Screen position of a fractional grid position.
    #[must_use]
    pub fn position_to_screen(&self, position: GridPosition) -> Vec2 {
        self.to_screen(position.column(), position.row())
    }

    /// Cell whose diamond contains `point`, which may lie outside the grid.
    #[must_use]
    pub fn to_grid(&self, point: Vec2) -> (i32, i32) {
        let relative = point - self.origin;
        let a = relative.x / (self.tile_width / 2.0);
        let b = relative.y / (self.tile_height / 2.0);
        (snapped_floor((a + b) / 2.0), snapped_floor((b - a) / 2.0))
    }
}

fn snapped_floor(value: f32) -> i32 {
    let nearest = value.round();
    if (value - nearest).abs() < SNAP_EPSILON {
        nearest as i32
    } else {
        value.floor() as i32
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ProjectionKey {
    viewport: Viewport,
    columns: u32,
    rows: u32,
    tile_width: f32,
    tile_height: f32,
}

/// Remembers the centered projection for the last viewport it was asked about.
#[derive(Clone, Debug, Default)]
pub struct ProjectionCache {
    cached: Option<(ProjectionKey, IsoProjection)>,
}

impl ProjectionCache {
    /// Returns the centered projection for `viewport`, recomputing after any resize.
    ///
    /// Empty viewports yield `None`.
    pub fn projection(
        &mut self,
        viewport: Viewport,
        columns: u32,
        rows: u32,
        tile_width: f32,
        tile_height: f32,
    ) -> Option<IsoProjection> {
        if viewport.is_empty() {
            return None;
        }

        let key = ProjectionKey {
            viewport,
            columns,
            rows,
            tile_width,
            tile_height,
        };
        match self.cached {
            Some((cached_key, projection)) if cached_key == key => Some(projection),
            _ => {
                let projection =
                    IsoProjection::centered(viewport, columns, rows, tile_width, tile_height);
                self.cached = Some((key, projection));
                Some(projection)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby_projection() -> IsoProjection {
        IsoProjection::centered(Viewport::new(1280.0, 720.0, 1.0), 22, 18, 54.0, 27.0)
    }

    #[test]
    fn to_grid_inverts_to_screen_for_every_cell() {
        let projection = lobby_projection();
        for row in 0..18 {
            for column in 0..22 {
                let point = projection.to_screen(column as f32, row as f32);
                assert_eq!(projection.to_grid(point), (column, row));
            }
        }
    }

    #[test]
    fn to_grid_resolves_points_inside_the_diamond() {
        let projection = IsoProjection::new(Vec2::new(400.0, 100.0), 54.0, 27.0);
        let top = projection.to_screen(5.0, 3.0);
        let samples = [
            Vec2::new(0.0, 13.5),
            Vec2::new(-20.0, 13.5),
            Vec2::new(20.0, 13.5),
            Vec2::new(0.0, 2.0),
            Vec2::new(0.0, 25.0),
            Vec2::new(10.0, 6.0),
        ];

        for offset in samples {
            assert_eq!(projection.to_grid(top + offset), (5, 3), "offset {offset:?}");
        }
    }

    #[test]
    fn to_grid_reports_cells_outside_the_grid() {
        let projection = IsoProjection::new(Vec2::new(400.0, 100.0), 54.0, 27.0);

        assert_eq!(projection.to_grid(Vec2::new(400.0, 90.0)), (-1, -1));
    }

    #[test]
    fn centered_origin_balances_grid_extents() {
        let projection = lobby_projection();

        // Extents: x in [-486, 594], y in [0, 540].
        assert_eq!(projection.origin(), Vec2::new(586.0, 84.0));
    }

    #[test]
    fn cache_recomputes_after_resize() {
        let mut cache = ProjectionCache::default();
        let small = cache
            .projection(Viewport::new(800.0, 600.0, 1.0), 22, 18, 54.0, 27.0)
            .expect("non-empty viewport");
        let again = cache
            .projection(Viewport::new(800.0, 600.0, 1.0), 22, 18, 54.0, 27.0)
            .expect("non-empty viewport");
        let large = cache
            .projection(Viewport::new(1600.0, 900.0, 1.0), 22, 18, 54.0, 27.0)
            .expect("non-empty viewport");

        assert_eq!(small, again);
        assert_ne!(small.origin(), large.origin());
        assert_eq!(
            large,
            IsoProjection::centered(Viewport::new(1600.0, 900.0, 1.0), 22, 18, 54.0, 27.0)
        );
    }

    #[test]
    fn empty_viewports_have_no_projection() {
        let mut cache = ProjectionCache::default();

        assert!(cache
            .projection(Viewport::new(0.0, 600.0, 1.0), 22, 18, 54.0, 27.0)
            .is_none());
        assert_eq!(Viewport::new(0.0, 600.0, 2.0).backing_size(), (0, 0));
    }

    #[test]
    fn backing_size_scales_by_pixel_ratio() {
        assert_eq!(
            Viewport::new(1280.5, 720.0, 1.5).backing_size(),
            (1920, 1080)
        );
    }
}
