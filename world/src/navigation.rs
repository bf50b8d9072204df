//! Static walkability grid built once per room.

use iso_room_core::{CellCoord, NavigationView};
use tracing::warn;

/// Dense walkability map stored in row-major order.
///
/// The outer ring of cells forms the room's walls and is always blocked, as
/// are the declared obstacle cells. Every other cell is walkable. The grid is
/// never mutated after construction.
#[derive(Clone, Debug)]
pub(crate) struct NavigationGrid {
    columns: u32,
    rows: u32,
    walkable: Vec<bool>,
}

impl NavigationGrid {
    /// Builds a grid enclosed by walls with the provided obstacles blocked.
    pub(crate) fn enclosed(columns: u32, rows: u32, obstacles: &[CellCoord]) -> Self {
        let width = usize::try_from(columns).unwrap_or(0);
        let height = usize::try_from(rows).unwrap_or(0);
        let cell_count = width.checked_mul(height).unwrap_or(0);

        let mut grid = Self {
            columns,
            rows,
            walkable: vec![true; cell_count],
        };

        for row in 0..rows {
            for column in 0..columns {
                let on_border =
                    column == 0 || row == 0 || column + 1 == columns || row + 1 == rows;
                if on_border {
                    let _ = grid.block(CellCoord::new(column, row));
                }
            }
        }

        for &obstacle in obstacles {
            if !grid.block(obstacle) {
                warn!(%obstacle, "ignoring obstacle outside the room grid");
            }
        }

        grid
    }

    /// Reports whether the cell is walkable. Out-of-bounds cells are blocked.
    pub(crate) fn is_walkable(&self, cell: CellCoord) -> bool {
        self.view().is_walkable(cell)
    }

    pub(crate) fn view(&self) -> NavigationView<'_> {
        NavigationView::new(&self.walkable, self.columns, self.rows)
    }

    fn block(&mut self, cell: CellCoord) -> bool {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return false;
        }

        let Ok(width) = usize::try_from(self.columns) else {
            return false;
        };
        match index(width, cell).and_then(|offset| self.walkable.get_mut(offset)) {
            Some(slot) => {
                *slot = false;
                true
            }
            None => false,
        }
    }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosed_grid_blocks_every_border_cell() {
        let grid = NavigationGrid::enclosed(7, 5, &[]);

        for column in 0..7 {
            assert!(!grid.is_walkable(CellCoord::new(column, 0)));
            assert!(!grid.is_walkable(CellCoord::new(column, 4)));
        }
        for row in 0..5 {
            assert!(!grid.is_walkable(CellCoord::new(0, row)));
            assert!(!grid.is_walkable(CellCoord::new(6, row)));
        }
        assert!(grid.is_walkable(CellCoord::new(3, 2)));
    }

    #[test]
    fn obstacles_are_blocked_and_out_of_bounds_ones_ignored() {
        let obstacle = CellCoord::new(2, 2);
        let grid = NavigationGrid::enclosed(5, 5, &[obstacle, CellCoord::new(9, 9)]);

        assert!(!grid.is_walkable(obstacle));
        assert!(grid.is_walkable(CellCoord::new(1, 1)));
        assert!(!grid.is_walkable(CellCoord::new(9, 9)));
    }

    #[test]
    fn view_reports_grid_dimensions() {
        let grid = NavigationGrid::enclosed(22, 18, &[]);
        assert_eq!(grid.view().dimensions(), (22, 18));
    }
}
