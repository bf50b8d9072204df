#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid path search and the click-to-move planner built on top of it.

use std::{cmp::Ordering, collections::BinaryHeap};

use iso_room_core::{ActorSnapshot, CellCoord, Command, NavigationView};
use tracing::debug;

/// Finds a shortest 4-directional path from `start` to `goal`.
///
/// Steps cost one unit and open cells are expanded by `steps + manhattan`,
/// oldest entry first on ties. The result starts with `start` and ends with
/// `goal`. When the goal equals the start, is blocked, lies outside the grid or
/// cannot be reached, the result is just `[start]`. Expansion never visits
/// more cells than the grid holds.
pub fn find_path<F>(
    start: CellCoord,
    goal: CellCoord,
    columns: u32,
    rows: u32,
    is_walkable: F,
) -> Vec<CellCoord>
where
    F: Fn(CellCoord) -> bool,
{
    let unreachable = vec![start];
    if start == goal || !is_walkable(goal) {
        return unreachable;
    }

    let Ok(width) = usize::try_from(columns) else {
        return unreachable;
    };
    let Ok(height) = usize::try_from(rows) else {
        return unreachable;
    };
    let Some(cell_count) = width.checked_mul(height) else {
        return unreachable;
    };
    let (Some(start_index), Some(goal_index)) = (
        index(width, columns, rows, start),
        index(width, columns, rows, goal),
    ) else {
        return unreachable;
    };

    let mut steps = vec![u32::MAX; cell_count];
    let mut parents: Vec<Option<usize>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open = BinaryHeap::new();
    let mut sequence: u64 = 0;

    steps[start_index] = 0;
    open.push(OpenCell {
        estimate: start.manhattan_distance(goal),
        sequence,
        cell: start,
        index: start_index,
    });

    let mut expansions = 0usize;
    while let Some(current) = open.pop() {
        if closed[current.index] {
            continue;
        }
        if current.index == goal_index {
            return reconstruct(&parents, width, start_index, goal_index).unwrap_or(unreachable);
        }

        closed[current.index] = true;
        expansions += 1;
        if expansions > cell_count {
            break;
        }

        let next_steps = steps[current.index].saturating_add(1);
        for neighbor in neighbors(current.cell, columns, rows) {
            if !is_walkable(neighbor) {
                continue;
            }
            let Some(neighbor_index) = index(width, columns, rows, neighbor) else {
                continue;
            };
            if closed[neighbor_index] || next_steps >= steps[neighbor_index] {
                continue;
            }

            steps[neighbor_index] = next_steps;
            parents[neighbor_index] = Some(current.index);
            sequence += 1;
            open.push(OpenCell {
                estimate: next_steps.saturating_add(neighbor.manhattan_distance(goal)),
                sequence,
                cell: neighbor,
                index: neighbor_index,
            });
        }
    }

    unreachable
}

#[derive(Clone, Copy, Debug)]
struct OpenCell {
    estimate: u32,
    sequence: u64,
    cell: CellCoord,
    index: usize,
}

impl Ord for OpenCell {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenCell {}

fn reconstruct(
    parents: &[Option<usize>],
    width: usize,
    start_index: usize,
    goal_index: usize,
) -> Option<Vec<CellCoord>> {
    let mut path = vec![cell_at(width, goal_index)?];
    let mut cursor = goal_index;
    while cursor != start_index {
        cursor = parents.get(cursor).copied().flatten()?;
        path.push(cell_at(width, cursor)?);
    }
    path.reverse();
    Some(path)
}

fn cell_at(width: usize, index: usize) -> Option<CellCoord> {
    if width == 0 {
        return None;
    }
    let column = u32::try_from(index % width).ok()?;
    let row = u32::try_from(index / width).ok()?;
    Some(CellCoord::new(column, row))
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() >= columns || cell.row() >= rows {
        return None;
    }
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

/// Pure system that turns a clicked cell into a walking plan.
#[derive(Debug, Default)]
pub struct WalkPlanner;

impl WalkPlanner {
    /// Emits [`Command::FollowPath`] toward the clicked cell when one is reachable.
    ///
    /// The clicked cell may lie anywhere, including off the grid; it is clamped
    /// into the interior first. Blocked targets and unreachable goals are
    /// dropped without emitting anything.
    pub fn handle(
        &mut self,
        clicked: Option<(i32, i32)>,
        actor: &ActorSnapshot,
        navigation: NavigationView<'_>,
        out: &mut Vec<Command>,
    ) {
        let Some((clicked_column, clicked_row)) = clicked else {
            return;
        };
        let (columns, rows) = navigation.dimensions();
        let Some(goal) = clamp_to_interior(clicked_column, clicked_row, columns, rows) else {
            return;
        };
        if !navigation.is_walkable(goal) {
            debug!(%goal, "ignoring click on a blocked cell");
            return;
        }
        let Some(start) = actor.position.nearest_cell() else {
            return;
        };

        let nodes = find_path(start, goal, columns, rows, |cell| {
            navigation.is_walkable(cell)
        });
        if nodes.len() > 1 {
            out.push(Command::FollowPath { nodes });
        } else {
            debug!(%start, %goal, "no walkable route to clicked cell");
        }
    }
}

fn clamp_to_interior(column: i32, row: i32, columns: u32, rows: u32) -> Option<CellCoord> {
    if columns < 3 || rows < 3 {
        return None;
    }
    let column = i64::from(column).clamp(1, i64::from(columns) - 2);
    let row = i64::from(row).clamp(1, i64::from(rows) - 2);
    Some(CellCoord::new(
        u32::try_from(column).ok()?,
        u32::try_from(row).ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_cell(estimate: u32, sequence: u64, column: u32) -> OpenCell {
        OpenCell {
            estimate,
            sequence,
            cell: CellCoord::new(column, 1),
            index: column as usize,
        }
    }

    #[test]
    fn open_cell_equality_follows_queue_ordering() {
        let first = open_cell(6, 2, 3);
        let same_rank = open_cell(6, 2, 5);

        assert_eq!(first.cmp(&same_rank), Ordering::Equal);
        assert_eq!(first, same_rank);
        assert_ne!(first, open_cell(6, 3, 3));
    }

    #[test]
    fn start_equal_to_goal_returns_single_node() {
        let cell = CellCoord::new(3, 3);
        assert_eq!(find_path(cell, cell, 6, 6, |_| true), vec![cell]);
    }

    #[test]
    fn straight_corridor_is_followed_cell_by_cell() {
        let path = find_path(CellCoord::new(1, 1), CellCoord::new(4, 1), 6, 3, |_| true);
        assert_eq!(
            path,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(3, 1),
                CellCoord::new(4, 1),
            ]
        );
    }

    #[test]
    fn out_of_bounds_goal_returns_start() {
        let start = CellCoord::new(1, 1);
        assert_eq!(
            find_path(start, CellCoord::new(9, 1), 4, 4, |_| true),
            vec![start]
        );
    }

    #[test]
    fn open_cells_pop_lowest_estimate_then_oldest() {
        let mut heap = BinaryHeap::new();
        let cell = CellCoord::new(0, 0);
        heap.push(OpenCell {
            estimate: 5,
            sequence: 0,
            cell,
            index: 0,
        });
        heap.push(OpenCell {
            estimate: 3,
            sequence: 2,
            cell,
            index: 1,
        });
        heap.push(OpenCell {
            estimate: 3,
            sequence: 1,
            cell,
            index: 2,
        });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|open| open.index)).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn clicked_cells_clamp_into_interior() {
        assert_eq!(
            clamp_to_interior(-4, 40, 22, 18),
            Some(CellCoord::new(1, 16))
        );
        assert_eq!(clamp_to_interior(5, 5, 2, 9), None);
    }
}
