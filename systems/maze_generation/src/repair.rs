//! Connectivity repair applied after every decoration pass.

use maze_hunt_core::{CellCoord, CellKind, Grid};
use rand::Rng;

use crate::PADDING;

/// Record of the connectivity repair applied to a generated grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repair {
    /// Interior row that was opened across the whole grid.
    pub forced_row: u32,
    /// Cells whose columns were carved toward the forced row because their
    /// pocket stayed isolated after the row was opened.
    pub stitches: Vec<CellCoord>,
}

/// Makes every open cell of `grid` mutually reachable.
///
/// Returns `None` when the grid was already connected or too small to host an
/// interior row.
pub(crate) fn reconnect<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<Repair> {
    if grid.is_connected() {
        return None;
    }

    let columns = grid.columns();
    let rows = grid.rows();
    if columns <= 2 * PADDING || rows <= 2 * PADDING {
        return None;
    }

    let forced_row = PADDING + rng.gen_range(0..rows - 2 * PADDING);
    for column in PADDING..columns - PADDING {
        grid.set(CellCoord::new(column, forced_row), CellKind::Empty);
    }

    let anchor = CellCoord::new(PADDING, forced_row);
    let mut stitches = Vec::new();
    while let Some(pocket) = first_unreached(grid, anchor) {
        carve_column(grid, pocket, forced_row);
        stitches.push(pocket);
    }

    log::debug!(
        "maze was disconnected; opened row {forced_row} and stitched {} pockets",
        stitches.len()
    );

    Some(Repair {
        forced_row,
        stitches,
    })
}

fn first_unreached(grid: &Grid, anchor: CellCoord) -> Option<CellCoord> {
    let reached = grid.reachable_from(anchor);
    grid.iter()
        .zip(reached)
        .find(|((_, kind), seen)| *kind == CellKind::Empty && !*seen)
        .map(|((cell, _), _)| cell)
}

fn carve_column(grid: &mut Grid, from: CellCoord, row: u32) {
    let low = from.row().min(row);
    let high = from.row().max(row);
    for current in low..=high {
        grid.set(CellCoord::new(from.column(), current), CellKind::Empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn walled(columns: u32, rows: u32, open: &[(u32, u32)]) -> Grid {
        let mut grid = Grid::filled(columns, rows, 0.0, 0.0, CellKind::Wall);
        for (column, row) in open {
            grid.set(CellCoord::new(*column, *row), CellKind::Empty);
        }
        grid
    }

    #[test]
    fn connected_grids_are_left_alone() {
        let mut grid = walled(6, 6, &[(1, 1), (2, 1), (2, 2)]);
        let before = grid.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(reconnect(&mut grid, &mut rng), None);
        assert_eq!(grid, before);
    }

    #[test]
    fn isolated_pockets_are_joined() {
        for seed in 0..16 {
            let mut grid = walled(7, 7, &[(1, 1), (5, 5), (3, 3)]);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let repair = reconnect(&mut grid, &mut rng).expect("grid was disconnected");

            assert!(grid.is_connected());
            assert!((PADDING..7 - PADDING).contains(&repair.forced_row));
            for column in PADDING..7 - PADDING {
                assert!(grid.is_empty(CellCoord::new(column, repair.forced_row)));
            }
        }
    }

    #[test]
    fn border_pockets_are_stitched_to_the_forced_row() {
        let mut grid = walled(6, 6, &[(0, 0), (5, 5), (2, 3)]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let repair = reconnect(&mut grid, &mut rng).expect("grid was disconnected");

        assert!(grid.is_connected());
        assert!(repair.stitches.contains(&CellCoord::new(0, 0)));
        assert!(repair.stitches.contains(&CellCoord::new(5, 5)));
    }
}
