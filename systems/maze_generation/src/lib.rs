#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural maze generation for Maze Hunt arenas.
//!
//! The generator scatters rooms and caverns over an open grid, links them with
//! straight corridors, sprinkles noise walls and raised platforms, and finally
//! repairs connectivity so every open cell can reach every other one.

use std::ops::RangeInclusive;

use maze_hunt_core::{CellCoord, CellKind, Grid, CELL_SIZE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

mod repair;

pub use repair::Repair;

/// Cells kept clear of areas and platforms along every edge of the grid.
pub const PADDING: u32 = 1;

/// Grids with fewer cells per side are returned fully open.
pub const MIN_CELLS_PER_SIDE: u32 = 3;

const AREA_BUFFER: u32 = 1;
const PLATFORM_BUFFER: u32 = 2;
const NOISE_WALL_PROBABILITY: f64 = 0.3;
const ROOM_PROBABILITY: f64 = 0.5;
const PLATFORM_SIDES: RangeInclusive<u32> = 3..=5;

/// Axis-aligned rectangle of grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Leftmost column.
    pub x: u32,
    /// Topmost row.
    pub z: u32,
    /// Number of columns covered.
    pub width: u32,
    /// Number of rows covered.
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle anchored at `(x, z)`.
    #[must_use]
    pub const fn new(x: u32, z: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            z,
            width,
            height,
        }
    }

    /// Cell that corridors start from when linking this rectangle to another.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(self.x + self.width / 2, self.z + self.height / 2)
    }

    /// Reports whether `cell` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= self.x
            && cell.column() < self.x + self.width
            && cell.row() >= self.z
            && cell.row() < self.z + self.height
    }
}

/// Flavour of a generated area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AreaKind {
    /// Small area enclosed by a wall ring with a single door.
    Room,
    /// Larger open area without walls.
    Cavern,
}

impl AreaKind {
    /// Side lengths an area of this kind may take.
    #[must_use]
    pub const fn side_lengths(self) -> RangeInclusive<u32> {
        match self {
            Self::Room => 3..=5,
            Self::Cavern => 5..=8,
        }
    }
}

/// Room or cavern accepted during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Area {
    /// Cells covered by the area interior.
    pub rect: Rect,
    /// Whether the area is a walled room or an open cavern.
    pub kind: AreaKind,
}

/// Result of a generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeLayout {
    /// Fully connected occupancy grid centered on the world origin.
    pub grid: Grid,
    /// Areas accepted during placement, in placement order.
    pub areas: Vec<Area>,
    /// Platforms raised after the noise pass.
    pub platforms: Vec<Rect>,
    /// Connectivity repair that was needed, if any.
    pub repair: Option<Repair>,
}

/// Generates a maze for a square area using a seeded ChaCha generator.
#[must_use]
pub fn generate(area_size: f32, seed: u64) -> MazeLayout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_with(area_size, &mut rng)
}

/// Generates a maze for a square area of side `area_size` drawing from `rng`.
///
/// The grid has `floor(area_size / CELL_SIZE)` cells per side and is offset by
/// `-area_size / 2` on both axes.
pub fn generate_with<R: Rng + ?Sized>(area_size: f32, rng: &mut R) -> MazeLayout {
    let cells = cells_per_side(area_size);
    let offset = -area_size / 2.0;
    let mut grid = Grid::filled(cells, cells, offset, offset, CellKind::Empty);

    if cells < MIN_CELLS_PER_SIDE {
        log::debug!("area size {area_size} yields {cells} cells per side; leaving the grid open");
        return MazeLayout {
            grid,
            areas: Vec::new(),
            platforms: Vec::new(),
            repair: None,
        };
    }

    let areas = place_areas(&mut grid, rng);
    join_areas(&mut grid, &areas, rng);
    scatter_noise(&mut grid, rng);
    let platforms = raise_platforms(&mut grid, rng);
    let repair = repair::reconnect(&mut grid, rng);

    log::debug!(
        "generated {cells}x{cells} maze: {} areas, {} platforms, {} walls, repaired: {}",
        areas.len(),
        platforms.len(),
        grid.count(CellKind::Wall),
        repair.is_some()
    );

    MazeLayout {
        grid,
        areas,
        platforms,
        repair,
    }
}

fn cells_per_side(area_size: f32) -> u32 {
    let cells = (area_size / CELL_SIZE).floor();
    if cells.is_finite() && cells > 0.0 {
        cells as u32
    } else {
        0
    }
}

fn random_origin<R: Rng + ?Sized>(extent: u32, side: u32, rng: &mut R) -> Option<u32> {
    let span = extent
        .checked_sub(side + 2 * PADDING)
        .filter(|span| *span > 0)?;
    Some(PADDING + rng.gen_range(0..span))
}

fn place_areas<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Vec<Area> {
    let attempts = 5 + rng.gen_range(0..4);
    let mut areas: Vec<Area> = Vec::with_capacity(attempts);

    for _ in 0..attempts {
        let kind = if rng.gen_bool(ROOM_PROBABILITY) {
            AreaKind::Room
        } else {
            AreaKind::Cavern
        };
        let width = rng.gen_range(kind.side_lengths());
        let height = rng.gen_range(kind.side_lengths());
        let x = random_origin(grid.columns(), width, rng);
        let z = random_origin(grid.rows(), height, rng);
        let (Some(x), Some(z)) = (x, z) else {
            continue;
        };

        let rect = Rect::new(x, z, width, height);
        let halo = Span::around(rect, AREA_BUFFER);
        let overlaps_previous = areas
            .iter()
            .any(|area| halo.overlaps(&Span::footprint(area)));
        if overlaps_previous || !fits(grid, rect, AREA_BUFFER) {
            continue;
        }

        if kind == AreaKind::Room {
            carve_room_ring(grid, rect);
        }
        areas.push(Area { rect, kind });
    }

    areas
}

fn fits(grid: &Grid, rect: Rect, buffer: u32) -> bool {
    if rect.x < PADDING
        || rect.z < PADDING
        || rect.x + rect.width + PADDING >= grid.columns()
        || rect.z + rect.height + PADDING >= grid.rows()
    {
        return false;
    }

    Span::around(rect, buffer)
        .cells()
        .all(|cell| grid.get(cell).map_or(true, |kind| kind == CellKind::Empty))
}

fn carve_room_ring(grid: &mut Grid, room: Rect) {
    let (Some(left), Some(top)) = (room.x.checked_sub(1), room.z.checked_sub(1)) else {
        return;
    };
    let right = room.x + room.width;
    let bottom = room.z + room.height;

    for column in left..=right {
        grid.set(CellCoord::new(column, top), CellKind::Wall);
        grid.set(CellCoord::new(column, bottom), CellKind::Wall);
    }
    for row in top..=bottom {
        grid.set(CellCoord::new(left, row), CellKind::Wall);
        grid.set(CellCoord::new(right, row), CellKind::Wall);
    }
}

/// Opens a door through opposite sides of a room ring.
fn punch_door<R: Rng + ?Sized>(grid: &mut Grid, room: Rect, rng: &mut R) {
    for cell in door_gap(room, rng) {
        grid.set(cell, CellKind::Empty);
    }
}

/// Picks the pair of ring cells a door clears, on one column or one row.
fn door_gap<R: Rng + ?Sized>(room: Rect, rng: &mut R) -> [CellCoord; 2] {
    let door_column = room.x + rng.gen_range(0..room.width.max(1));
    let door_row = room.z + rng.gen_range(0..room.height.max(1));
    if rng.gen_bool(0.5) {
        [
            CellCoord::new(door_column, room.z.saturating_sub(1)),
            CellCoord::new(door_column, room.z + room.height),
        ]
    } else {
        [
            CellCoord::new(room.x.saturating_sub(1), door_row),
            CellCoord::new(room.x + room.width, door_row),
        ]
    }
}

fn join_areas<R: Rng + ?Sized>(grid: &mut Grid, areas: &[Area], rng: &mut R) {
    for (index, area) in areas.iter().enumerate() {
        let next = &areas[(index + 1) % areas.len()];
        let from = area.rect.center();
        let to = next.rect.center();

        let corridor_row = rounded_midpoint(from.row(), to.row());
        for column in from.column().min(to.column())..=from.column().max(to.column()) {
            grid.set(CellCoord::new(column, corridor_row), CellKind::Empty);
        }

        let corridor_column = rounded_midpoint(from.column(), to.column());
        for row in from.row().min(to.row())..=from.row().max(to.row()) {
            grid.set(CellCoord::new(corridor_column, row), CellKind::Empty);
        }

        if area.kind == AreaKind::Room {
            punch_door(grid, area.rect, rng);
        }
    }
}

// Halves round up, matching `round` on non-negative midpoints.
const fn rounded_midpoint(first: u32, second: u32) -> u32 {
    (first + second + 1) / 2
}

fn scatter_noise<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let columns = grid.columns();
    let rows = grid.rows();
    if columns <= 2 * PADDING || rows <= 2 * PADDING {
        return;
    }

    let iterations = u64::from(columns) * u64::from(rows) / 10;
    for _ in 0..iterations {
        let row = PADDING + rng.gen_range(0..rows - 2 * PADDING);
        let column = PADDING + rng.gen_range(0..columns - 2 * PADDING);
        let cell = CellCoord::new(column, row);
        if grid.is_empty(cell) && rng.gen_bool(NOISE_WALL_PROBABILITY) {
            grid.set(cell, CellKind::Wall);
        }
    }
}

fn raise_platforms<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Vec<Rect> {
    let attempts = 2 + rng.gen_range(0..3);
    let mut platforms = Vec::new();

    for _ in 0..attempts {
        let width = rng.gen_range(PLATFORM_SIDES);
        let height = rng.gen_range(PLATFORM_SIDES);
        let x = random_origin(grid.columns(), width, rng);
        let z = random_origin(grid.rows(), height, rng);
        let (Some(x), Some(z)) = (x, z) else {
            continue;
        };

        let rect = Rect::new(x, z, width, height);
        if !fits(grid, rect, PLATFORM_BUFFER) {
            continue;
        }

        for row in rect.z..rect.z + rect.height {
            for column in rect.x..rect.x + rect.width {
                grid.set(CellCoord::new(column, row), CellKind::Platform);
            }
        }
        platforms.push(rect);
    }

    platforms
}

/// Inclusive cell range that may extend past the grid edges.
#[derive(Clone, Copy, Debug)]
struct Span {
    columns: (i64, i64),
    rows: (i64, i64),
}

impl Span {
    fn around(rect: Rect, buffer: u32) -> Self {
        let buffer = i64::from(buffer);
        Self {
            columns: (
                i64::from(rect.x) - buffer,
                i64::from(rect.x + rect.width) + buffer,
            ),
            rows: (
                i64::from(rect.z) - buffer,
                i64::from(rect.z + rect.height) + buffer,
            ),
        }
    }

    fn footprint(area: &Area) -> Self {
        let ring = i64::from(area.kind == AreaKind::Room);
        let rect = area.rect;
        Self {
            columns: (
                i64::from(rect.x) - ring,
                i64::from(rect.x + rect.width) - 1 + ring,
            ),
            rows: (
                i64::from(rect.z) - ring,
                i64::from(rect.z + rect.height) - 1 + ring,
            ),
        }
    }

    fn overlaps(&self, other: &Span) -> bool {
        self.columns.0 <= other.columns.1
            && other.columns.0 <= self.columns.1
            && self.rows.0 <= other.rows.1
            && other.rows.0 <= self.rows.1
    }

    fn cells(self) -> impl Iterator<Item = CellCoord> {
        let (first_column, last_column) = self.columns;
        (self.rows.0.max(0)..=self.rows.1).flat_map(move |row| {
            (first_column.max(0)..=last_column).filter_map(move |column| {
                let column = u32::try_from(column).ok()?;
                let row = u32::try_from(row).ok()?;
                Some(CellCoord::new(column, row))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_cells(room: Rect) -> Vec<CellCoord> {
        let mut cells = Vec::new();
        for column in room.x - 1..=room.x + room.width {
            cells.push(CellCoord::new(column, room.z - 1));
            cells.push(CellCoord::new(column, room.z + room.height));
        }
        for row in room.z..room.z + room.height {
            cells.push(CellCoord::new(room.x - 1, row));
            cells.push(CellCoord::new(room.x + room.width, row));
        }
        cells
    }

    #[test]
    fn room_ring_keeps_a_single_door_gap() {
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut grid = Grid::filled(12, 12, 0.0, 0.0, CellKind::Empty);
            let room = Rect::new(3, 4, 4, 3);

            carve_room_ring(&mut grid, room);
            let door = door_gap(room, &mut rng.clone());
            punch_door(&mut grid, room, &mut rng);

            let ring = ring_cells(room);
            assert_eq!(grid.count(CellKind::Wall), ring.len() - 2);
            for cell in &ring {
                let expected = if door.contains(cell) {
                    CellKind::Empty
                } else {
                    CellKind::Wall
                };
                assert_eq!(grid.get(*cell), Some(expected), "cell {cell:?}");
            }

            let vertical = door[0].column() == door[1].column();
            let horizontal = door[0].row() == door[1].row();
            assert!(vertical ^ horizontal, "door cells must face each other");
            assert!(grid.is_connected());
        }
    }

    #[test]
    fn rounded_midpoint_rounds_halves_up() {
        assert_eq!(rounded_midpoint(4, 7), 6);
        assert_eq!(rounded_midpoint(7, 4), 6);
        assert_eq!(rounded_midpoint(5, 5), 5);
        assert_eq!(rounded_midpoint(0, 1), 1);
    }

    #[test]
    fn fits_rejects_padding_and_occupied_halo() {
        let mut grid = Grid::filled(12, 12, 0.0, 0.0, CellKind::Empty);
        assert!(fits(&grid, Rect::new(1, 1, 3, 3), AREA_BUFFER));
        assert!(!fits(&grid, Rect::new(0, 1, 3, 3), AREA_BUFFER));
        assert!(!fits(&grid, Rect::new(8, 1, 3, 3), AREA_BUFFER));

        grid.set(CellCoord::new(5, 5), CellKind::Wall);
        assert!(!fits(&grid, Rect::new(6, 6, 3, 3), AREA_BUFFER));
        assert!(fits(&grid, Rect::new(7, 7, 3, 3), AREA_BUFFER));
        assert!(!fits(&grid, Rect::new(7, 7, 3, 3), PLATFORM_BUFFER));
    }

    #[test]
    fn cavern_footprints_block_later_areas() {
        let cavern = Area {
            rect: Rect::new(2, 2, 5, 5),
            kind: AreaKind::Cavern,
        };
        let touching = Span::around(Rect::new(7, 2, 3, 3), AREA_BUFFER);
        let clear = Span::around(Rect::new(8, 2, 3, 3), AREA_BUFFER);

        assert!(touching.overlaps(&Span::footprint(&cavern)));
        assert!(!clear.overlaps(&Span::footprint(&cavern)));
    }

    #[test]
    fn areas_respect_padding() {
        for seed in 0..64 {
            let layout = generate(100.0, seed);
            for area in &layout.areas {
                let range = area.kind.side_lengths();
                assert!(range.contains(&area.rect.width));
                assert!(range.contains(&area.rect.height));
                assert!(area.rect.x >= PADDING);
                assert!(area.rect.x + area.rect.width < layout.grid.columns() - PADDING);
                assert!(area.rect.z >= PADDING);
                assert!(area.rect.z + area.rect.height < layout.grid.rows() - PADDING);
            }
            for platform in &layout.platforms {
                assert!(PLATFORM_SIDES.contains(&platform.width));
                assert!(PLATFORM_SIDES.contains(&platform.height));
            }
        }
    }

    #[test]
    fn degenerate_sizes_stay_open() {
        for area_size in [0.0, 4.0, 11.9, -8.0, f32::NAN] {
            let layout = generate(area_size, 5);
            assert_eq!(layout.grid.count(CellKind::Empty), layout.grid.cells().len());
            assert!(layout.areas.is_empty());
            assert!(layout.repair.is_none());
        }
        assert_eq!(generate(8.0, 1).grid.columns(), 2);
    }
}
