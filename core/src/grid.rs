//! Occupancy grid shared by the generator, the world and every system.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Side length of a single grid cell expressed in world units.
pub const CELL_SIZE: f32 = 4.0;

/// Collision half-extent of a wall or platform cell.
pub const CELL_HALF_EXTENT: f32 = CELL_SIZE / 2.0;

/// Occupancy class stored in every grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open floor that agents and the player may walk on.
    #[default]
    Empty,
    /// Full-height obstacle.
    Wall,
    /// Raised block; rendered lower than a wall but blocks ground movement like one.
    Platform,
}

impl CellKind {
    /// Numeric cell code used by consumers that expect `0 | 1 | 2`.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Wall => 1,
            Self::Platform => 2,
        }
    }

    /// Reports whether the cell obstructs ground-plane movement.
    #[must_use]
    pub const fn is_obstacle(self) -> bool {
        !matches!(self, Self::Empty)
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
}

/// Dense row-major occupancy grid anchored in world space.
///
/// Cell `(column, row)` covers the square starting at
/// `(offset_x + column * CELL_SIZE, offset_z + row * CELL_SIZE)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    columns: u32,
    rows: u32,
    offset_x: f32,
    offset_z: f32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates a grid with every cell set to `kind`.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, offset_x: f32, offset_z: f32, kind: CellKind) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            offset_x,
            offset_z,
            cells: vec![kind; capacity],
        }
    }

    /// Creates a grid without any cells. Used before a maze is configured.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::filled(0, 0, 0.0, 0.0, CellKind::Empty)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// World-space x coordinate of the grid's left edge.
    #[must_use]
    pub const fn offset_x(&self) -> f32 {
        self.offset_x
    }

    /// World-space z coordinate of the grid's top edge.
    #[must_use]
    pub const fn offset_z(&self) -> f32 {
        self.offset_z
    }

    /// Returns the occupancy class stored at `cell`, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the cell at `cell`. Out-of-range coordinates are ignored.
    pub fn set(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = kind;
            }
        }
    }

    /// Reports whether `cell` lies inside the grid and is open floor.
    #[must_use]
    pub fn is_empty(&self, cell: CellCoord) -> bool {
        self.get(cell) == Some(CellKind::Empty)
    }

    /// Raw row-major cell storage.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *kind)
        })
    }

    /// Collects every open cell in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<CellCoord> {
        self.iter()
            .filter(|(_, kind)| *kind == CellKind::Empty)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Counts the cells holding `kind`.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    /// World-space center of `cell` projected onto the ground plane as `(x, z)`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            self.offset_x + (cell.column() as f32 + 0.5) * CELL_SIZE,
            self.offset_z + (cell.row() as f32 + 0.5) * CELL_SIZE,
        )
    }

    /// Returns the cell containing the world-space point, if any.
    #[must_use]
    pub fn cell_at(&self, point: Vec3) -> Option<CellCoord> {
        let column = ((point.x - self.offset_x) / CELL_SIZE).floor();
        let row = ((point.z - self.offset_z) / CELL_SIZE).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        let cell = CellCoord::new(column as u32, row as u32);
        self.index(cell).map(|_| cell)
    }

    /// First open cell found in row-major scan order.
    #[must_use]
    pub fn first_empty(&self) -> Option<CellCoord> {
        self.iter()
            .find(|(_, kind)| *kind == CellKind::Empty)
            .map(|(cell, _)| cell)
    }

    /// Marks every open cell reachable from `start` through 4-directional moves.
    ///
    /// The returned mask is indexed row-major like [`Grid::cells`]. A blocked or
    /// out-of-range start yields an all-`false` mask.
    #[must_use]
    pub fn reachable_from(&self, start: CellCoord) -> Vec<bool> {
        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];

        while let Some(cell) = stack.pop() {
            let Some(index) = self.index(cell) else {
                continue;
            };
            if visited[index] || self.cells[index] != CellKind::Empty {
                continue;
            }
            visited[index] = true;

            let column = cell.column();
            let row = cell.row();
            stack.push(CellCoord::new(column, row + 1));
            if row > 0 {
                stack.push(CellCoord::new(column, row - 1));
            }
            stack.push(CellCoord::new(column + 1, row));
            if column > 0 {
                stack.push(CellCoord::new(column - 1, row));
            }
        }

        visited
    }

    /// Open cells that cannot be reached from the first open cell in scan order.
    #[must_use]
    pub fn unreached_empty_cells(&self) -> Vec<CellCoord> {
        let Some(start) = self.first_empty() else {
            return Vec::new();
        };
        let visited = self.reachable_from(start);
        self.iter()
            .zip(visited)
            .filter(|((_, kind), seen)| *kind == CellKind::Empty && !*seen)
            .map(|((cell, _), _)| cell)
            .collect()
    }

    /// Reports whether all open cells form a single 4-connected component.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.unreached_empty_cells().is_empty()
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

/// Square playable area expressed in world units on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min_x: f32,
    max_x: f32,
    min_z: f32,
    max_z: f32,
}

impl Bounds {
    /// Creates bounds of side `area_size` centered on the world origin.
    #[must_use]
    pub fn centered(area_size: f32) -> Self {
        let half = area_size / 2.0;
        Self {
            min_x: -half,
            max_x: half,
            min_z: -half,
            max_z: half,
        }
    }

    /// Smallest admissible x coordinate.
    #[must_use]
    pub const fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Largest admissible x coordinate.
    #[must_use]
    pub const fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Smallest admissible z coordinate.
    #[must_use]
    pub const fn min_z(&self) -> f32 {
        self.min_z
    }

    /// Largest admissible z coordinate.
    #[must_use]
    pub const fn max_z(&self) -> f32 {
        self.max_z
    }

    /// Clamps the horizontal components of `point` into the bounds shrunk by `margin`.
    ///
    /// The vertical component is left untouched.
    #[must_use]
    pub fn clamp(&self, point: Vec3, margin: f32) -> Vec3 {
        Vec3::new(
            point.x.min(self.max_x - margin).max(self.min_x + margin),
            point.y,
            point.z.min(self.max_z - margin).max(self.min_z + margin),
        )
    }

    /// Reports whether `point` lies within the bounds shrunk by `margin`.
    #[must_use]
    pub fn contains(&self, point: Vec3, margin: f32) -> bool {
        point.x >= self.min_x + margin
            && point.x <= self.max_x - margin
            && point.z >= self.min_z + margin
            && point.z <= self.max_z - margin
    }
}

/// World-space obstacle derived from a wall or platform cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallInstance {
    /// Grid cell the obstacle was derived from.
    pub cell: CellCoord,
    /// Occupancy class of the source cell.
    pub kind: CellKind,
    /// Cell center on the ground plane as `(x, z)`.
    pub center: Vec2,
    /// Collision half-extent along both horizontal axes.
    pub half_extent: f32,
}

impl WallInstance {
    /// Derives the obstacle list for every wall and platform cell of `grid`.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Vec<Self> {
        grid.iter()
            .filter(|(_, kind)| kind.is_obstacle())
            .map(|(cell, kind)| Self {
                cell,
                kind,
                center: grid.cell_center(cell),
                half_extent: CELL_HALF_EXTENT,
            })
            .collect()
    }
}
