//! Plain-text rendering of the maze and the bodies inside it.

use maze_hunt_core::{CellKind, Grid};
use maze_hunt_world::{query, World};

/// Glyph drawn for open floor.
pub const FLOOR: char = '.';
/// Glyph drawn for wall cells.
pub const WALL: char = '#';
/// Glyph drawn for raised platforms.
pub const PLATFORM: char = '=';
/// Glyph drawn for the cell holding the player.
pub const PLAYER: char = '@';
/// Glyph drawn for cells holding at least one agent.
pub const AGENT: char = 'E';

/// Renders the grid one row per line, first row on top.
#[must_use]
pub fn render_grid(grid: &Grid) -> String {
    let columns = grid.columns() as usize;
    let mut glyphs = Vec::with_capacity(grid.cells().len());
    glyphs.extend(grid.cells().iter().map(|kind| glyph(*kind)));
    join_rows(&glyphs, columns)
}

/// Renders the world's maze with agents and the player drawn on top.
#[must_use]
pub fn render_world(world: &World) -> String {
    let grid = query::grid(world);
    let columns = grid.columns() as usize;
    let mut glyphs: Vec<char> = grid.cells().iter().map(|kind| glyph(*kind)).collect();

    let mut mark = |position, symbol| {
        if let Some(cell) = grid.cell_at(position) {
            let index = cell.row() as usize * columns + cell.column() as usize;
            if let Some(slot) = glyphs.get_mut(index) {
                *slot = symbol;
            }
        }
    };
    for agent in query::agents(world) {
        mark(agent.position, AGENT);
    }
    mark(query::player_position(world), PLAYER);

    join_rows(&glyphs, columns)
}

fn glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Empty => FLOOR,
        CellKind::Wall => WALL,
        CellKind::Platform => PLATFORM,
    }
}

fn join_rows(glyphs: &[char], columns: usize) -> String {
    if columns == 0 {
        return String::new();
    }
    let mut text = String::with_capacity(glyphs.len() + glyphs.len() / columns);
    for row in glyphs.chunks(columns) {
        text.extend(row);
        text.push('\n');
    }
    text
}
