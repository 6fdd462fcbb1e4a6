use maze_hunt_core::{CellKind, Grid};
use maze_hunt_system_maze_generation::{generate, generate_with, AreaKind, MazeLayout};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const AREA_SIZES: [f32; 6] = [12.0, 20.0, 40.0, 64.0, 100.0, 160.0];

#[test]
fn every_generated_maze_is_connected() {
    for area_size in AREA_SIZES {
        for seed in 0..150 {
            let layout = generate(area_size, seed);
            assert!(
                layout.grid.is_connected(),
                "disconnected maze for area {area_size} seed {seed}\n{}",
                render(&layout.grid)
            );
        }
    }
}

#[test]
fn default_arena_is_twenty_five_cells_wide() {
    for seed in 0..20 {
        let layout = generate(100.0, seed);
        assert_eq!(layout.grid.columns(), 25);
        assert_eq!(layout.grid.rows(), 25);
        assert_eq!(layout.grid.offset_x(), -50.0);
        assert_eq!(layout.grid.offset_z(), -50.0);
        assert_eq!(layout.grid.cells().len(), 25 * 25);
        assert!(layout.grid.first_empty().is_some());
    }
}

#[test]
fn generation_is_deterministic_per_seed() {
    let first = generate(100.0, 0x5eed);
    let second = generate(100.0, 0x5eed);
    assert_eq!(first, second);

    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let threaded = generate_with(100.0, &mut rng);
    assert_eq!(first, threaded);
}

#[test]
fn generated_mazes_contain_varied_features() {
    let layouts: Vec<MazeLayout> = (0..40).map(|seed| generate(100.0, seed)).collect();

    assert!(layouts.iter().any(|layout| layout
        .areas
        .iter()
        .any(|area| area.kind == AreaKind::Room)));
    assert!(layouts.iter().any(|layout| layout
        .areas
        .iter()
        .any(|area| area.kind == AreaKind::Cavern)));
    assert!(layouts
        .iter()
        .any(|layout| layout.grid.count(CellKind::Platform) > 0));
    assert!(layouts
        .iter()
        .all(|layout| layout.grid.count(CellKind::Wall) > 0));
}

#[test]
fn platforms_cover_their_reported_rectangles() {
    for seed in 0..40 {
        let layout = generate(100.0, seed);
        let covered: usize = layout
            .platforms
            .iter()
            .map(|rect| (rect.width * rect.height) as usize)
            .sum();
        let platform_cells = layout.grid.count(CellKind::Platform);
        if layout.repair.is_none() {
            assert_eq!(platform_cells, covered);
        } else {
            assert!(platform_cells <= covered);
        }
    }
}

fn render(grid: &Grid) -> String {
    let mut out = String::new();
    for (cell, kind) in grid.iter() {
        out.push(match kind {
            CellKind::Empty => '.',
            CellKind::Wall => '#',
            CellKind::Platform => '=',
        });
        if cell.column() + 1 == grid.columns() {
            out.push('\n');
        }
    }
    out
}
