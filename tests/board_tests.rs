//! Board tests - grid, matcher and gravity through the public API

use dragonboat_match3::core::{
    fill_empty_tiles, find_all_matches, find_valid_move, has_any_valid_move, has_match,
    index_to_row_col, is_adjacent, row_col_to_index, Grid, SimpleRng,
};
use dragonboat_match3::types::{SlotEffectType, TileColor, GRID_CELLS, GRID_SIZE};

/// A full board with no runs and no legal move
const DEADLOCKED: &str = "
    RGRGRGR
    BYBYBYB
    GRGRGRG
    YBYBYBY
    RGRGRGR
    BYBYBYB
    GRGRGRG
";

#[test]
fn test_deadlocked_fixture() {
    let grid = Grid::parse(DEADLOCKED).unwrap();
    assert!(grid.colors().iter().all(|c| c.is_placeable()));
    assert!(!has_match(&grid));
    assert!(!has_any_valid_move(&grid));
    assert_eq!(find_valid_move(&grid), None);
}

#[test]
fn test_grid_out_of_bounds() {
    let mut grid = Grid::new();
    assert!(grid.is_valid_index(GRID_CELLS - 1));
    assert!(!grid.is_valid_index(GRID_CELLS));
    assert_eq!(grid.color_at(GRID_CELLS), TileColor::Empty);
    assert!(!grid.set_color(GRID_CELLS, TileColor::Blue));
    assert_eq!(grid.effect_at(1000), SlotEffectType::None);
}

#[test]
fn test_coordinates() {
    for i in 0..GRID_CELLS {
        let (r, c) = index_to_row_col(i);
        assert!(r < GRID_SIZE && c < GRID_SIZE);
        assert_eq!(row_col_to_index(r, c), i);
    }
}

#[test]
fn test_adjacency_is_symmetric() {
    for a in 0..GRID_CELLS {
        for b in 0..GRID_CELLS {
            assert_eq!(is_adjacent(a, b), is_adjacent(b, a), "{a} {b}");
        }
        assert!(!is_adjacent(a, a));
    }
    // Row ends are not neighbours of the next row's start
    assert!(!is_adjacent(13, 14));
    // Off-board indices are never neighbours
    assert!(!is_adjacent(48, 55));
    assert!(!is_adjacent(55, 48));
    assert!(!is_adjacent(GRID_CELLS, GRID_CELLS + GRID_SIZE));
}

#[test]
fn test_cross_shape_match() {
    let mut grid = Grid::new();
    // Plus sign centred on (3,3)
    for i in [17, 23, 24, 25, 31] {
        grid.set_color(i, TileColor::Yellow);
    }
    assert_eq!(find_all_matches(&grid), vec![17, 23, 24, 25, 31]);
}

#[test]
fn test_empty_breaks_runs() {
    let mut grid = Grid::new();
    for i in [42, 43, 45, 46] {
        grid.set_color(i, TileColor::Red);
    }
    assert!(!has_match(&grid));
    grid.set_color(44, TileColor::Red);
    assert_eq!(find_all_matches(&grid), vec![42, 43, 44, 45, 46]);
}

#[test]
fn test_gravity_refills_cleared_row() {
    let mut grid = Grid::parse(DEADLOCKED).unwrap();
    let top_before: Vec<TileColor> = (0..GRID_SIZE).map(|c| grid.color_at(c)).collect();
    for c in 0..GRID_SIZE {
        grid.set_color(row_col_to_index(6, c), TileColor::Empty);
    }

    let moves = fill_empty_tiles(&mut grid, &mut SimpleRng::new(2));

    assert_eq!(moves.iter().filter(|m| m.is_new_tile).count(), GRID_SIZE);
    assert_eq!(moves.iter().filter(|m| !m.is_new_tile).count(), GRID_SIZE * 6);
    for c in 0..GRID_SIZE {
        // Old top row slid down one
        assert_eq!(grid.color_at(row_col_to_index(1, c)), top_before[c]);
    }
    assert!(grid.colors().iter().all(|c| c.is_placeable()));
    for m in &moves {
        if m.is_new_tile {
            assert_eq!(m.from, -1);
        } else {
            assert_eq!(m.to as i32 - m.from, GRID_SIZE as i32);
        }
    }
}

#[test]
fn test_overlay_independent_of_colors() {
    let mut grid = Grid::parse(DEADLOCKED).unwrap();
    grid.set_effect(24, SlotEffectType::MoraleBoost);
    grid.swap(24, 25);
    assert_eq!(grid.effect_at(24), SlotEffectType::MoraleBoost);
    assert_eq!(grid.effect_at(25), SlotEffectType::None);
    grid.reset_overlay();
    assert!(grid.overlay().iter().all(|e| *e == SlotEffectType::None));
}
