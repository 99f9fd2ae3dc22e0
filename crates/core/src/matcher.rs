//! Match detection - runs of three or more identical colors
//!
//! All scans are pure functions of a [`Grid`]. Horizontal and vertical runs
//! are found independently and unioned, so a tile sitting at the crossing of
//! an L or T shape is reported once.

use dragonboat_match3_types::{TileColor, GRID_CELLS, GRID_SIZE};

use crate::grid::Grid;

/// True if three identical non-empty colors sit at `a`, `b`, `c`
#[inline(always)]
fn is_triple(grid: &Grid, a: usize, b: usize, c: usize) -> bool {
    let color = grid.color_at(a);
    color != TileColor::Empty && grid.color_at(b) == color && grid.color_at(c) == color
}

/// True if any horizontal or vertical run of three exists. Stops at the first hit.
pub fn has_match(grid: &Grid) -> bool {
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE - 2 {
            let idx = row * GRID_SIZE + col;
            if is_triple(grid, idx, idx + 1, idx + 2) {
                return true;
            }
        }
    }

    for col in 0..GRID_SIZE {
        for row in 0..GRID_SIZE - 2 {
            let idx = row * GRID_SIZE + col;
            if is_triple(grid, idx, idx + GRID_SIZE, idx + 2 * GRID_SIZE) {
                return true;
            }
        }
    }

    false
}

/// Every index that belongs to a run of three or more, ascending
pub fn find_all_matches(grid: &Grid) -> Vec<usize> {
    let mut matched = [false; GRID_CELLS];

    // Horizontal runs
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE - 2 {
            let idx = row * GRID_SIZE + col;
            if !is_triple(grid, idx, idx + 1, idx + 2) {
                continue;
            }
            let color = grid.color_at(idx);
            matched[idx] = true;
            matched[idx + 1] = true;
            matched[idx + 2] = true;

            // Extend 4- and 5-runs
            let mut next = col + 3;
            while next < GRID_SIZE && grid.color_at(row * GRID_SIZE + next) == color {
                matched[row * GRID_SIZE + next] = true;
                next += 1;
            }
        }
    }

    // Vertical runs
    for col in 0..GRID_SIZE {
        for row in 0..GRID_SIZE - 2 {
            let idx = row * GRID_SIZE + col;
            if !is_triple(grid, idx, idx + GRID_SIZE, idx + 2 * GRID_SIZE) {
                continue;
            }
            let color = grid.color_at(idx);
            matched[idx] = true;
            matched[idx + GRID_SIZE] = true;
            matched[idx + 2 * GRID_SIZE] = true;

            let mut next = row + 3;
            while next < GRID_SIZE && grid.color_at(next * GRID_SIZE + col) == color {
                matched[next * GRID_SIZE + col] = true;
                next += 1;
            }
        }
    }

    matched
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.then_some(i))
        .collect()
}

/// First adjacent swap (right neighbour, then below) that would create a match
///
/// Probes each candidate on a scratch copy: swap, test, swap back.
pub fn find_valid_move(grid: &Grid) -> Option<(usize, usize)> {
    let mut scratch = *grid;

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let idx = row * GRID_SIZE + col;

            if col < GRID_SIZE - 1 && probe_swap(&mut scratch, idx, idx + 1) {
                return Some((idx, idx + 1));
            }

            if row < GRID_SIZE - 1 && probe_swap(&mut scratch, idx, idx + GRID_SIZE) {
                return Some((idx, idx + GRID_SIZE));
            }
        }
    }

    None
}

/// True if at least one adjacent swap would create a match (the board is not deadlocked)
pub fn has_any_valid_move(grid: &Grid) -> bool {
    find_valid_move(grid).is_some()
}

fn probe_swap(grid: &mut Grid, a: usize, b: usize) -> bool {
    grid.swap(a, b);
    let hit = has_match(grid);
    grid.swap(a, b);
    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `(row + 2*col) % 4` over the palette: no runs and no legal move.
    fn striped() -> Grid {
        let mut grid = Grid::new();
        for i in 0..GRID_CELLS {
            let (r, c) = (i / GRID_SIZE, i % GRID_SIZE);
            grid.set_color(i, TileColor::PALETTE[(r + 2 * c) % 4]);
        }
        grid
    }

    #[test]
    fn test_striped_board_has_no_match() {
        let grid = striped();
        assert!(!has_match(&grid));
        assert!(find_all_matches(&grid).is_empty());
    }

    #[test]
    fn test_striped_board_is_deadlocked() {
        assert!(!has_any_valid_move(&striped()));
        assert_eq!(find_valid_move(&striped()), None);
    }

    #[test]
    fn test_horizontal_triple() {
        let mut grid = striped();
        for i in 21..24 {
            grid.set_color(i, TileColor::Red);
        }
        assert!(has_match(&grid));
        assert_eq!(find_all_matches(&grid), vec![21, 22, 23]);
    }

    #[test]
    fn test_run_of_five_is_one_group() {
        let mut grid = Grid::new();
        for i in 0..5 {
            grid.set_color(i, TileColor::Blue);
        }
        assert_eq!(find_all_matches(&grid), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_vertical_run_of_four() {
        let mut grid = Grid::new();
        for row in 2..6 {
            grid.set_color(row * GRID_SIZE + 3, TileColor::Green);
        }
        assert_eq!(find_all_matches(&grid), vec![17, 24, 31, 38]);
    }

    #[test]
    fn test_l_shape_unions_corner_once() {
        let mut grid = Grid::new();
        // Row 0 cols 0..3 and col 0 rows 0..3
        for i in [0, 1, 2, 7, 14] {
            grid.set_color(i, TileColor::Yellow);
        }
        assert_eq!(find_all_matches(&grid), vec![0, 1, 2, 7, 14]);
    }

    #[test]
    fn test_empty_never_matches() {
        let grid = Grid::new();
        assert!(!has_match(&grid));
        assert!(find_all_matches(&grid).is_empty());
    }

    #[test]
    fn test_pair_does_not_match() {
        let mut grid = Grid::new();
        grid.set_color(0, TileColor::Red);
        grid.set_color(1, TileColor::Red);
        grid.set_color(2, TileColor::Blue);
        assert!(!has_match(&grid));
    }

    #[test]
    fn test_find_valid_move_restores_grid() {
        let mut grid = striped();
        // (1,1) becomes red. Column 1 now reads G R R from the top, so moving
        // the red at (0,0) right completes it.
        grid.set_color(8, TileColor::Red);
        let before = grid;

        assert_eq!(find_valid_move(&grid), Some((0, 1)));
        assert!(has_any_valid_move(&grid));
        assert_eq!(grid, before);
    }
}
