//! Board generator - random boards with no match at rest and at least one legal move
//!
//! Each attempt fills the board at random, then runs local fix-up passes that
//! recolor any tile sitting inside a run of three. The result is validated with
//! [`has_match`] and [`has_any_valid_move`]; a board failing either check is
//! thrown away and the next attempt starts from scratch.
//!
//! Running out of attempts is a soft failure: the last board stays in place and
//! the caller decides what to do with the [`GenerationReport`].

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dragonboat_match3_types::{
    TileColor, DEFAULT_GENERATOR_ATTEMPTS, DEFAULT_GENERATOR_FIX_PASSES, GRID_CELLS, GRID_SIZE,
};

use crate::grid::Grid;
use crate::matcher::{has_any_valid_move, has_match};
use crate::rng::RandomSource;

/// Retry budgets for [`generate_board`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorLimits {
    /// Full random refills before giving up
    pub max_attempts: u32,
    /// Fix-up passes per attempt
    pub max_fix_passes: u32,
}

impl Default for GeneratorLimits {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_GENERATOR_ATTEMPTS,
            max_fix_passes: DEFAULT_GENERATOR_FIX_PASSES,
        }
    }
}

/// Outcome of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Whether the final board passed both checks
    pub accepted: bool,
    /// Attempts used, including the accepted one
    pub attempts: u32,
}

/// Recolor the grid in place. The overlay is left untouched.
pub fn generate_board<R: RandomSource>(
    grid: &mut Grid,
    rng: &mut R,
    limits: GeneratorLimits,
) -> GenerationReport {
    let mut attempts = 0u32;

    while attempts < limits.max_attempts {
        attempts += 1;

        for cell in grid.colors_mut().iter_mut() {
            *cell = rng.next_color();
        }

        let passes = fix_up(grid, rng, limits.max_fix_passes);

        if has_match(grid) {
            debug!(attempt = attempts, passes, "generated board still has a match, retrying");
            continue;
        }

        if !has_any_valid_move(grid) {
            debug!(attempt = attempts, "generated board is deadlocked, retrying");
            continue;
        }

        debug!(attempt = attempts, passes, "board accepted");
        return GenerationReport {
            accepted: true,
            attempts,
        };
    }

    warn!(
        attempts,
        "board generation exhausted its retry budget, keeping last board"
    );
    GenerationReport {
        accepted: false,
        attempts,
    }
}

/// Run fix-up passes until one flags nothing or `max_passes` is reached.
/// Returns the number of passes run.
fn fix_up<R: RandomSource>(grid: &mut Grid, rng: &mut R, max_passes: u32) -> u32 {
    let mut passes = 0u32;
    let mut had_matches = true;

    while had_matches && passes < max_passes {
        had_matches = false;
        passes += 1;

        for idx in 0..GRID_CELLS {
            if !in_run(grid, idx) {
                continue;
            }
            had_matches = true;
            let replacement = safe_color(grid, idx, rng);
            grid.set_color(idx, replacement);
        }
    }

    passes
}

/// True if `idx` is part of a run of three through any of its six windows
fn in_run(grid: &Grid, idx: usize) -> bool {
    let color = grid.color_at(idx);
    if color == TileColor::Empty {
        return false;
    }

    let (row, col) = (idx / GRID_SIZE, idx % GRID_SIZE);
    let same = |i: usize| grid.color_at(i) == color;
    let n = GRID_SIZE;

    (col >= 2 && same(idx - 1) && same(idx - 2))
        || (col >= 1 && col < n - 1 && same(idx - 1) && same(idx + 1))
        || (col < n - 2 && same(idx + 1) && same(idx + 2))
        || (row >= 2 && same(idx - n) && same(idx - 2 * n))
        || (row >= 1 && row < n - 1 && same(idx - n) && same(idx + n))
        || (row < n - 2 && same(idx + n) && same(idx + 2 * n))
}

/// Pick a color for `idx` that avoids its current color and any 2-run
/// directly to the left or above. Falls back to any color if none is left.
fn safe_color<R: RandomSource>(grid: &Grid, idx: usize, rng: &mut R) -> TileColor {
    let (row, col) = (idx / GRID_SIZE, idx % GRID_SIZE);
    let current = grid.color_at(idx);

    let left_pair = (col >= 2 && grid.color_at(idx - 1) == grid.color_at(idx - 2))
        .then(|| grid.color_at(idx - 1));
    let above_pair = (row >= 2
        && grid.color_at(idx - GRID_SIZE) == grid.color_at(idx - 2 * GRID_SIZE))
    .then(|| grid.color_at(idx - GRID_SIZE));

    let candidates: ArrayVec<TileColor, 4> = TileColor::PALETTE
        .iter()
        .copied()
        .filter(|c| *c != current && Some(*c) != left_pair && Some(*c) != above_pair)
        .collect();

    rng.pick(&candidates).unwrap_or_else(|| rng.next_color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    #[test]
    fn test_generated_board_is_valid() {
        let mut grid = Grid::new();
        let report = generate_board(&mut grid, &mut SimpleRng::new(12345), GeneratorLimits::default());
        assert!(report.accepted);
        assert!(report.attempts >= 1);
        assert!(!has_match(&grid));
        assert!(has_any_valid_move(&grid));
        assert!(grid.colors().iter().all(|c| c.is_placeable()));
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let mut a = Grid::new();
        let mut b = Grid::new();
        generate_board(&mut a, &mut SimpleRng::new(77), GeneratorLimits::default());
        generate_board(&mut b, &mut SimpleRng::new(77), GeneratorLimits::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_generation_preserves_overlay() {
        let mut grid = Grid::new();
        grid.set_effect(24, dragonboat_match3_types::SlotEffectType::MoraleBoost);
        generate_board(&mut grid, &mut SimpleRng::new(3), GeneratorLimits::default());
        assert_eq!(
            grid.effect_at(24),
            dragonboat_match3_types::SlotEffectType::MoraleBoost
        );
    }

    #[test]
    fn test_zero_budget_is_soft_failure() {
        let mut grid = Grid::new();
        let report = generate_board(
            &mut grid,
            &mut SimpleRng::new(3),
            GeneratorLimits {
                max_attempts: 0,
                max_fix_passes: 10,
            },
        );
        assert!(!report.accepted);
        assert_eq!(report.attempts, 0);
    }

    #[test]
    fn test_in_run_windows() {
        let mut grid = Grid::new();
        for i in [10, 11, 12] {
            grid.set_color(i, TileColor::Red);
        }
        assert!(in_run(&grid, 10));
        assert!(in_run(&grid, 11));
        assert!(in_run(&grid, 12));
        assert!(!in_run(&grid, 13));
        assert!(!in_run(&grid, 9));
    }

    #[test]
    fn test_safe_color_avoids_pairs() {
        let mut grid = Grid::new();
        // Left pair of Blue at (2,0),(2,1), above pair of Green at (0,2),(1,2)
        grid.set_color(14, TileColor::Blue);
        grid.set_color(15, TileColor::Blue);
        grid.set_color(2, TileColor::Green);
        grid.set_color(9, TileColor::Green);
        grid.set_color(16, TileColor::Red);

        let mut rng = SimpleRng::new(8);
        for _ in 0..50 {
            assert_eq!(safe_color(&grid, 16, &mut rng), TileColor::Yellow);
        }
    }

    #[test]
    fn test_fix_up_clears_runs() {
        let mut grid = Grid::from_colors([TileColor::Red; GRID_CELLS]);
        let mut rng = SimpleRng::new(21);
        fix_up(&mut grid, &mut rng, 200);
        assert!(!has_match(&grid));
    }
}
