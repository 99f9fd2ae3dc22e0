//! Gravity - collapse empty cells and refill each column from above

use dragonboat_match3_types::{FallMove, TileColor, GRID_SIZE};

use crate::grid::Grid;
use crate::rng::RandomSource;

/// Drop every tile to the bottom of its column and spawn fresh tiles on top
///
/// Returns one [`FallMove`] per spawned tile and one per existing tile that
/// actually moved. Tiles that stay put produce no move. Spawned tiles get a
/// negative `from` (`-k` = k rows above the column) for the animation layer.
pub fn fill_empty_tiles<R: RandomSource>(grid: &mut Grid, rng: &mut R) -> Vec<FallMove> {
    let mut moves = Vec::new();

    for col in 0..GRID_SIZE {
        // Surviving tiles top to bottom, with where they came from
        let mut existing: [(usize, TileColor); GRID_SIZE] = [(0, TileColor::Empty); GRID_SIZE];
        let mut count = 0usize;
        for row in 0..GRID_SIZE {
            let idx = row * GRID_SIZE + col;
            let color = grid.color_at(idx);
            if color != TileColor::Empty {
                existing[count] = (idx, color);
                count += 1;
            }
        }

        let missing = GRID_SIZE - count;

        for row in 0..GRID_SIZE {
            let to = row * GRID_SIZE + col;
            if row < missing {
                let color = rng.next_color();
                grid.set_color(to, color);
                moves.push(FallMove {
                    from: -((missing - row) as i32),
                    to,
                    color,
                    is_new_tile: true,
                });
            } else {
                let (from, color) = existing[row - missing];
                grid.set_color(to, color);
                if from != to {
                    moves.push(FallMove {
                        from: from as i32,
                        to,
                        color,
                        is_new_tile: false,
                    });
                }
            }
        }
    }

    moves
}
