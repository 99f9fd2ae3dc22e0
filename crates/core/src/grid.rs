//! Grid module - the 7x7 color board and its special-effect overlay
//!
//! Both layers are flat arrays in row-major order (`row * GRID_SIZE + col`).
//! Gameplay only ever moves colors; the overlay is a fixed terrain layer that
//! is set up before a game and stays put while tiles slide over it.

use dragonboat_match3_types::{SlotEffectType, TileColor, GRID_CELLS, GRID_SIZE};

/// Color grid plus the parallel special overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Flat array of colors, row-major order
    colors: [TileColor; GRID_CELLS],
    /// Flat array of overlay effects, same indexing as `colors`
    overlay: [SlotEffectType; GRID_CELLS],
}

impl Grid {
    /// Create a grid with every cell `Empty` and no overlay effects
    pub fn new() -> Self {
        Self {
            colors: [TileColor::Empty; GRID_CELLS],
            overlay: [SlotEffectType::None; GRID_CELLS],
        }
    }

    /// Create from a flat color array with an empty overlay
    pub fn from_colors(colors: [TileColor; GRID_CELLS]) -> Self {
        Self {
            colors,
            overlay: [SlotEffectType::None; GRID_CELLS],
        }
    }

    /// Parse a board from rows of color characters (`R`, `B`, `G`, `Y`, `.`)
    ///
    /// Whitespace is ignored. Returns `None` unless exactly `GRID_CELLS`
    /// recognised characters are present.
    pub fn parse(text: &str) -> Option<Self> {
        let mut colors = [TileColor::Empty; GRID_CELLS];
        let mut n = 0usize;
        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            if n >= GRID_CELLS {
                return None;
            }
            colors[n] = TileColor::from_str(&ch.to_string())?;
            n += 1;
        }
        (n == GRID_CELLS).then(|| Self::from_colors(colors))
    }

    #[inline]
    pub fn is_valid_index(&self, index: usize) -> bool {
        index < GRID_CELLS
    }

    /// Color at `index`, or `Empty` when out of range
    #[inline]
    pub fn color_at(&self, index: usize) -> TileColor {
        self.colors.get(index).copied().unwrap_or(TileColor::Empty)
    }

    /// Set color at `index`. Returns false if out of range.
    pub fn set_color(&mut self, index: usize, color: TileColor) -> bool {
        match self.colors.get_mut(index) {
            Some(cell) => {
                *cell = color;
                true
            }
            None => false,
        }
    }

    /// Exchange two colors in place. No adjacency check; returns false if
    /// either index is out of range.
    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= GRID_CELLS || b >= GRID_CELLS {
            return false;
        }
        self.colors.swap(a, b);
        true
    }

    /// Overlay effect at `index`, or `None` when out of range
    #[inline]
    pub fn effect_at(&self, index: usize) -> SlotEffectType {
        self.overlay.get(index).copied().unwrap_or(SlotEffectType::None)
    }

    /// Set overlay effect at `index`. Returns false if out of range.
    pub fn set_effect(&mut self, index: usize, effect: SlotEffectType) -> bool {
        match self.overlay.get_mut(index) {
            Some(cell) => {
                *cell = effect;
                true
            }
            None => false,
        }
    }

    /// Clear every overlay effect back to `None`
    pub fn reset_overlay(&mut self) {
        self.overlay = [SlotEffectType::None; GRID_CELLS];
    }

    /// Set every cell to `Empty` (overlay untouched)
    pub fn clear_colors(&mut self) {
        self.colors = [TileColor::Empty; GRID_CELLS];
    }

    pub fn colors(&self) -> &[TileColor; GRID_CELLS] {
        &self.colors
    }

    pub(crate) fn colors_mut(&mut self) -> &mut [TileColor; GRID_CELLS] {
        &mut self.colors
    }

    pub fn overlay(&self) -> &[SlotEffectType; GRID_CELLS] {
        &self.overlay
    }

    /// Render colors as 7 lines of characters (for logs and the CLI)
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(GRID_CELLS + GRID_SIZE);
        for row in self.colors.chunks(GRID_SIZE) {
            out.extend(row.iter().map(TileColor::as_char));
            out.push('\n');
        }
        out
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a flat index into `(row, col)`
#[inline]
pub fn index_to_row_col(index: usize) -> (usize, usize) {
    (index / GRID_SIZE, index % GRID_SIZE)
}

/// Join `(row, col)` into a flat index
#[inline]
pub fn row_col_to_index(row: usize, col: usize) -> usize {
    row * GRID_SIZE + col
}

/// True when `a` and `b` are orthogonal neighbours (Manhattan distance 1).
/// False if either index is off the board.
pub fn is_adjacent(a: usize, b: usize) -> bool {
    if a >= GRID_CELLS || b >= GRID_CELLS {
        return false;
    }
    let (ra, ca) = index_to_row_col(a);
    let (rb, cb) = index_to_row_col(b);
    ra.abs_diff(rb) + ca.abs_diff(cb) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new();
        for i in 0..GRID_CELLS {
            assert_eq!(grid.color_at(i), TileColor::Empty);
            assert_eq!(grid.effect_at(i), SlotEffectType::None);
        }
    }

    #[test]
    fn test_out_of_range_queries_are_neutral() {
        let mut grid = Grid::new();
        grid.set_color(0, TileColor::Red);
        assert_eq!(grid.color_at(GRID_CELLS), TileColor::Empty);
        assert_eq!(grid.effect_at(GRID_CELLS + 10), SlotEffectType::None);
        assert!(!grid.set_color(GRID_CELLS, TileColor::Red));
        assert!(!grid.set_effect(GRID_CELLS, SlotEffectType::MoraleBoost));
        assert!(!grid.swap(0, GRID_CELLS));
        assert_eq!(grid.color_at(0), TileColor::Red);
    }

    #[test]
    fn test_swap_exchanges_colors_only() {
        let mut grid = Grid::new();
        grid.set_color(3, TileColor::Red);
        grid.set_color(40, TileColor::Blue);
        grid.set_effect(3, SlotEffectType::MoraleBoost);

        assert!(grid.swap(3, 40));
        assert_eq!(grid.color_at(3), TileColor::Blue);
        assert_eq!(grid.color_at(40), TileColor::Red);
        assert_eq!(grid.effect_at(3), SlotEffectType::MoraleBoost);
        assert_eq!(grid.effect_at(40), SlotEffectType::None);
    }

    #[test]
    fn test_row_col_round_trip() {
        assert_eq!(index_to_row_col(0), (0, 0));
        assert_eq!(index_to_row_col(17), (2, 3));
        assert_eq!(index_to_row_col(48), (6, 6));
        assert_eq!(row_col_to_index(2, 3), 17);
        assert_eq!(row_col_to_index(6, 6), 48);
    }

    #[test]
    fn test_is_adjacent() {
        assert!(is_adjacent(0, 1));
        assert!(is_adjacent(0, 7));
        assert!(is_adjacent(24, 17));
        assert!(!is_adjacent(0, 8), "diagonal");
        assert!(!is_adjacent(5, 5), "self");
        assert!(!is_adjacent(6, 7), "row wrap");
        assert!(!is_adjacent(0, 2));
    }

    #[test]
    fn test_parse_and_to_text() {
        let text = "RBGYRBG\n\
                    BGYRBGY\n\
                    GYRBGYR\n\
                    YRBGYRB\n\
                    RBGYRBG\n\
                    BGYRBGY\n\
                    GYRBGY.\n";
        let grid = Grid::parse(text).unwrap();
        assert_eq!(grid.color_at(0), TileColor::Red);
        assert_eq!(grid.color_at(8), TileColor::Green);
        assert_eq!(grid.color_at(48), TileColor::Empty);
        assert_eq!(grid.to_text(), text.replace(' ', ""));

        assert!(Grid::parse("RBG").is_none());
        assert!(Grid::parse(&"X".repeat(GRID_CELLS)).is_none());
        assert!(Grid::parse(&"R".repeat(GRID_CELLS + 1)).is_none());
    }
}
