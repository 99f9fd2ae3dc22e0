use serde::{Deserialize, Serialize};

use dragonboat_match3_types::{EngineState, SlotEffectType, TileColor, GRID_SIZE};

use crate::grid::Grid;
use crate::morale::MoraleState;
use crate::skills::SkillLoadout;

/// Read-only copy of everything an observer needs to draw the game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Colors as rows, top row first
    pub colors: [[TileColor; GRID_SIZE]; GRID_SIZE],
    pub overlay: [[SlotEffectType; GRID_SIZE]; GRID_SIZE],
    pub state: EngineState,
    pub selected: Option<usize>,
    pub morale: MoraleState,
    pub cascade_depth: u32,
    pub player_loadout: SkillLoadout,
}

impl BoardSnapshot {
    /// Copy both grid layers into the row arrays
    pub fn write_grid(&mut self, grid: &Grid) {
        for (i, (color, effect)) in grid.colors().iter().zip(grid.overlay()).enumerate() {
            self.colors[i / GRID_SIZE][i % GRID_SIZE] = *color;
            self.overlay[i / GRID_SIZE][i % GRID_SIZE] = *effect;
        }
    }

    /// True when the engine would accept a swap
    pub fn accepts_input(&self) -> bool {
        self.state == EngineState::Idle
    }

    /// Colors as one string per row
    pub fn color_rows(&self) -> Vec<String> {
        self.colors
            .iter()
            .map(|row| row.iter().map(TileColor::as_char).collect())
            .collect()
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            colors: [[TileColor::Empty; GRID_SIZE]; GRID_SIZE],
            overlay: [[SlotEffectType::None; GRID_SIZE]; GRID_SIZE],
            state: EngineState::Idle,
            selected: None,
            morale: MoraleState::default(),
            cascade_depth: 0,
            player_loadout: SkillLoadout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_grid_maps_rows() {
        let mut grid = Grid::new();
        grid.set_color(0, TileColor::Red);
        grid.set_color(17, TileColor::Blue);
        grid.set_effect(48, SlotEffectType::MoraleBoost);

        let mut snap = BoardSnapshot::default();
        snap.write_grid(&grid);
        assert_eq!(snap.colors[0][0], TileColor::Red);
        assert_eq!(snap.colors[2][3], TileColor::Blue);
        assert_eq!(snap.overlay[6][6], SlotEffectType::MoraleBoost);
        assert_eq!(snap.color_rows()[2], "...B...");
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = BoardSnapshot::default();
        let v = serde_json::to_value(snap).unwrap();
        assert_eq!(v["state"], "idle");
        assert_eq!(v["colors"].as_array().unwrap().len(), GRID_SIZE);
        assert!(v["selected"].is_null());
        assert!(snap.accepts_input());
    }
}
