//! Special effects - overlay triggers produced by a clear
//!
//! The overlay is read before the cleared cells are zeroed, so a trigger
//! always reflects the layout under the tiles that actually matched.

use serde::{Deserialize, Serialize};

use dragonboat_match3_types::{
    EngineEvent, SlotEffectType, SpecialEffectTrigger, Triggers, DEFAULT_SLOW_DOWN_PER_TRIGGER,
    DEFAULT_SPEED_BOOST_PER_TRIGGER,
};

use crate::grid::Grid;

/// Magnitudes forwarded to the race layer per triggered tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceEffectConfig {
    pub speed_boost_per_trigger: f32,
    pub slow_down_per_trigger: f32,
}

impl Default for RaceEffectConfig {
    fn default() -> Self {
        Self {
            speed_boost_per_trigger: DEFAULT_SPEED_BOOST_PER_TRIGGER,
            slow_down_per_trigger: DEFAULT_SLOW_DOWN_PER_TRIGGER,
        }
    }
}

/// Group cleared indices by the overlay effect under them
///
/// At most one trigger per effect type, ordered by effect type. Indices keep
/// the order of `cleared` (ascending when fed from `find_all_matches`).
pub fn collect_special_effects(grid: &Grid, cleared: &[usize]) -> Triggers {
    let mut triggers = Triggers::new();

    for effect_type in SlotEffectType::TRIGGERING {
        let trigger_indices: Vec<usize> = cleared
            .iter()
            .copied()
            .filter(|&i| grid.effect_at(i) == effect_type)
            .collect();

        if !trigger_indices.is_empty() {
            triggers.push(SpecialEffectTrigger {
                effect_type,
                trigger_indices,
            });
        }
    }

    triggers
}

/// Total trigger count for one effect type
pub fn trigger_count_of(triggers: &[SpecialEffectTrigger], effect_type: SlotEffectType) -> usize {
    triggers
        .iter()
        .filter(|t| t.effect_type == effect_type)
        .map(SpecialEffectTrigger::trigger_count)
        .sum()
}

/// Queue the race-facing notifications for a set of triggers
///
/// Morale boosts are settled by the economy and are not re-announced here.
pub fn race_effect_events(
    triggers: &[SpecialEffectTrigger],
    config: &RaceEffectConfig,
    events: &mut Vec<EngineEvent>,
) {
    for trigger in triggers {
        let trigger_count = trigger.trigger_count();
        match trigger.effect_type {
            SlotEffectType::SpeedUpSelf => events.push(EngineEvent::PlayerSpeedUp {
                trigger_count,
                magnitude: config.speed_boost_per_trigger,
            }),
            SlotEffectType::SlowDownEnemy => events.push(EngineEvent::PlayerSlowDownEnemy {
                trigger_count,
                magnitude: config.slow_down_per_trigger,
            }),
            SlotEffectType::MoraleBoost | SlotEffectType::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay_grid() -> Grid {
        let mut grid = Grid::new();
        grid.set_effect(22, SlotEffectType::SpeedUpSelf);
        grid.set_effect(24, SlotEffectType::MoraleBoost);
        grid.set_effect(26, SlotEffectType::SlowDownEnemy);
        grid.set_effect(30, SlotEffectType::SpeedUpSelf);
        grid
    }

    #[test]
    fn test_no_overlay_no_triggers() {
        let grid = overlay_grid();
        assert!(collect_special_effects(&grid, &[0, 1, 2]).is_empty());
    }

    #[test]
    fn test_triggers_grouped_and_ordered() {
        let grid = overlay_grid();
        let triggers = collect_special_effects(&grid, &[22, 24, 26, 30]);

        assert_eq!(triggers.len(), 3);
        assert_eq!(triggers[0].effect_type, SlotEffectType::SpeedUpSelf);
        assert_eq!(triggers[0].trigger_indices, vec![22, 30]);
        assert_eq!(triggers[1].effect_type, SlotEffectType::SlowDownEnemy);
        assert_eq!(triggers[1].trigger_indices, vec![26]);
        assert_eq!(triggers[2].effect_type, SlotEffectType::MoraleBoost);
        assert_eq!(trigger_count_of(&triggers, SlotEffectType::MoraleBoost), 1);
        assert_eq!(trigger_count_of(&triggers, SlotEffectType::None), 0);
    }

    #[test]
    fn test_race_events_skip_morale_boost() {
        let grid = overlay_grid();
        let triggers = collect_special_effects(&grid, &[22, 23, 24, 30]);
        let mut events = Vec::new();
        race_effect_events(&triggers, &RaceEffectConfig::default(), &mut events);

        assert_eq!(
            events,
            vec![EngineEvent::PlayerSpeedUp {
                trigger_count: 2,
                magnitude: 50.0
            }]
        );
    }

    #[test]
    fn test_race_events_use_config() {
        let grid = overlay_grid();
        let triggers = collect_special_effects(&grid, &[26]);
        let mut events = Vec::new();
        let config = RaceEffectConfig {
            speed_boost_per_trigger: 1.0,
            slow_down_per_trigger: 7.5,
        };
        race_effect_events(&triggers, &config, &mut events);
        assert_eq!(
            events,
            vec![EngineEvent::PlayerSlowDownEnemy {
                trigger_count: 1,
                magnitude: 7.5
            }]
        );
    }
}
