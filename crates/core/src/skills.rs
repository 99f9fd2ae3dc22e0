//! Skills - shared skill tables, loadouts, and player casting
//!
//! The tables are fixed arrays indexed by [`SkillType::index`]. A `None` entry
//! means the skill has no tuning (cannot be cast) or no declared target (falls
//! back to `Enemy`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dragonboat_match3_types::{
    EngineEvent, SkillConfig, SkillTargetType, SkillType, LOADOUT_SLOTS,
};

use crate::morale::MoraleEconomy;

/// Serializable form of the skill tables
///
/// A supplied map replaces the built-in one wholesale; skills missing from it
/// end up without an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillTableConfig {
    pub configs: BTreeMap<SkillType, SkillConfig>,
    pub targets: BTreeMap<SkillType, SkillTargetType>,
}

impl Default for SkillTableConfig {
    fn default() -> Self {
        let table = SkillTable::default();
        let configs = SkillType::ALL
            .iter()
            .filter_map(|&s| table.config(s).map(|c| (s, c)))
            .collect();
        let targets = SkillType::ALL
            .iter()
            .filter_map(|&s| table.targets[s.index()].map(|t| (s, t)))
            .collect();
        Self { configs, targets }
    }
}

/// Per-skill tuning and targeting, shared by the player and both AIs
#[derive(Debug, Clone, PartialEq)]
pub struct SkillTable {
    configs: [Option<SkillConfig>; SkillType::COUNT],
    targets: [Option<SkillTargetType>; SkillType::COUNT],
}

impl SkillTable {
    /// A table with no entries at all
    pub fn empty() -> Self {
        Self {
            configs: [None; SkillType::COUNT],
            targets: [None; SkillType::COUNT],
        }
    }

    pub fn config(&self, skill: SkillType) -> Option<SkillConfig> {
        self.configs[skill.index()]
    }

    pub fn set_config(&mut self, skill: SkillType, config: Option<SkillConfig>) {
        self.configs[skill.index()] = config;
    }

    pub fn set_target_type(&mut self, skill: SkillType, target: Option<SkillTargetType>) {
        self.targets[skill.index()] = target;
    }

    /// Declared target of `skill`, `Enemy` if the table has none
    pub fn target_type_of(&self, skill: SkillType) -> SkillTargetType {
        match self.targets[skill.index()] {
            Some(target) => target,
            None => {
                warn!(skill = skill.as_str(), "no target type for skill, defaulting to enemy");
                SkillTargetType::Enemy
            }
        }
    }
}

impl Default for SkillTable {
    fn default() -> Self {
        use SkillTargetType::{Caster, Enemy};

        let mut table = Self::empty();
        let entries = [
            (SkillType::EastWind, 5.0, 250.0, Caster),
            (SkillType::FloodSeven, 3.0, 0.0, Enemy),
            (SkillType::HeavyFog, 5.0, 0.5, Enemy),
            (SkillType::IronChain, 5.0, 4.0, Enemy),
            (SkillType::EmptyCity, 8.0, 0.0, Caster),
        ];
        for (skill, duration, effect_value, target) in entries {
            table.set_config(
                skill,
                Some(SkillConfig {
                    duration,
                    effect_value,
                }),
            );
            table.set_target_type(skill, Some(target));
        }
        table
    }
}

impl From<&SkillTableConfig> for SkillTable {
    fn from(config: &SkillTableConfig) -> Self {
        let mut table = Self::empty();
        for (&skill, &c) in &config.configs {
            table.set_config(skill, Some(c));
        }
        for (&skill, &t) in &config.targets {
            table.set_target_type(skill, Some(t));
        }
        table
    }
}

/// Two ordered skill slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillLoadout(pub [SkillType; LOADOUT_SLOTS]);

impl SkillLoadout {
    pub fn new(first: SkillType, second: SkillType) -> Self {
        Self([first, second])
    }

    pub fn get(&self, slot: usize) -> Option<SkillType> {
        self.0.get(slot).copied()
    }

    /// Overwrite a slot. Returns false for an invalid slot.
    pub fn equip(&mut self, slot: usize, skill: SkillType) -> bool {
        match self.0.get_mut(slot) {
            Some(s) => {
                *s = skill;
                true
            }
            None => false,
        }
    }

    pub fn slots(&self) -> &[SkillType; LOADOUT_SLOTS] {
        &self.0
    }
}

impl Default for SkillLoadout {
    fn default() -> Self {
        Self::new(SkillType::EastWind, SkillType::FloodSeven)
    }
}

/// The player's equipped skills and the cast path
#[derive(Debug, Clone, Default)]
pub struct SkillCaster {
    loadout: SkillLoadout,
}

impl SkillCaster {
    pub fn new(loadout: SkillLoadout) -> Self {
        Self { loadout }
    }

    pub fn loadout(&self) -> SkillLoadout {
        self.loadout
    }

    /// Skill in `slot`, `EastWind` for an invalid slot
    pub fn equipped(&self, slot: usize) -> SkillType {
        self.loadout.get(slot).unwrap_or(SkillType::EastWind)
    }

    pub fn equip(&mut self, slot: usize, skill: SkillType) {
        if !self.loadout.equip(slot, skill) {
            warn!(slot, "equip: invalid skill slot");
        }
    }

    /// Valid slot and at least one skill point
    pub fn is_available(&self, slot: usize, morale: &MoraleEconomy) -> bool {
        slot < LOADOUT_SLOTS && morale.skill_points() >= 1
    }

    /// Cast the skill in `slot`, spending one skill point
    ///
    /// Queues `SkillPointsChanged` then `SkillCast` on success. Fails without
    /// side effects on an invalid slot, an empty pool, or a skill with no
    /// tuning.
    pub fn try_cast(
        &self,
        slot: usize,
        table: &SkillTable,
        morale: &mut MoraleEconomy,
        events: &mut Vec<EngineEvent>,
    ) -> bool {
        let Some(skill) = self.loadout.get(slot) else {
            warn!(slot, "cast: invalid skill slot");
            return false;
        };

        if !self.is_available(slot, morale) {
            debug!(slot, "cast: not enough skill points");
            return false;
        }

        let Some(config) = table.config(skill) else {
            warn!(skill = skill.as_str(), "cast: skill has no config");
            return false;
        };

        if !morale.consume_skill_points(1, events) {
            return false;
        }

        debug!(
            slot,
            skill = skill.as_str(),
            duration = config.duration,
            effect_value = config.effect_value,
            "skill cast"
        );
        events.push(EngineEvent::SkillCast { skill, config });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded_economy(points: i32) -> MoraleEconomy {
        let mut morale = MoraleEconomy::default();
        morale.debug_set_skill_points(points, &mut Vec::new());
        morale
    }

    #[test]
    fn test_default_table() {
        let table = SkillTable::default();
        let east = table.config(SkillType::EastWind).unwrap();
        assert_eq!(east.duration, 5.0);
        assert_eq!(east.effect_value, 250.0);
        assert_eq!(table.target_type_of(SkillType::EastWind), SkillTargetType::Caster);
        assert_eq!(table.target_type_of(SkillType::EmptyCity), SkillTargetType::Caster);
        assert_eq!(table.target_type_of(SkillType::IronChain), SkillTargetType::Enemy);
        assert_eq!(table.config(SkillType::HeavyFog).unwrap().effect_value, 0.5);
    }

    #[test]
    fn test_missing_target_defaults_to_enemy() {
        let table = SkillTable::empty();
        assert_eq!(table.target_type_of(SkillType::EastWind), SkillTargetType::Enemy);
        assert_eq!(table.config(SkillType::EastWind), None);
    }

    #[test]
    fn test_table_config_round_trip() {
        let config = SkillTableConfig::default();
        assert_eq!(config.configs.len(), SkillType::COUNT);
        assert_eq!(SkillTable::from(&config), SkillTable::default());
    }

    #[test]
    fn test_equipped_defaults_to_east_wind() {
        let mut caster = SkillCaster::new(SkillLoadout::new(SkillType::HeavyFog, SkillType::IronChain));
        assert_eq!(caster.equipped(0), SkillType::HeavyFog);
        assert_eq!(caster.equipped(1), SkillType::IronChain);
        assert_eq!(caster.equipped(2), SkillType::EastWind);

        caster.equip(1, SkillType::EmptyCity);
        caster.equip(7, SkillType::FloodSeven);
        assert_eq!(caster.loadout().slots(), &[SkillType::HeavyFog, SkillType::EmptyCity]);
    }

    #[test]
    fn test_cast_spends_one_point() {
        let caster = SkillCaster::default();
        let table = SkillTable::default();
        let mut morale = funded_economy(2);
        let mut events = Vec::new();

        assert!(caster.try_cast(0, &table, &mut morale, &mut events));
        assert_eq!(morale.skill_points(), 1);
        assert_eq!(
            events,
            vec![
                EngineEvent::SkillPointsChanged { current: 1, max: 3 },
                EngineEvent::SkillCast {
                    skill: SkillType::EastWind,
                    config: table.config(SkillType::EastWind).unwrap(),
                },
            ]
        );
    }

    #[test]
    fn test_cast_failures_have_no_side_effects() {
        let caster = SkillCaster::default();
        let table = SkillTable::default();
        let mut events = Vec::new();

        let mut broke = MoraleEconomy::default();
        assert!(!caster.is_available(0, &broke));
        assert!(!caster.try_cast(0, &table, &mut broke, &mut events));

        let mut morale = funded_economy(1);
        assert!(!caster.try_cast(2, &table, &mut morale, &mut events));
        assert!(!caster.try_cast(0, &SkillTable::empty(), &mut morale, &mut events));

        assert!(events.is_empty());
        assert_eq!(morale.skill_points(), 1);
    }
}
