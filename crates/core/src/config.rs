//! Engine configuration - every tunable value in one serde document
//!
//! All sections default, so a JSON file only needs the keys it overrides:
//!
//! ```
//! use dragonboat_match3_core::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "morale": { "morale_per_tile": 8 } }"#).unwrap();
//! assert_eq!(config.morale.morale_per_tile, 8);
//! assert_eq!(config.morale.max_morale, 100);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use dragonboat_match3_types::{SkillType, SlotEffectType, GRID_CELLS};

use crate::ai::AiConfig;
use crate::effects::RaceEffectConfig;
use crate::error::ConfigError;
use crate::generator::GeneratorLimits;
use crate::morale::MoraleConfig;
use crate::skills::{SkillLoadout, SkillTableConfig};

/// One overlay cell of a special-area layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialArea {
    pub index: usize,
    pub effect: SlotEffectType,
}

/// Layout used when nothing else has been applied
pub const DEFAULT_SPECIAL_AREAS: [SpecialArea; 3] = [
    SpecialArea {
        index: 22,
        effect: SlotEffectType::SpeedUpSelf,
    },
    SpecialArea {
        index: 24,
        effect: SlotEffectType::MoraleBoost,
    },
    SpecialArea {
        index: 26,
        effect: SlotEffectType::SlowDownEnemy,
    },
];

/// Skill slots for the three boats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadoutConfig {
    pub player: SkillLoadout,
    pub ai1: SkillLoadout,
    pub ai2: SkillLoadout,
}

impl Default for LoadoutConfig {
    fn default() -> Self {
        Self {
            player: SkillLoadout::new(SkillType::EastWind, SkillType::FloodSeven),
            ai1: SkillLoadout::new(SkillType::EastWind, SkillType::FloodSeven),
            ai2: SkillLoadout::new(SkillType::HeavyFog, SkillType::IronChain),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub morale: MoraleConfig,
    pub race: RaceEffectConfig,
    pub generator: GeneratorLimits,
    pub skills: SkillTableConfig,
    pub loadouts: LoadoutConfig,
    pub ai: AiConfig,
    /// Overlay layout applied at construction; `None` keeps the built-in one
    pub special_areas: Option<Vec<SpecialArea>>,
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.morale;
        if m.max_morale <= 0 {
            return Err(ConfigError::invalid("morale.max_morale", "must be positive"));
        }
        if m.morale_per_tile < 0 {
            return Err(ConfigError::invalid("morale.morale_per_tile", "must not be negative"));
        }
        if m.special_bonus_per_trigger < 0 {
            return Err(ConfigError::invalid(
                "morale.special_bonus_per_trigger",
                "must not be negative",
            ));
        }
        if m.max_skill_points < 0 {
            return Err(ConfigError::invalid("morale.max_skill_points", "must not be negative"));
        }

        if self.generator.max_attempts == 0 {
            return Err(ConfigError::invalid("generator.max_attempts", "must be at least 1"));
        }
        if self.generator.max_fix_passes == 0 {
            return Err(ConfigError::invalid("generator.max_fix_passes", "must be at least 1"));
        }

        let ai = &self.ai;
        if !ai.interval_min_secs.is_finite() || !ai.interval_max_secs.is_finite() {
            return Err(ConfigError::invalid("ai.interval", "bounds must be finite"));
        }
        if ai.interval_min_secs < 0.0 || ai.interval_max_secs < 0.0 {
            return Err(ConfigError::invalid("ai.interval", "bounds must not be negative"));
        }
        if ai.interval_min_secs > ai.interval_max_secs {
            return Err(ConfigError::invalid(
                "ai.interval",
                format!(
                    "min {} is greater than max {}",
                    ai.interval_min_secs, ai.interval_max_secs
                ),
            ));
        }

        for (skill, c) in &self.skills.configs {
            if !c.duration.is_finite() || c.duration < 0.0 {
                return Err(ConfigError::invalid(
                    "skills.configs",
                    format!("{} has an invalid duration {}", skill.as_str(), c.duration),
                ));
            }
        }

        if let Some(areas) = &self.special_areas {
            if let Some(bad) = areas.iter().find(|a| a.index >= GRID_CELLS) {
                return Err(ConfigError::invalid(
                    "special_areas",
                    format!("index {} is outside the board", bad.index),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragonboat_match3_types::SkillTargetType;

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let config = EngineConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_sections() {
        let json = r#"{
            "ai": { "enabled": false },
            "loadouts": { "player": ["heavy_fog", "empty_city"] },
            "skills": { "targets": { "heavy_fog": "self" } },
            "special_areas": [ { "index": 3, "effect": "morale_boost" } ]
        }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.interval_max_secs, 20.0);
        assert_eq!(
            config.loadouts.player,
            SkillLoadout::new(SkillType::HeavyFog, SkillType::EmptyCity)
        );
        assert_eq!(config.loadouts.ai2, LoadoutConfig::default().ai2);
        assert_eq!(
            config.skills.targets.get(&SkillType::HeavyFog),
            Some(&SkillTargetType::Caster)
        );
        assert_eq!(config.skills.configs.len(), SkillType::COUNT);
        assert_eq!(
            config.special_areas,
            Some(vec![SpecialArea {
                index: 3,
                effect: SlotEffectType::MoraleBoost
            }])
        );
    }

    #[test]
    fn test_rejects_invalid_values() {
        let cases = [
            r#"{ "morale": { "max_morale": 0 } }"#,
            r#"{ "morale": { "morale_per_tile": -1 } }"#,
            r#"{ "ai": { "interval_min_secs": 30.0, "interval_max_secs": 5.0 } }"#,
            r#"{ "generator": { "max_attempts": 0 } }"#,
            r#"{ "special_areas": [ { "index": 49, "effect": "speed_up_self" } ] }"#,
        ];
        for json in cases {
            assert!(
                matches!(EngineConfig::from_json_str(json), Err(ConfigError::Invalid { .. })),
                "{json}"
            );
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
