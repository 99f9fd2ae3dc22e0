//! AI skill director - decides what the two AI boats cast and when
//!
//! The director owns no clock. [`AiSkillDirector::start_race`] and
//! [`AiSkillDirector::next_interval`] return delays in seconds; the host's
//! scheduler waits that long and then asks for a cast with
//! [`AiSkillDirector::resolve_cast`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use dragonboat_match3_types::{
    AiBoat, AiSkillCast, SkillTargetType, SkillType, DEFAULT_AI_INTERVAL_MAX_SECS,
    DEFAULT_AI_INTERVAL_MIN_SECS, LOADOUT_SLOTS,
};

use crate::rng::RandomSource;
use crate::skills::{SkillLoadout, SkillTable};

/// AI scheduling settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub interval_min_secs: f32,
    pub interval_max_secs: f32,
    /// Draw fresh loadouts for both AIs at every race start
    pub randomize_each_race: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_min_secs: DEFAULT_AI_INTERVAL_MIN_SECS,
            interval_max_secs: DEFAULT_AI_INTERVAL_MAX_SECS,
            randomize_each_race: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiSkillDirector {
    loadouts: [SkillLoadout; 2],
    config: AiConfig,
}

impl AiSkillDirector {
    pub fn new(ai1: SkillLoadout, ai2: SkillLoadout, config: AiConfig) -> Self {
        let mut director = Self {
            loadouts: [ai1, ai2],
            config,
        };
        director.set_interval(config.interval_min_secs, config.interval_max_secs);
        director
    }

    pub fn config(&self) -> AiConfig {
        self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn loadout(&self, boat: AiBoat) -> SkillLoadout {
        self.loadouts[boat.index()]
    }

    pub fn set_loadout(&mut self, boat: AiBoat, loadout: SkillLoadout) {
        self.loadouts[boat.index()] = loadout;
    }

    /// Replace the interval bounds. Negative values clamp to zero and the
    /// bounds are swapped if given in the wrong order.
    pub fn set_interval(&mut self, min_secs: f32, max_secs: f32) {
        let lo = min_secs.max(0.0);
        let hi = max_secs.max(0.0);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.config.interval_min_secs = lo;
        self.config.interval_max_secs = hi;
    }

    /// Begin a race: optionally redraw loadouts, then return the first delay
    pub fn start_race<R: RandomSource>(&mut self, rng: &mut R) -> Option<f32> {
        if !self.config.enabled {
            warn!("AI skills are disabled");
            return None;
        }

        if self.config.randomize_each_race {
            self.randomize_loadouts(rng);
        }

        info!(
            ai1 = ?self.loadouts[0].slots(),
            ai2 = ?self.loadouts[1].slots(),
            "AI skill system started"
        );
        self.next_interval(rng)
    }

    /// Delay before the next AI cast, uniform in the configured bounds
    pub fn next_interval<R: RandomSource>(&self, rng: &mut R) -> Option<f32> {
        if !self.config.enabled {
            return None;
        }
        let delay = rng.next_f32_between(self.config.interval_min_secs, self.config.interval_max_secs);
        debug!(delay, "next AI skill scheduled");
        Some(delay)
    }

    /// Give each AI two distinct skills drawn from all five
    pub fn randomize_loadouts<R: RandomSource>(&mut self, rng: &mut R) {
        for loadout in self.loadouts.iter_mut() {
            let mut pool: Vec<SkillType> = SkillType::ALL.to_vec();
            let mut slots = [SkillType::EastWind; LOADOUT_SLOTS];
            for slot in slots.iter_mut() {
                let i = rng.next_range(pool.len() as u32) as usize;
                *slot = pool.remove(i);
            }
            *loadout = SkillLoadout(slots);
        }
        debug!("AI loadouts randomized");
    }

    /// Pick a caster, a slot, and a target
    ///
    /// Returns `None` when the chosen skill has no tuning in `table`.
    pub fn resolve_cast<R: RandomSource>(
        &self,
        rng: &mut R,
        table: &SkillTable,
    ) -> Option<AiSkillCast> {
        let caster = if rng.next_bool() { AiBoat::Ai1 } else { AiBoat::Ai2 };
        let slots = self.loadouts[caster.index()].slots();
        let slot = rng.next_range(slots.len() as u32) as usize;
        let skill = slots[slot];

        let Some(config) = table.config(skill) else {
            warn!(
                caster = caster.as_str(),
                skill = skill.as_str(),
                "AI cast skipped: skill has no config"
            );
            return None;
        };

        let target_type = table.target_type_of(skill);
        // Enemy skills hit the player or the other boat with equal odds
        let (target_boat, target_is_player) = match target_type {
            SkillTargetType::Caster => (caster, false),
            SkillTargetType::Enemy => (caster.other(), rng.next_bool()),
        };

        let target = if target_is_player {
            "player"
        } else {
            target_boat.as_str()
        };
        debug!(
            caster = caster.as_str(),
            slot,
            skill = skill.as_str(),
            target,
            "AI skill resolved"
        );

        Some(AiSkillCast {
            caster,
            skill,
            target_type,
            target_boat,
            target_is_player,
            config,
        })
    }
}

impl Default for AiSkillDirector {
    fn default() -> Self {
        Self::new(
            SkillLoadout::new(SkillType::EastWind, SkillType::FloodSeven),
            SkillLoadout::new(SkillType::HeavyFog, SkillType::IronChain),
            AiConfig::default(),
        )
    }
}
