//! Morale economy - tiles cleared become morale, full morale becomes skill points
//!
//! Morale accumulates toward `max`. Each time it reaches `max` the excess
//! rolls over and one skill point is earned, until the skill point pool is
//! full. With a full pool, morale is pinned at zero and further rewards are
//! discarded.
//!
//! Every change is announced through [`EngineEvent::MoraleChanged`] or
//! [`EngineEvent::SkillPointsChanged`], pushed onto the caller's queue.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dragonboat_match3_types::{
    EngineEvent, SlotEffectType, SpecialEffectTrigger, DEFAULT_MAX_MORALE,
    DEFAULT_MAX_SKILL_POINTS, DEFAULT_MORALE_PER_TILE, DEFAULT_SPECIAL_MORALE_BONUS,
};

use crate::effects::trigger_count_of;

/// Economy tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoraleConfig {
    /// Morale needed for one skill point
    pub max_morale: i32,
    pub morale_per_tile: i32,
    /// Extra morale per cleared morale-boost tile
    pub special_bonus_per_trigger: i32,
    pub max_skill_points: i32,
}

impl Default for MoraleConfig {
    fn default() -> Self {
        Self {
            max_morale: DEFAULT_MAX_MORALE,
            morale_per_tile: DEFAULT_MORALE_PER_TILE,
            special_bonus_per_trigger: DEFAULT_SPECIAL_MORALE_BONUS,
            max_skill_points: DEFAULT_MAX_SKILL_POINTS,
        }
    }
}

/// Current values of the economy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoraleState {
    pub current: i32,
    pub max: i32,
    pub per_tile_reward: i32,
    pub special_bonus_per_trigger: i32,
    pub skill_points: i32,
    pub max_skill_points: i32,
}

impl From<MoraleConfig> for MoraleState {
    fn from(config: MoraleConfig) -> Self {
        Self {
            current: 0,
            max: config.max_morale,
            per_tile_reward: config.morale_per_tile,
            special_bonus_per_trigger: config.special_bonus_per_trigger,
            skill_points: 0,
            max_skill_points: config.max_skill_points,
        }
    }
}

impl Default for MoraleState {
    fn default() -> Self {
        MoraleConfig::default().into()
    }
}

/// Morale and skill point bookkeeping
#[derive(Debug, Clone, Default)]
pub struct MoraleEconomy {
    state: MoraleState,
}

impl MoraleEconomy {
    pub fn new(config: MoraleConfig) -> Self {
        Self {
            state: config.into(),
        }
    }

    pub fn state(&self) -> MoraleState {
        self.state
    }

    pub fn current(&self) -> i32 {
        self.state.current
    }

    pub fn max(&self) -> i32 {
        self.state.max
    }

    pub fn skill_points(&self) -> i32 {
        self.state.skill_points
    }

    pub fn max_skill_points(&self) -> i32 {
        self.state.max_skill_points
    }

    /// Zero morale and skill points, keeping the tuning
    pub fn reset(&mut self) {
        self.state.current = 0;
        self.state.skill_points = 0;
    }

    fn pool_full(&self) -> bool {
        self.state.skill_points >= self.state.max_skill_points
    }

    fn emit_morale(&self, delta: i32, events: &mut Vec<EngineEvent>) {
        events.push(EngineEvent::MoraleChanged {
            current: self.state.current,
            max: self.state.max,
            delta,
        });
    }

    fn emit_skill_points(&self, events: &mut Vec<EngineEvent>) {
        events.push(EngineEvent::SkillPointsChanged {
            current: self.state.skill_points,
            max: self.state.max_skill_points,
        });
    }

    /// Morale earned by a clear: base per tile plus the morale-boost bonus
    pub fn calculate_reward(&self, tile_count: usize, triggers: &[SpecialEffectTrigger]) -> i32 {
        let boosts = saturating_i32(trigger_count_of(triggers, SlotEffectType::MoraleBoost));
        let base = saturating_i32(tile_count).saturating_mul(self.state.per_tile_reward);
        let reward =
            base.saturating_add(boosts.saturating_mul(self.state.special_bonus_per_trigger));
        debug!(tile_count, boosts, reward, "morale reward");
        reward
    }

    /// Add morale and convert any overflow into skill points
    ///
    /// Non-positive amounts are ignored. With a full pool the amount is
    /// discarded and a zero-delta change is announced with morale at 0.
    pub fn add_morale(&mut self, amount: i32, events: &mut Vec<EngineEvent>) {
        if amount <= 0 {
            return;
        }

        if self.pool_full() {
            warn!(
                skill_points = self.state.skill_points,
                "skill points full, discarding morale"
            );
            self.state.current = 0;
            self.emit_morale(0, events);
            return;
        }

        self.state.current = self.state.current.saturating_add(amount);
        debug!(amount, current = self.state.current, "morale added");
        self.emit_morale(amount, events);

        self.convert_overflow(events);
    }

    fn convert_overflow(&mut self, events: &mut Vec<EngineEvent>) {
        while self.state.max > 0 && self.state.current >= self.state.max && !self.pool_full() {
            self.state.current -= self.state.max;
            self.state.skill_points += 1;
            debug!(skill_points = self.state.skill_points, "morale converted to skill point");
            self.emit_skill_points(events);

            if self.pool_full() {
                self.state.current = 0;
                self.emit_morale(0, events);
            }
        }

        if self.state.current > self.state.max {
            warn!(current = self.state.current, "morale above max, capping");
            self.state.current = self.state.max;
            self.emit_morale(0, events);
        }
    }

    /// Fill ratio of the morale bar in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.state.max <= 0 {
            return 0.0;
        }
        (self.state.current as f32 / self.state.max as f32).clamp(0.0, 1.0)
    }

    /// Spend `amount` skill points. False (and no change) if not enough.
    pub fn consume_skill_points(&mut self, amount: i32, events: &mut Vec<EngineEvent>) -> bool {
        if self.state.skill_points < amount {
            debug!(
                have = self.state.skill_points,
                need = amount,
                "not enough skill points"
            );
            return false;
        }
        self.state.skill_points -= amount;
        self.emit_skill_points(events);
        true
    }

    /// Set morale directly, clamped to what the whole pool could hold
    pub fn debug_set_morale(&mut self, value: i32, events: &mut Vec<EngineEvent>) {
        let ceiling = self
            .state
            .max
            .saturating_mul(self.state.max_skill_points)
            .max(0);
        self.state.current = value.clamp(0, ceiling);
        warn!(current = self.state.current, "debug: morale set");
        self.emit_morale(0, events);
    }

    /// Set skill points directly, clamped to the pool size
    pub fn debug_set_skill_points(&mut self, value: i32, events: &mut Vec<EngineEvent>) {
        self.state.skill_points = value.clamp(0, self.state.max_skill_points.max(0));
        warn!(skill_points = self.state.skill_points, "debug: skill points set");
        self.emit_skill_points(events);
    }

    /// Reward as if `tile_count` tiles were cleared, plus one bonus if asked
    pub fn debug_simulate_match(
        &mut self,
        tile_count: i32,
        include_bonus: bool,
        events: &mut Vec<EngineEvent>,
    ) {
        let mut reward = tile_count.saturating_mul(self.state.per_tile_reward);
        if include_bonus {
            reward = reward.saturating_add(self.state.special_bonus_per_trigger);
        }
        warn!(tile_count, include_bonus, reward, "debug: simulated match");
        self.add_morale(reward, events);
    }
}

fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
