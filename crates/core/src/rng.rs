//! RNG module - injectable random source for board generation and AI decisions
//!
//! Everything random in the engine (board fill, fix-up recoloring, gravity
//! refills, AI cast picks) goes through [`RandomSource`], so a seeded source
//! makes whole games reproducible.
//!
//! [`SimpleRng`] is the default: a small LCG, deterministic per seed.

use dragonboat_match3_types::TileColor;

/// Source of randomness used by the engine
///
/// Only [`next_u32`](RandomSource::next_u32) is required; the helpers derive
/// from it.
pub trait RandomSource {
    /// Generate next random u32
    fn next_u32(&mut self) -> u32;

    /// Generate random value in range [0, max). Returns 0 when `max == 0`.
    ///
    /// Uses the high bits: the low bits of an LCG have a very short period.
    fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Fair coin flip
    fn next_bool(&mut self) -> bool {
        self.next_range(2) == 1
    }

    /// Uniform float in [lo, hi]
    fn next_f32_between(&mut self, lo: f32, hi: f32) -> f32 {
        let unit = (self.next_u32() >> 8) as f32 / ((1u32 << 24) - 1) as f32;
        lo + (hi - lo) * unit
    }

    /// Uniformly random placeable color
    fn next_color(&mut self) -> TileColor {
        TileColor::PALETTE[self.next_range(TileColor::PALETTE.len() as u32) as usize]
    }

    /// Uniformly random element of a non-empty slice
    fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        Some(items[self.next_range(items.len() as u32) as usize])
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current internal state (restarting from it replays the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
