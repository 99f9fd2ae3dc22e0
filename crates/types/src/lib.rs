//! Core types module - shared data structures and constants
//!
//! This crate defines the plain data used throughout the match-three engine:
//! tile colors, overlay effects, engine states, skills, and the event records
//! the engine emits. Everything here is pure data with serde support so the
//! same values can be logged, snapshotted, or forwarded to a UI layer.
//!
//! # Board Dimensions
//!
//! The puzzle board is a fixed square:
//!
//! - **Side**: 7 cells
//! - **Cells**: 49, stored row-major (`row * GRID_SIZE + col`)
//!
//! # Economy Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_MAX_MORALE` | 100 | Morale needed for one skill point |
//! | `DEFAULT_MORALE_PER_TILE` | 5 | Morale per cleared tile |
//! | `DEFAULT_SPECIAL_MORALE_BONUS` | 20 | Extra morale per cleared morale-boost tile |
//! | `DEFAULT_MAX_SKILL_POINTS` | 3 | Skill point pool size |
//! | `DEFAULT_SPEED_BOOST_PER_TRIGGER` | 50.0 | Race speed-up per trigger |
//! | `DEFAULT_SLOW_DOWN_PER_TRIGGER` | 30.0 | Race slow-down per trigger |
//!
//! # Examples
//!
//! ```
//! use dragonboat_match3_types::{SkillType, TileColor, GRID_CELLS, GRID_SIZE};
//!
//! assert_eq!(GRID_SIZE, 7);
//! assert_eq!(GRID_CELLS, 49);
//!
//! assert_eq!(TileColor::from_str("red"), Some(TileColor::Red));
//! assert!(!TileColor::Empty.is_placeable());
//!
//! assert_eq!(SkillType::from_str("eastWind"), Some(SkillType::EastWind));
//! assert_eq!(SkillType::HeavyFog.index(), 2);
//! ```

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Board side length in cells
pub const GRID_SIZE: usize = 7;

/// Total number of cells on the board
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// Number of skill slots per caster
pub const LOADOUT_SLOTS: usize = 2;

/// Morale needed to earn one skill point
pub const DEFAULT_MAX_MORALE: i32 = 100;

/// Morale earned per cleared tile
pub const DEFAULT_MORALE_PER_TILE: i32 = 5;

/// Extra morale per cleared morale-boost overlay tile
pub const DEFAULT_SPECIAL_MORALE_BONUS: i32 = 20;

/// Size of the skill point pool
pub const DEFAULT_MAX_SKILL_POINTS: i32 = 3;

/// Race speed-up magnitude per triggered speed-up tile
pub const DEFAULT_SPEED_BOOST_PER_TRIGGER: f32 = 50.0;

/// Race slow-down magnitude per triggered slow-down tile
pub const DEFAULT_SLOW_DOWN_PER_TRIGGER: f32 = 30.0;

/// Default lower bound of the AI cast interval (seconds)
pub const DEFAULT_AI_INTERVAL_MIN_SECS: f32 = 10.0;

/// Default upper bound of the AI cast interval (seconds)
pub const DEFAULT_AI_INTERVAL_MAX_SECS: f32 = 20.0;

/// Board generator outer retry budget
pub const DEFAULT_GENERATOR_ATTEMPTS: u32 = 100;

/// Board generator fix-up pass budget per attempt
pub const DEFAULT_GENERATOR_FIX_PASSES: u32 = 200;

/// Color of a single tile
///
/// `Empty` only exists transiently between a clear and the following gravity
/// fill, and never takes part in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileColor {
    Red,
    Blue,
    Green,
    Yellow,
    #[default]
    Empty,
}

impl TileColor {
    /// The four colors that can be placed on the board
    pub const PALETTE: [TileColor; 4] = [
        TileColor::Red,
        TileColor::Blue,
        TileColor::Green,
        TileColor::Yellow,
    ];

    /// True for every color except `Empty`
    pub fn is_placeable(&self) -> bool {
        !matches!(self, TileColor::Empty)
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use dragonboat_match3_types::TileColor;
    ///
    /// assert_eq!(TileColor::from_str("Blue"), Some(TileColor::Blue));
    /// assert_eq!(TileColor::from_str("purple"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" | "r" => Some(TileColor::Red),
            "blue" | "b" => Some(TileColor::Blue),
            "green" | "g" => Some(TileColor::Green),
            "yellow" | "y" => Some(TileColor::Yellow),
            "empty" | "." => Some(TileColor::Empty),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileColor::Red => "red",
            TileColor::Blue => "blue",
            TileColor::Green => "green",
            TileColor::Yellow => "yellow",
            TileColor::Empty => "empty",
        }
    }

    /// Single character used by text renderings of the board
    pub fn as_char(&self) -> char {
        match self {
            TileColor::Red => 'R',
            TileColor::Blue => 'B',
            TileColor::Green => 'G',
            TileColor::Yellow => 'Y',
            TileColor::Empty => '.',
        }
    }
}

/// Fixed, position-bound modifier triggered when the tile on top of it clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotEffectType {
    #[default]
    None,
    SpeedUpSelf,
    SlowDownEnemy,
    MoraleBoost,
}

impl SlotEffectType {
    /// Effect types that can actually trigger, in ordinal order
    pub const TRIGGERING: [SlotEffectType; 3] = [
        SlotEffectType::SpeedUpSelf,
        SlotEffectType::SlowDownEnemy,
        SlotEffectType::MoraleBoost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotEffectType::None => "none",
            SlotEffectType::SpeedUpSelf => "speed_up_self",
            SlotEffectType::SlowDownEnemy => "slow_down_enemy",
            SlotEffectType::MoraleBoost => "morale_boost",
        }
    }
}

/// State of the cascade state machine
///
/// The states named after animations (`Swapping`, `RevertingSwap`, `Clearing`,
/// `Falling`) wait for the presentation layer to call `advance()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    #[default]
    Idle,
    Swapping,
    RevertingSwap,
    CheckMatching,
    Clearing,
    Falling,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Swapping => "swapping",
            EngineState::RevertingSwap => "reverting_swap",
            EngineState::CheckMatching => "check_matching",
            EngineState::Clearing => "clearing",
            EngineState::Falling => "falling",
        }
    }
}

/// Castable abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    EastWind,
    FloodSeven,
    HeavyFog,
    IronChain,
    EmptyCity,
}

impl SkillType {
    /// Number of skill types (size of the per-skill tables)
    pub const COUNT: usize = 5;

    pub const ALL: [SkillType; SkillType::COUNT] = [
        SkillType::EastWind,
        SkillType::FloodSeven,
        SkillType::HeavyFog,
        SkillType::IronChain,
        SkillType::EmptyCity,
    ];

    /// Ordinal used to index the per-skill tables
    pub fn index(&self) -> usize {
        match self {
            SkillType::EastWind => 0,
            SkillType::FloodSeven => 1,
            SkillType::HeavyFog => 2,
            SkillType::IronChain => 3,
            SkillType::EmptyCity => 4,
        }
    }

    /// Parse skill type from string (case-insensitive, accepts camelCase and snake_case)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "").as_str() {
            "eastwind" => Some(SkillType::EastWind),
            "floodseven" => Some(SkillType::FloodSeven),
            "heavyfog" => Some(SkillType::HeavyFog),
            "ironchain" => Some(SkillType::IronChain),
            "emptycity" => Some(SkillType::EmptyCity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillType::EastWind => "east_wind",
            SkillType::FloodSeven => "flood_seven",
            SkillType::HeavyFog => "heavy_fog",
            SkillType::IronChain => "iron_chain",
            SkillType::EmptyCity => "empty_city",
        }
    }
}

/// Who a skill applies to
///
/// `Caster` is the buff case (serialized as `"self"`), `Enemy` the debuff case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTargetType {
    #[serde(rename = "self")]
    Caster,
    Enemy,
}

/// The two AI-controlled boats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiBoat {
    Ai1,
    Ai2,
}

impl AiBoat {
    /// The other AI boat
    pub fn other(&self) -> Self {
        match self {
            AiBoat::Ai1 => AiBoat::Ai2,
            AiBoat::Ai2 => AiBoat::Ai1,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            AiBoat::Ai1 => 0,
            AiBoat::Ai2 => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiBoat::Ai1 => "ai1",
            AiBoat::Ai2 => "ai2",
        }
    }
}

/// Tuning for a single skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Effect duration in seconds
    pub duration: f32,
    /// Skill-specific magnitude (speed bonus, fog opacity, locked cells, ...)
    pub effect_value: f32,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            duration: 5.0,
            effect_value: 100.0,
        }
    }
}

/// One tile's gravity motion
///
/// `from` is a real grid index for existing tiles. For tiles spawned to refill
/// a column it is `-k`, meaning "k rows above the top of the column"; it is an
/// animation offset only, not a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FallMove {
    pub from: i32,
    pub to: usize,
    pub color: TileColor,
    pub is_new_tile: bool,
}

/// All cleared indices sharing one overlay effect type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecialEffectTrigger {
    pub effect_type: SlotEffectType,
    /// Ascending grid indices that triggered the effect
    pub trigger_indices: Vec<usize>,
}

impl SpecialEffectTrigger {
    pub fn trigger_count(&self) -> usize {
        self.trigger_indices.len()
    }
}

/// Triggers for a single clear: at most one per triggering effect type
pub type Triggers = ArrayVec<SpecialEffectTrigger, 3>;

/// A resolved AI cast, ready for the race layer to apply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiSkillCast {
    pub caster: AiBoat,
    pub skill: SkillType,
    pub target_type: SkillTargetType,
    /// Target boat when the target is an AI. Equals `caster` for self-target skills
    /// and is meaningless when `target_is_player` is set.
    pub target_boat: AiBoat,
    pub target_is_player: bool,
    pub config: SkillConfig,
}

/// Notification emitted by the engine
///
/// The engine queues these in order; the host drains them and maps each onto
/// its own animation or race-simulation hooks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A fresh board was generated; the UI should rebuild every tile and overlay marker.
    BoardInitialized,
    /// Play the swap animation. `succeeded == false` means swap out and back.
    SwapAnimation { a: usize, b: usize, succeeded: bool },
    /// Play the clear animation. `triggers` may be empty.
    MatchesCleared {
        cleared: Vec<usize>,
        triggers: Triggers,
    },
    /// Play the gravity animation.
    FallAnimation { moves: Vec<FallMove> },
    /// The board was deadlocked and has been regenerated in place.
    BoardReshuffled,
    MoraleChanged { current: i32, max: i32, delta: i32 },
    SkillPointsChanged { current: i32, max: i32 },
    PlayerSpeedUp { trigger_count: usize, magnitude: f32 },
    PlayerSlowDownEnemy { trigger_count: usize, magnitude: f32 },
    SkillCast {
        skill: SkillType,
        config: SkillConfig,
    },
    AiSkillCast(AiSkillCast),
    /// The special overlay layout was replaced; the UI should refresh overlay markers.
    SpecialAreasUpdated,
}

impl EngineEvent {
    /// Short name used in logs and text output
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::BoardInitialized => "board_initialized",
            EngineEvent::SwapAnimation { .. } => "swap_animation",
            EngineEvent::MatchesCleared { .. } => "matches_cleared",
            EngineEvent::FallAnimation { .. } => "fall_animation",
            EngineEvent::BoardReshuffled => "board_reshuffled",
            EngineEvent::MoraleChanged { .. } => "morale_changed",
            EngineEvent::SkillPointsChanged { .. } => "skill_points_changed",
            EngineEvent::PlayerSpeedUp { .. } => "player_speed_up",
            EngineEvent::PlayerSlowDownEnemy { .. } => "player_slow_down_enemy",
            EngineEvent::SkillCast { .. } => "skill_cast",
            EngineEvent::AiSkillCast(_) => "ai_skill_cast",
            EngineEvent::SpecialAreasUpdated => "special_areas_updated",
        }
    }
}
