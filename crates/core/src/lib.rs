//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the dragon-boat match-three board: the grid,
//! match detection, gravity, board generation, special tiles, the morale
//! economy, skills and the AI cast director. It does no rendering, no input
//! handling and keeps no clock, so it runs the same in a game client, a test,
//! or the headless simulator.
//!
//! - **Deterministic**: all randomness goes through [`RandomSource`]; a seed replays a game
//! - **Event driven**: the engine queues [`EngineEvent`](types::EngineEvent)s for the host to drain
//! - **Externally paced**: the host calls [`Match3Game::advance`] when each animation ends
//!
//! # Module Structure
//!
//! - [`grid`]: 7x7 color grid with its special-effect overlay
//! - [`matcher`]: runs of three or more, legal move probing
//! - [`gravity`]: column collapse and refill
//! - [`generator`]: random boards with no match and at least one move
//! - [`effects`]: special tile triggers and race notifications
//! - [`morale`]: morale to skill point conversion
//! - [`skills`]: skill tables, loadouts, player casting
//! - [`ai`]: AI boat cast decisions
//! - [`config`]: serde configuration with validation
//! - [`game_state`]: the cascade state machine tying it all together
//! - [`snapshot`]: serializable view for observers
//!
//! # Cascade
//!
//! ```text
//! Idle --swap matches--> Swapping --advance--> CheckMatching
//! Idle --no match------> RevertingSwap --advance--> Idle
//! CheckMatching --matches--> Clearing --advance--> Falling --advance--> CheckMatching
//! CheckMatching --none-----> (reshuffle if deadlocked) Idle
//! ```
//!
//! # Example
//!
//! ```
//! use dragonboat_match3_core::{EngineConfig, Match3Game};
//! use dragonboat_match3_types::{EngineEvent, EngineState};
//!
//! let mut game = Match3Game::new(&EngineConfig::default(), 12345);
//! game.initialize_game();
//! assert_eq!(game.drain_events(), vec![EngineEvent::BoardInitialized]);
//!
//! // Every generated board has at least one legal move
//! let (a, b) = game.hint().unwrap();
//! assert!(game.try_swap(a, b));
//!
//! while game.state() != EngineState::Idle {
//!     game.advance();
//! }
//! assert!(game.morale().current > 0 || game.morale().skill_points > 0);
//! ```

pub mod ai;
pub mod config;
pub mod effects;
pub mod error;
pub mod game_state;
pub mod generator;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod morale;
pub mod rng;
pub mod skills;
pub mod snapshot;

pub use dragonboat_match3_types as types;

// Re-export commonly used types for convenience
pub use ai::{AiConfig, AiSkillDirector};
pub use config::{EngineConfig, LoadoutConfig, SpecialArea, DEFAULT_SPECIAL_AREAS};
pub use effects::{collect_special_effects, race_effect_events, RaceEffectConfig};
pub use error::ConfigError;
pub use game_state::Match3Game;
pub use generator::{generate_board, GenerationReport, GeneratorLimits};
pub use gravity::fill_empty_tiles;
pub use grid::{index_to_row_col, is_adjacent, row_col_to_index, Grid};
pub use matcher::{find_all_matches, find_valid_move, has_any_valid_move, has_match};
pub use morale::{MoraleConfig, MoraleEconomy, MoraleState};
pub use rng::{RandomSource, SimpleRng};
pub use skills::{SkillCaster, SkillLoadout, SkillTable, SkillTableConfig};
pub use snapshot::BoardSnapshot;
