//! Dragon-boat match-three (workspace facade crate).
//!
//! This package exposes `dragonboat_match3::{core,types}` as one public API
//! while the implementation lives in dedicated crates under `crates/`.

pub use dragonboat_match3_core as core;
pub use dragonboat_match3_types as types;
