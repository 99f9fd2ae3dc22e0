//! Game state - the swap/clear/fall cascade and everything it feeds
//!
//! [`Match3Game`] owns the grid, the morale economy, the player's skills and
//! the AI director. The host drives it:
//!
//! 1. Forward taps with [`Match3Game::handle_tile_input`] (or swap directly
//!    with [`Match3Game::try_swap`]).
//! 2. Drain events with [`Match3Game::drain_events`] and play the matching
//!    animation.
//! 3. Call [`Match3Game::advance`] when the animation finishes.
//!
//! Repeat 2 and 3 until [`Match3Game::state`] is back to `Idle`. A new swap is
//! only accepted in `Idle`, so a cascade always settles before the next move.

use tracing::{debug, info, warn};

use dragonboat_match3_types::{
    EngineEvent, EngineState, FallMove, SkillTargetType, SkillType, SlotEffectType, TileColor,
    GRID_CELLS,
};

use crate::ai::AiSkillDirector;
use crate::config::{EngineConfig, SpecialArea, DEFAULT_SPECIAL_AREAS};
use crate::effects::{collect_special_effects, race_effect_events, RaceEffectConfig};
use crate::generator::{generate_board, GenerationReport, GeneratorLimits};
use crate::gravity::fill_empty_tiles;
use crate::grid::{self, Grid};
use crate::matcher::{find_all_matches, find_valid_move, has_any_valid_move, has_match};
use crate::morale::{MoraleEconomy, MoraleState};
use crate::rng::{RandomSource, SimpleRng};
use crate::skills::{SkillCaster, SkillTable};
use crate::snapshot::BoardSnapshot;

#[derive(Debug, Clone)]
pub struct Match3Game<R: RandomSource = SimpleRng> {
    grid: Grid,
    state: EngineState,
    selected: Option<usize>,
    morale: MoraleEconomy,
    caster: SkillCaster,
    skills: SkillTable,
    ai: AiSkillDirector,
    race: RaceEffectConfig,
    generator: GeneratorLimits,
    rng: R,
    /// Pending notifications, oldest first (drained by the host)
    events: Vec<EngineEvent>,
    /// Set once any overlay layout has been applied
    overlay_configured: bool,
    /// Clear waves since the last accepted swap
    cascade_depth: u32,
    last_fall_moves: Vec<FallMove>,
    last_generation: GenerationReport,
}

impl Match3Game<SimpleRng> {
    /// Create a game seeded with `seed`. Call [`initialize_game`](Self::initialize_game)
    /// before playing.
    pub fn new(config: &EngineConfig, seed: u32) -> Self {
        Self::with_rng(config, SimpleRng::new(seed))
    }
}

impl<R: RandomSource> Match3Game<R> {
    /// Create a game with a caller-supplied random source
    ///
    /// A config that fails [`EngineConfig::validate`] is replaced by the
    /// defaults, with a warning.
    pub fn with_rng(config: &EngineConfig, rng: R) -> Self {
        let defaults;
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(error = %err, "invalid engine config, using defaults");
                defaults = EngineConfig::default();
                &defaults
            }
        };

        let mut game = Self {
            grid: Grid::new(),
            state: EngineState::Idle,
            selected: None,
            morale: MoraleEconomy::new(config.morale),
            caster: SkillCaster::new(config.loadouts.player),
            skills: SkillTable::from(&config.skills),
            ai: AiSkillDirector::new(config.loadouts.ai1, config.loadouts.ai2, config.ai),
            race: config.race,
            generator: config.generator,
            rng,
            events: Vec::new(),
            overlay_configured: false,
            cascade_depth: 0,
            last_fall_moves: Vec::new(),
            last_generation: GenerationReport::default(),
        };

        if let Some(areas) = &config.special_areas {
            game.write_overlay(areas);
        }

        game
    }

    /// Start a fresh game: reset selection, state and morale, then generate
    /// a board over the current overlay (the built-in layout if none was set).
    pub fn initialize_game(&mut self) -> GenerationReport {
        self.selected = None;
        self.state = EngineState::Idle;
        self.morale.reset();
        self.cascade_depth = 0;
        self.last_fall_moves.clear();

        if !self.overlay_configured {
            self.write_overlay(&DEFAULT_SPECIAL_AREAS);
            debug!("default special area layout applied");
        }

        self.grid.clear_colors();
        self.last_generation = generate_board(&mut self.grid, &mut self.rng, self.generator);

        info!(
            attempts = self.last_generation.attempts,
            accepted = self.last_generation.accepted,
            "board initialized"
        );
        self.events.push(EngineEvent::BoardInitialized);
        self.last_generation
    }

    /// Replace the whole overlay layout
    ///
    /// Out-of-range entries are skipped with a warning. Returns how many
    /// entries were applied.
    pub fn apply_special_areas(&mut self, areas: &[SpecialArea]) -> usize {
        let applied = self.write_overlay(areas);
        info!(applied, total = areas.len(), "special areas updated");
        self.events.push(EngineEvent::SpecialAreasUpdated);
        applied
    }

    fn write_overlay(&mut self, areas: &[SpecialArea]) -> usize {
        self.grid.reset_overlay();
        let mut applied = 0;
        for area in areas {
            if self.grid.set_effect(area.index, area.effect) {
                applied += 1;
            } else {
                warn!(index = area.index, "special area index out of range, skipped");
            }
        }
        self.overlay_configured = true;
        applied
    }

    /// Load a color layout (replays, scripted boards). Only in `Idle`, and
    /// every cell must hold a real color.
    ///
    /// The overlay is kept. Existing matches are left for the next
    /// [`process_match_check`](Self::process_match_check).
    pub fn restore_board(&mut self, colors: &[TileColor; GRID_CELLS]) -> bool {
        if self.state != EngineState::Idle {
            warn!(state = self.state.as_str(), "restore_board rejected outside idle");
            return false;
        }
        if let Some(hole) = colors.iter().position(|c| !c.is_placeable()) {
            warn!(index = hole, "restore_board rejected: empty cell");
            return false;
        }
        for (i, &color) in colors.iter().enumerate() {
            self.grid.set_color(i, color);
        }
        self.selected = None;
        self.cascade_depth = 0;
        debug!("board restored");
        true
    }

    // ---------------------------------------------------------------
    // Input and cascade
    // ---------------------------------------------------------------

    /// Tap on a tile: select, deselect, swap with the selection, or reselect
    ///
    /// Returns false only for an invalid index. A swap attempt clears the
    /// selection whether or not the swap matched.
    pub fn handle_tile_input(&mut self, index: usize) -> bool {
        if !self.grid.is_valid_index(index) {
            return false;
        }

        match self.selected {
            None => self.selected = Some(index),
            Some(sel) if sel == index => self.selected = None,
            Some(sel) if grid::is_adjacent(sel, index) => {
                self.try_swap(sel, index);
                self.selected = None;
            }
            Some(_) => self.selected = Some(index),
        }
        true
    }

    /// Swap two tiles if that creates a match
    ///
    /// Only in `Idle`. A matching swap is kept (`Swapping`); a non-matching
    /// one is undone (`RevertingSwap`) and returns false. Both queue a
    /// `SwapAnimation`. Adjacency is the caller's concern.
    pub fn try_swap(&mut self, a: usize, b: usize) -> bool {
        if self.state != EngineState::Idle {
            debug!(state = self.state.as_str(), "swap rejected: cascade in progress");
            return false;
        }
        if !self.grid.is_valid_index(a) || !self.grid.is_valid_index(b) {
            return false;
        }

        self.grid.swap(a, b);

        if has_match(&self.grid) {
            self.cascade_depth = 0;
            self.state = EngineState::Swapping;
            debug!(a, b, "swap accepted");
            self.events.push(EngineEvent::SwapAnimation {
                a,
                b,
                succeeded: true,
            });
            true
        } else {
            self.grid.swap(a, b);
            self.state = EngineState::RevertingSwap;
            debug!(a, b, "swap reverted");
            self.events.push(EngineEvent::SwapAnimation {
                a,
                b,
                succeeded: false,
            });
            false
        }
    }

    /// The current animation finished; move the cascade on
    pub fn advance(&mut self) {
        match self.state {
            EngineState::Swapping | EngineState::Falling => self.run_match_check(),
            EngineState::RevertingSwap => {
                debug!("revert finished");
                self.state = EngineState::Idle;
            }
            EngineState::Clearing => {
                self.last_fall_moves = fill_empty_tiles(&mut self.grid, &mut self.rng);
                self.state = EngineState::Falling;
                debug!(moves = self.last_fall_moves.len(), "tiles falling");
                self.events.push(EngineEvent::FallAnimation {
                    moves: self.last_fall_moves.clone(),
                });
            }
            EngineState::Idle | EngineState::CheckMatching => {
                warn!(state = self.state.as_str(), "advance called in unexpected state");
            }
        }
    }

    /// Resolve a restored board from `Idle`: start a cascade if it holds
    /// matches, or reshuffle it if it is deadlocked
    ///
    /// Ignored outside `Idle`; mid-cascade steps go through
    /// [`advance`](Self::advance).
    pub fn process_match_check(&mut self) {
        if self.state != EngineState::Idle {
            warn!(
                state = self.state.as_str(),
                "process_match_check rejected outside idle"
            );
            return;
        }
        self.cascade_depth = 0;
        self.run_match_check();
    }

    /// Resolve the board once: clear the current matches, or settle to `Idle`
    ///
    /// On a clear, triggers are read before the tiles are zeroed, morale is
    /// awarded, race effects are queued and `MatchesCleared` follows. With
    /// nothing to clear, a deadlocked board is regenerated in place.
    fn run_match_check(&mut self) {
        self.state = EngineState::CheckMatching;

        let cleared = find_all_matches(&self.grid);

        if cleared.is_empty() {
            if !has_any_valid_move(&self.grid) {
                info!("deadlock detected, reshuffling board");
                self.last_generation =
                    generate_board(&mut self.grid, &mut self.rng, self.generator);
                self.events.push(EngineEvent::BoardReshuffled);
            }
            debug!(depth = self.cascade_depth, "cascade settled");
            self.state = EngineState::Idle;
            return;
        }

        let triggers = collect_special_effects(&self.grid, &cleared);

        let reward = self.morale.calculate_reward(cleared.len(), &triggers);
        if reward > 0 {
            self.morale.add_morale(reward, &mut self.events);
        }

        race_effect_events(&triggers, &self.race, &mut self.events);

        for &i in &cleared {
            self.grid.set_color(i, TileColor::Empty);
        }

        self.cascade_depth += 1;
        self.state = EngineState::Clearing;
        debug!(
            tiles = cleared.len(),
            triggers = triggers.len(),
            depth = self.cascade_depth,
            "matches cleared"
        );
        self.events
            .push(EngineEvent::MatchesCleared { cleared, triggers });
    }

    // ---------------------------------------------------------------
    // Skills
    // ---------------------------------------------------------------

    /// Cast the player's skill in `slot` for one skill point
    pub fn try_cast_skill(&mut self, slot: usize) -> bool {
        self.caster
            .try_cast(slot, &self.skills, &mut self.morale, &mut self.events)
    }

    pub fn equip_skill(&mut self, slot: usize, skill: SkillType) {
        self.caster.equip(slot, skill);
    }

    /// Skill in `slot`, `EastWind` for an invalid slot
    pub fn equipped_skill(&self, slot: usize) -> SkillType {
        self.caster.equipped(slot)
    }

    pub fn is_skill_available(&self, slot: usize) -> bool {
        self.caster.is_available(slot, &self.morale)
    }

    pub fn target_type_of(&self, skill: SkillType) -> SkillTargetType {
        self.skills.target_type_of(skill)
    }

    pub fn skill_table(&self) -> &SkillTable {
        &self.skills
    }

    // ---------------------------------------------------------------
    // AI
    // ---------------------------------------------------------------

    /// Start the AI for a race. Returns seconds until the first
    /// [`trigger_ai_skill`](Self::trigger_ai_skill), or `None` when disabled.
    pub fn start_ai_skills(&mut self) -> Option<f32> {
        self.ai.start_race(&mut self.rng)
    }

    /// Let one AI cast now and return the delay before the next cast
    pub fn trigger_ai_skill(&mut self) -> Option<f32> {
        if let Some(cast) = self.ai.resolve_cast(&mut self.rng, &self.skills) {
            self.events.push(EngineEvent::AiSkillCast(cast));
        }
        self.ai.next_interval(&mut self.rng)
    }

    pub fn set_ai_skill_interval(&mut self, min_secs: f32, max_secs: f32) {
        self.ai.set_interval(min_secs, max_secs);
    }

    pub fn ai_director(&self) -> &AiSkillDirector {
        &self.ai
    }

    pub fn ai_director_mut(&mut self) -> &mut AiSkillDirector {
        &mut self.ai
    }

    // ---------------------------------------------------------------
    // Debug hooks
    // ---------------------------------------------------------------

    pub fn debug_set_morale(&mut self, value: i32) {
        self.morale.debug_set_morale(value, &mut self.events);
    }

    pub fn debug_set_skill_points(&mut self, value: i32) {
        self.morale.debug_set_skill_points(value, &mut self.events);
    }

    pub fn debug_simulate_match(&mut self, tile_count: i32, include_bonus: bool) {
        self.morale
            .debug_simulate_match(tile_count, include_bonus, &mut self.events);
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn color_at(&self, index: usize) -> TileColor {
        self.grid.color_at(index)
    }

    pub fn special_tile_type_at(&self, index: usize) -> SlotEffectType {
        self.grid.effect_at(index)
    }

    pub fn morale_progress(&self) -> f32 {
        self.morale.progress()
    }

    pub fn index_to_row_col(&self, index: usize) -> (usize, usize) {
        grid::index_to_row_col(index)
    }

    pub fn row_col_to_index(&self, row: usize, col: usize) -> usize {
        grid::row_col_to_index(row, col)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn morale(&self) -> MoraleState {
        self.morale.state()
    }

    pub fn cascade_depth(&self) -> u32 {
        self.cascade_depth
    }

    /// Result of the most recent gravity fill
    pub fn last_fall_moves(&self) -> &[FallMove] {
        &self.last_fall_moves
    }

    /// Result of the most recent board generation (initial or reshuffle)
    pub fn last_generation(&self) -> GenerationReport {
        self.last_generation
    }

    /// A swap that would match right now, if any
    pub fn hint(&self) -> Option<(usize, usize)> {
        find_valid_move(&self.grid)
    }

    pub fn pending_events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Take every queued event, oldest first
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.write_grid(&self.grid);
        out.state = self.state;
        out.selected = self.selected;
        out.morale = self.morale.state();
        out.cascade_depth = self.cascade_depth;
        out.player_loadout = self.caster.loadout();
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
