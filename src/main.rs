//! Headless match-three simulator (default binary).
//!
//! Plays a seeded game with the built-in move finder, advances every cascade
//! to rest as if each animation finished instantly, and runs the AI cast
//! schedule on a virtual clock. Events go to stdout as text or JSON lines.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dragonboat_match3::core::{EngineConfig, Match3Game};
use dragonboat_match3::types::{EngineEvent, EngineState, LOADOUT_SLOTS};

/// Cap on `advance` calls per move; a cascade never gets close.
const MAX_ADVANCES_PER_MOVE: usize = 10_000;

/// Cap on AI casts per move, for zero-length intervals.
const MAX_AI_CASTS_PER_MOVE: usize = 64;

#[derive(Debug, Parser)]
#[command(
    name = "match3-sim",
    version,
    about = "Headless dragon-boat match-three simulator. Plays hinted moves and prints engine events."
)]
struct Cli {
    /// RNG seed; the same seed and config replay the same game.
    #[arg(short, long, default_value = "1")]
    seed: u32,

    /// JSON engine config. Built-in defaults when not set.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of moves to play.
    #[arg(short, long, default_value = "20", value_name = "N")]
    moves: u32,

    /// Cast a player skill whenever one is available.
    #[arg(long)]
    cast: bool,

    /// Virtual seconds that pass per move (drives the AI schedule).
    #[arg(long, default_value = "2.0", value_name = "SECS")]
    seconds_per_move: f32,

    /// Print events and the final snapshot as JSON lines.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &config, &mut out)
}

fn run(cli: &Cli, config: &EngineConfig, out: &mut impl Write) -> Result<()> {
    let mut game = Match3Game::new(config, cli.seed);
    let report = game.initialize_game();
    if !report.accepted {
        tracing::warn!(attempts = report.attempts, "starting from an unverified board");
    }

    let mut clock = 0.0f32;
    let mut next_ai_at = game.start_ai_skills();
    flush_events(&mut game, cli.json, out)?;

    for turn in 0..cli.moves {
        let Some((a, b)) = game.hint() else {
            tracing::warn!(turn, "no legal move on an idle board, stopping");
            break;
        };

        game.handle_tile_input(a);
        game.handle_tile_input(b);
        flush_events(&mut game, cli.json, out)?;

        let mut advances = 0;
        while game.state() != EngineState::Idle {
            if advances >= MAX_ADVANCES_PER_MOVE {
                bail!("cascade did not settle after {advances} steps on turn {turn}");
            }
            game.advance();
            advances += 1;
            flush_events(&mut game, cli.json, out)?;
        }

        if cli.cast {
            let slot = turn as usize % LOADOUT_SLOTS;
            if game.is_skill_available(slot) {
                game.try_cast_skill(slot);
                flush_events(&mut game, cli.json, out)?;
            }
        }

        clock += cli.seconds_per_move;
        let mut casts = 0;
        while let Some(due) = next_ai_at.filter(|due| *due <= clock) {
            if casts >= MAX_AI_CASTS_PER_MOVE {
                tracing::warn!(turn, "AI interval too short, skipping ahead");
                next_ai_at = Some(clock + cli.seconds_per_move);
                break;
            }
            next_ai_at = game.trigger_ai_skill().map(|delay| due + delay);
            casts += 1;
            flush_events(&mut game, cli.json, out)?;
        }
    }

    let snapshot = game.snapshot();
    if cli.json {
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    } else {
        writeln!(out, "--- final board (t={clock:.1}s) ---")?;
        for row in snapshot.color_rows() {
            writeln!(out, "{row}")?;
        }
        let m = snapshot.morale;
        writeln!(
            out,
            "morale {}/{}  skill points {}/{}",
            m.current, m.max, m.skill_points, m.max_skill_points
        )?;
    }
    Ok(())
}

fn flush_events<R, W>(game: &mut Match3Game<R>, json: bool, out: &mut W) -> Result<()>
where
    R: dragonboat_match3::core::RandomSource,
    W: Write,
{
    for event in game.drain_events() {
        if json {
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        } else {
            writeln!(out, "{}", describe(&event))?;
        }
    }
    Ok(())
}

fn describe(event: &EngineEvent) -> String {
    match event {
        EngineEvent::SwapAnimation { a, b, succeeded } => {
            format!("swap {a}<->{b} {}", if *succeeded { "ok" } else { "reverted" })
        }
        EngineEvent::MatchesCleared { cleared, triggers } => {
            let specials: Vec<String> = triggers
                .iter()
                .map(|t| format!("{}x{}", t.effect_type.as_str(), t.trigger_count()))
                .collect();
            if specials.is_empty() {
                format!("cleared {} tiles", cleared.len())
            } else {
                format!("cleared {} tiles [{}]", cleared.len(), specials.join(", "))
            }
        }
        EngineEvent::FallAnimation { moves } => {
            let spawned = moves.iter().filter(|m| m.is_new_tile).count();
            format!("fall {} moves ({spawned} new)", moves.len())
        }
        EngineEvent::MoraleChanged {
            current,
            max,
            delta,
        } => format!("morale {current}/{max} ({delta:+})"),
        EngineEvent::SkillPointsChanged { current, max } => {
            format!("skill points {current}/{max}")
        }
        EngineEvent::PlayerSpeedUp {
            trigger_count,
            magnitude,
        } => format!("player speed up x{trigger_count} ({magnitude})"),
        EngineEvent::PlayerSlowDownEnemy {
            trigger_count,
            magnitude,
        } => format!("player slows enemies x{trigger_count} ({magnitude})"),
        EngineEvent::SkillCast { skill, config } => format!(
            "player casts {} for {}s",
            skill.as_str(),
            config.duration
        ),
        EngineEvent::AiSkillCast(cast) => {
            let target = if cast.target_is_player {
                "player"
            } else {
                cast.target_boat.as_str()
            };
            format!(
                "{} casts {} on {target}",
                cast.caster.as_str(),
                cast.skill.as_str()
            )
        }
        other => other.name().replace('_', " "),
    }
}
