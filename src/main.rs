//! Balloon Defense headless runner
//!
//! Plays one scripted session with a simple aiming bot, then records the
//! score on the leaderboard and prints the standings.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use glam::Vec2;

use balloon_defense::audio::{AudioManager, NullBackend};
use balloon_defense::consts::SIM_DT;
use balloon_defense::highscores::{format_timestamp, short_date, submit_or_drop};
use balloon_defense::input::{InputEvent, InputQueue};
use balloon_defense::sim::{DifficultyTier, GameState, Session};
use balloon_defense::{InMemoryLeaderboard, Leaderboard, Playfield, PlayerColor, Settings};

#[derive(Parser, Debug)]
#[command(name = "balloon-defense")]
#[command(about = "Run a headless Balloon Defense session and record the score")]
struct Cli {
    /// Difficulty tier (Easy, Medium, Hard); overrides the settings file
    #[arg(long)]
    difficulty: Option<String>,
    /// Ship color encoding (0 green, 1 blue, 2 red); overrides the settings file
    #[arg(long)]
    color: Option<i64>,
    /// Run seed; defaults to the current time
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many simulated seconds if the game is still running
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Name recorded on the leaderboard
    #[arg(long, default_value = "bot")]
    name: String,
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Leaderboard JSON file; scores are kept in memory when omitted
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Number of leaderboard entries to print
    #[arg(long, default_value_t = 10)]
    top: usize,
}

/// Joystick deflection the bot uses; small so the ship mostly turns in place
const AIM_DEFLECTION: f32 = 0.1;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = resolve_settings(&cli)?;
    let seed = match cli.seed {
        Some(seed) => seed,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock before 1970")?
            .as_millis() as u64,
    };
    if !cli.seconds.is_finite() || cli.seconds <= 0.0 {
        return Err(anyhow!("--seconds must be positive, got {}", cli.seconds));
    }

    log::info!("Balloon Defense (headless) starting with seed {}", seed);

    let mut session = Session::new(&settings, Playfield::default(), seed);
    let mut queue = InputQueue::default();
    let mut audio = AudioManager::new(NullBackend);
    audio.set_muted(settings.muted);

    let frames = (cli.seconds / SIM_DT).ceil() as u64;
    let mut grabbed = false;
    for _ in 0..frames {
        if !grabbed {
            queue.push(InputEvent::TouchBegan(queue.joystick().base));
            grabbed = true;
        }
        if let Some(aim) = aim_at_nearest(session.state()) {
            let stick = queue.joystick();
            let knob = stick.base + aim * stick.radius * AIM_DEFLECTION;
            queue.push(InputEvent::TouchMoved(knob));
        }

        session.update(&mut queue, SIM_DT);
        audio.handle_events(&session.drain_events());
        if session.is_over() {
            break;
        }
    }

    let report = if session.is_over() {
        session.report()
    } else {
        log::info!("Time limit reached, ending session");
        let report = session.end_game();
        audio.handle_events(&session.drain_events());
        report
    };
    println!(
        "Final score: {} ({}, {} ticks)",
        report.score,
        report.tier.as_str(),
        session.state().time_ticks
    );

    let mut board = match &cli.scores {
        Some(path) => InMemoryLeaderboard::load(path),
        None => InMemoryLeaderboard::new(),
    };
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before 1970")?
        .as_secs();
    if let Some(submission) = session.submission(&cli.name, &format_timestamp(now)) {
        if let Some(id) = submit_or_drop(&mut board, &submission) {
            if let Some(rank) = board.rank_of(&id) {
                println!("Ranked #{} of {}", rank, board.len());
            }
        }
    }
    if let Some(path) = &cli.scores {
        board
            .save(path)
            .with_context(|| format!("saving scores to {}", path.display()))?;
    }

    println!("High scores:");
    for (i, record) in board.list_scores().iter().take(cli.top).enumerate() {
        println!(
            "{:>3}. {:<16} {:>8}  {}",
            i + 1,
            record.name,
            record.score,
            short_date(&record.date)
        );
    }

    Ok(())
}

/// Settings file first, then command-line overrides
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(name) = &cli.difficulty {
        settings.difficulty = DifficultyTier::from_name(name).ok_or_else(|| {
            anyhow!("unknown difficulty {:?} (expected Easy, Medium or Hard)", name)
        })?;
    }
    if let Some(encoding) = cli.color {
        settings.player_color = PlayerColor::from_encoding(encoding)
            .ok_or_else(|| anyhow!("unknown color {} (expected 0, 1 or 2)", encoding))?;
    }
    Ok(settings)
}

/// Unit vector from the ship toward the closest balloon
fn aim_at_nearest(state: &GameState) -> Option<Vec2> {
    let from = state.player.pos;
    state
        .enemies
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(from)
                .total_cmp(&b.pos.distance_squared(from))
        })
        .and_then(|e| (e.pos - from).try_normalize())
}
