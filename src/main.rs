//! Headless demo runner
//!
//! Generates a cast, simulates a run with a simple autopilot, and records
//! the final score on the leaderboard. Useful for soak-testing the
//! simulation and for demos without a renderer attached.

use clap::Parser;
use rand::Rng;

use explodium::audio::{self, NullAudio};
use explodium::persistence;
use explodium::roster::{OfflineRoster, RosterProvider, fallback_cast};
use explodium::sim::{GamePhase, GameState, TickInput, tick};
use explodium::{Settings, Tuning};

#[derive(Parser, Debug)]
#[command(name = "explodium", about = "Run a headless demo of the simulation")]
struct Args {
    /// Seed for the run; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate (60 per second)
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Theme passed to the cast provider
    #[arg(long, default_value = "action movie heroes")]
    theme: String,

    /// Suppress all incoming damage
    #[arg(long)]
    god_mode: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("starting run: seed={seed} ticks={}", args.ticks);

    let provider = OfflineRoster;
    let cast = match provider.generate(&args.theme, 4) {
        Ok(cast) => cast,
        Err(err) => {
            log::warn!("cast generation failed, using built-in cast: {err}");
            fallback_cast()
        }
    };

    let tuning = Tuning::default();
    let settings = Settings {
        god_mode: args.god_mode,
        ..Default::default()
    };
    let mut audio = NullAudio;

    let mut state = GameState::new(seed, cast);
    for n in 0..args.ticks {
        state = tick(&state, &autopilot(n), &tuning, &settings);
        audio::route_events(&state.events, &mut audio);
        if state.phase == GamePhase::GameOver {
            log::info!("game over at tick {n}");
            break;
        }
    }

    println!(
        "seed {seed}: score {} at difficulty {} after {} ticks",
        state.score, state.difficulty, state.time_ticks
    );

    match persistence::load_highscores() {
        Ok(mut scores) => {
            if let Some(rank) = scores.add_score(state.score, state.difficulty, persistence::now_millis()) {
                println!("new high score, rank {rank}");
                if let Err(err) = persistence::save_highscores(&scores) {
                    log::warn!("failed to save high scores: {err}");
                }
            }
        }
        Err(err) => log::warn!("failed to load high scores: {err}"),
    }
}

/// Hold fire and run right, with periodic jumps and the special on cooldown.
fn autopilot(n: u64) -> TickInput {
    TickInput {
        right: true,
        fire: true,
        jump: n % 90 < 8,
        special: n % 300 == 0,
        ..Default::default()
    }
}
