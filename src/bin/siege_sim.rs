//! Headless Siege Simulation
//!
//! Runs many players against one castle for a number of rounds and prints
//! a JSON summary. Mobilization within a round runs in parallel.

use std::sync::Arc;

use castle_siege::combat::RngBonus;
use castle_siege::core::clock::ManualClock;
use castle_siege::game::Siege;
use castle_siege::store::MemoryStore;
use castle_siege::{Army, Collaborators, GameConfig, PrincipalId, SiegeError, WeatherCondition, Winner};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Siege Simulation - many players, one castle
#[derive(Parser, Debug)]
#[command(name = "siege_sim")]
#[command(about = "Simulate a siege game and output a JSON summary")]
struct Args {
    /// Number of players to register
    #[arg(long, default_value_t = 50)]
    players: usize,

    /// Number of rounds (one tick per round)
    #[arg(long, default_value_t = 20)]
    rounds: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Optional TOML rules file
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Enable per-operation logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct SimulationSummary {
    seed: u64,
    players: usize,
    rounds: u64,
    game_turn: u64,
    attacks: u64,
    successions: u64,
    final_king: String,
    final_weather: String,
    top_scorer: Option<String>,
    top_points: u64,
}

fn main() -> castle_siege::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "castle_siege=debug" } else { "castle_siege=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => castle_siege::core::config::load_config(path)?,
        None => GameConfig::default(),
    };
    let interval = config.tick_interval_secs;
    let attacker_cap = config.attacker_cap;
    let defense_cap = config.defense_cap;
    let founder = PrincipalId::new("founder");
    let forecaster = weather_caller(&config, &founder);

    let clock = Arc::new(ManualClock::new(0));
    let collaborators = Collaborators {
        store: Arc::new(MemoryStore::new()),
        clock: clock.clone(),
        bonus: Arc::new(RngBonus::new(ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)))),
    };
    let siege = Siege::genesis(config, founder, collaborators)?;

    let players: Vec<PrincipalId> = (0..args.players)
        .map(|i| PrincipalId::new(format!("player-{}", i)))
        .collect();
    for (i, player) in players.iter().enumerate() {
        siege.join(player, &format!("Player {}", i))?;
    }

    let mut successions = 0;
    for round in 0..args.rounds {
        clock.advance(interval);
        siege.tick()?;

        let weather = WeatherCondition::ALL[rng.gen_range(0..WeatherCondition::ALL.len())];
        match siege.set_weather(&forecaster, weather) {
            Ok(_) | Err(SiegeError::WeatherChangeTooSoon { .. }) => {}
            Err(e) => return Err(e),
        }

        // Each player draws from its own stream so parallel order doesn't matter
        players
            .par_iter()
            .enumerate()
            .try_for_each(|(i, player)| {
                let mut player_rng =
                    ChaCha8Rng::seed_from_u64(seed ^ (round << 32) ^ i as u64);
                if !player_rng.gen_bool(0.3) {
                    return Ok(());
                }
                match siege.mobilize(player, random_army(&mut player_rng, attacker_cap)) {
                    Ok(_) | Err(SiegeError::NotEnoughTurns { .. }) => Ok(()),
                    Err(e) => Err(e),
                }
            })?;

        if players.is_empty() {
            continue;
        }
        for _ in 0..players.len() / 5 + 1 {
            let attacker = &players[rng.gen_range(0..players.len())];
            match siege.attack(attacker) {
                Ok(outcome) => {
                    if outcome.result == Winner::Attacker {
                        successions += 1;
                        let garrison = random_army(&mut rng, defense_cap);
                        siege.defend(attacker, garrison)?;
                    }
                }
                Err(SiegeError::NotEnoughTurns { .. } | SiegeError::CannotAttackSelf(_)) => {}
                Err(e) => return Err(e),
            }
        }
    }

    let state = siege.snapshot()?;
    let summary = SimulationSummary {
        seed,
        players: args.players,
        rounds: args.rounds,
        game_turn: state.game_turn,
        attacks: state.number_of_attacks,
        successions,
        final_king: state.castle.king.to_string(),
        final_weather: state.castle.weather.to_string(),
        top_scorer: state.leaderboard.leader.map(|p| p.to_string()),
        top_points: state.leaderboard.points,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Whoever the rules allow to change the weather, else the founder
fn weather_caller(config: &GameConfig, founder: &PrincipalId) -> PrincipalId {
    config
        .weather_authority
        .clone()
        .unwrap_or_else(|| founder.clone())
}

/// Random army of exactly `cap` units
fn random_army(rng: &mut impl Rng, cap: u64) -> Army {
    let archers = rng.gen_range(0..=cap);
    let cavalry = rng.gen_range(0..=cap - archers);
    Army::new(archers, cavalry, cap - archers - cavalry)
}
