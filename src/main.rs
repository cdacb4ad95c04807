//! Castle Siege - Console Entry Point
//!
//! Runs a single in-memory game and reads commands from stdin. Time only
//! moves when told to (`advance`), so ticks can be driven by hand.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use castle_siege::combat::RngBonus;
use castle_siege::core::clock::{Clock, ManualClock, SystemClock};
use castle_siege::core::config::{load_config, GameConfig};
use castle_siege::core::error::Result;
use castle_siege::game::{GameEvent, Siege};
use castle_siege::store::MemoryStore;
use castle_siege::{Army, Collaborators, PrincipalId, WeatherCondition};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "data/siege.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("castle_siege=info")),
        )
        .init();

    let config = if Path::new(CONFIG_PATH).exists() {
        load_config(Path::new(CONFIG_PATH))?
    } else {
        tracing::warn!("{} not found - using built-in rules", CONFIG_PATH);
        GameConfig::default()
    };

    let clock = Arc::new(ManualClock::new(SystemClock.now()));
    let collaborators = Collaborators {
        store: Arc::new(MemoryStore::new()),
        clock: clock.clone(),
        bonus: Arc::new(RngBonus::new(StdRng::from_entropy())),
    };
    let siege = Siege::genesis(config, PrincipalId::new("founder"), collaborators)?;

    println!("\n=== CASTLE SIEGE ===");
    println!("The founder holds the castle. Take it.");
    println!();
    println!("Commands:");
    println!("  join <id> <name>             - Register a player");
    println!("  mobilize <id> <a> <c> <i>    - Replace a player's army");
    println!("  attack <id>                  - Attack the castle");
    println!("  defend <id> <a> <c> <i>      - King sets the garrison");
    println!("  weather <id> <condition>     - Change the weather");
    println!("  tick                         - Advance the game turn");
    println!("  advance <secs>               - Move the clock forward");
    println!("  castle / player <id> / top   - Show state");
    println!("  quit / q                     - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };

        if command == "quit" || command == "q" {
            break;
        }

        if let Err(e) = run_command(&siege, &clock, command, args) {
            println!("  ! {}", e);
        }
    }

    Ok(())
}

fn run_command(siege: &Siege, clock: &ManualClock, command: &str, args: &[&str]) -> Result<()> {
    match (command, args) {
        ("join", [id, name @ ..]) if !name.is_empty() => {
            let player = siege.join(&PrincipalId::from(*id), &name.join(" "))?;
            println!("  {} joined with {} turns", player.name, player.turns);
        }
        ("mobilize", [id, a, c, i]) => {
            let army = parse_army(a, c, i)?;
            let player = siege.mobilize(&PrincipalId::from(*id), army)?;
            println!("  Army set to {:?}, {} turns left", player.army, player.turns);
        }
        ("attack", [id]) => {
            let outcome = siege.attack(&PrincipalId::from(*id))?;
            print_event(&outcome.into())?;
        }
        ("defend", [id, a, c, i]) => {
            let army = parse_army(a, c, i)?;
            let castle = siege.defend(&PrincipalId::from(*id), army)?;
            println!("  Garrison now {:?}", castle.defense);
        }
        ("weather", [id, condition]) => {
            let weather: WeatherCondition = condition.parse()?;
            let change = siege.set_weather(&PrincipalId::from(*id), weather)?;
            print_event(&change.into())?;
        }
        ("tick", []) => {
            let tick = siege.tick()?;
            print_event(&tick.into())?;
        }
        ("advance", [secs]) => {
            let secs = parse_count(secs)?;
            clock.advance(secs);
            println!("  Clock now {}", clock.now());
        }
        ("castle", []) => {
            let castle = siege.castle()?;
            println!("  King:    {}", castle.king);
            println!("  Defense: {:?}", castle.defense);
            println!("  Weather: {}", castle.weather);
            println!(
                "  Last king change {}, last weather change {}",
                castle.last_king_change_time, castle.last_weather_change_time
            );
        }
        ("player", [id]) => {
            let player = siege.player(&PrincipalId::from(*id))?;
            println!(
                "  {}: {:?}, {} turns, {} points",
                player.name, player.army, player.turns, player.points
            );
        }
        ("top", []) => {
            let top = siege.top_score()?;
            match top.leader {
                Some(leader) => println!("  {} leads with {} points", leader, top.points),
                None => println!("  No one has taken the castle yet"),
            }
        }
        _ => println!("  Unknown command: {}", command),
    }
    Ok(())
}

fn parse_count(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .map_err(|e| castle_siege::SiegeError::InvalidInput(format!("'{}' is not a count: {}", raw, e)))
}

fn parse_army(archers: &str, cavalry: &str, infantry: &str) -> Result<Army> {
    Ok(Army::new(
        parse_count(archers)?,
        parse_count(cavalry)?,
        parse_count(infantry)?,
    ))
}

fn print_event(event: &GameEvent) -> Result<()> {
    println!("  {}", serde_json::to_string(event)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use castle_siege::SiegeError;

    #[test]
    fn test_parse_count_rejects_non_numbers() {
        assert_eq!(parse_count("42").unwrap(), 42);
        let err = parse_count("lots").unwrap_err();
        assert!(matches!(err, SiegeError::InvalidInput(_)));
        assert!(err.to_string().starts_with("Invalid input:"));
    }
}
