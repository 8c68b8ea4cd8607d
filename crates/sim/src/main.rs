//! Runs a RON scenario and prints its completions and replay digest.
//!
//! Usage: `sim [SCENARIO.ron]`
//!
//! Environment variables (a `.env` file is honoured):
//! - `SIM_CONFIG` - RON file with a `SimConfig`; `SIM_*` variables override it
//! - `SIM_LOG_FILE` - also log to the platform cache directory (default: false)
//! - `SIM_SESSION_ID` - log session directory name (default: timestamp)

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sim::{Scenario, SimConfig, logging};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = match env::var("SIM_CONFIG") {
        Ok(path) => SimConfig::load(&path)
            .with_context(|| format!("Failed to load config: {path}"))?
            .with_env_overrides(),
        Err(_) => SimConfig::from_env(),
    };

    let to_file = env::var("SIM_LOG_FILE")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(false);
    logging::setup_logging(env::var("SIM_SESSION_ID").ok(), to_file)?;

    let path = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/demo.ron"))
    });
    let scenario = Scenario::load(&path)
        .with_context(|| format!("Failed to load scenario: {}", path.display()))?;

    let outcome = scenario.run(config)?;

    println!("scenario: {} ({} ticks)", scenario.name, outcome.ticks);
    for (tick, completion) in &outcome.completions {
        let how = if completion.canceled { "canceled" } else { "completed" };
        println!(
            "  tick {:>4}  actor {} {:<14} {how}",
            tick.0, completion.actor, completion.activity
        );
    }
    for (tick, fault) in &outcome.faults {
        println!("  tick {:>4}  actor {} fault: {}", tick.0, fault.actor, fault.error);
    }
    for (actor, position) in &outcome.positions {
        let shots = outcome.shots.get(actor).copied().unwrap_or_default();
        println!("  actor {actor} at {position}, {shots} shot(s)");
    }
    println!("events: {}", outcome.events);
    println!("digest: {}", outcome.digest);
    Ok(())
}
