//! Fixed-step simulation driver for actor activity queues.
//!
//! - [`World`]: actors in a deterministic ordered map, ticked once per step
//! - [`Journal`]: lifecycle event record with a replay digest
//! - [`SimConfig`]: defaults, RON file and `SIM_*` environment overrides
//! - [`Scenario`]: RON description of units, orders and timed commands
//! - [`logging::setup_logging`]: stderr and per-session file logging

pub mod config;
pub mod error;
pub mod journal;
pub mod logging;
pub mod scenario;
pub mod unit;
pub mod world;

pub use config::SimConfig;
pub use error::{ConfigError, Result, SimError};
pub use journal::Journal;
pub use scenario::{Command, Order, Scenario, ScenarioOutcome, ScheduledCommand, sync_sightings};
pub use unit::{Terrain, Unit};
pub use world::{Actor, Completion, Fault, StepReport, World};
