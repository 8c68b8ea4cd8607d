//! Driver configuration.
//!
//! Values come from three places, lowest precedence first: the const
//! defaults below, a RON file ([`SimConfig::load`]) and `SIM_*` environment
//! variables ([`SimConfig::from_env`], typically fed by a `.env` file).

use std::env;
use std::path::Path;

use activity::SchedulerConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub scheduler: SchedulerConfig,
    /// Events kept in memory by the journal. `None` keeps everything; the
    /// digest always covers every event regardless.
    pub journal_capacity: Option<usize>,
    /// Upper bound on ticks for `run_until_idle`.
    pub settle_limit: u64,
}

impl SimConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SETTLE_LIMIT: u64 = 10_000;
    pub const DEFAULT_JOURNAL_CAPACITY: usize = 4_096;

    pub const fn new() -> Self {
        Self {
            scheduler: SchedulerConfig::new(),
            journal_capacity: Some(Self::DEFAULT_JOURNAL_CAPACITY),
            settle_limit: Self::DEFAULT_SETTLE_LIMIT,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SIM_MAX_CHAIN_DEPTH` - Deepest activity nesting (default: 32)
    /// - `SIM_RECORD_EVENTS` - Record lifecycle events (default: true)
    /// - `SIM_JOURNAL_CAPACITY` - Events kept in memory, `0` for unbounded (default: 4096)
    /// - `SIM_SETTLE_LIMIT` - Tick bound for running until idle (default: 10000)
    pub fn from_env() -> Self {
        Self::new().with_env_overrides()
    }

    /// Applies `SIM_*` variables on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(depth) = read_env::<usize>("SIM_MAX_CHAIN_DEPTH") {
            self.scheduler.max_chain_depth = depth.max(1);
        }
        if let Some(record) = read_env::<bool>("SIM_RECORD_EVENTS") {
            self.scheduler.record_events = record;
        }
        if let Some(capacity) = read_env::<usize>("SIM_JOURNAL_CAPACITY") {
            self.journal_capacity = (capacity > 0).then_some(capacity);
        }
        if let Some(limit) = read_env::<u64>("SIM_SETTLE_LIMIT") {
            self.settle_limit = limit.max(1);
        }
        self
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.max_chain_depth == 0 {
            return Err(ConfigError::ZeroChainDepth);
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
