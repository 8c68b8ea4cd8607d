//! Error types surfaced by the simulation driver.
//!
//! Activity faults are not errors at this level: they are contained to the
//! actor that raised them and reported in the [`StepReport`](crate::StepReport).
//! What remains are misuse of the world API and configuration problems.

use std::path::PathBuf;

use activity::{ActivityError, ActorId};
use thiserror::Error;

pub type Result<T, E = SimError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("actor {0} already exists")]
    DuplicateActor(ActorId),

    #[error("actor {0} does not exist")]
    UnknownActor(ActorId),

    #[error("order for actor {actor} was refused")]
    InvalidOrder {
        actor: ActorId,
        #[source]
        source: ActivityError,
    },

    #[error("world did not go idle within {limit} ticks")]
    Unsettled { limit: u64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse RON")]
    Parse(#[from] ron::error::SpannedError),

    #[error("max_chain_depth must be at least 1")]
    ZeroChainDepth,
}
