//! Deterministic per-actor activity scheduler.
//!
//! Each actor owns an [`ActivityQueue`] of top-level activities. Once per
//! fixed simulation step the driver ticks every queue in a stable order; the
//! queue advances its head, which may in turn delegate to a chain of child
//! activities.
//!
//! - **Lockstep**: ticks are synchronous and single-threaded; two runs fed the
//!   same enqueue/cancel calls record identical event sequences
//! - **Explicit context**: actor state is passed into every hook as `&mut C`
//! - **Composable**: activities queue children through their [`Scope`]
//! - **Interruptible by default**: non-interruptible activities defer cancel
//!   requests until they report interruptible again or finish
//!
//! # Architecture
//!
//! - [`Activity`]: capability trait every concrete behavior implements
//! - [`ActivityNode`]: lifecycle state machine around one activity
//! - [`ChildChain`]: FIFO of subordinate nodes owned by a node
//! - [`Scope`]: handle passed to hooks for context and child management
//! - [`ActivityQueue`]: per-actor top-level queue and interruption entry point

pub mod activity;
pub mod cancel;
pub mod chain;
pub mod config;
pub mod error;
pub mod event;
pub mod node;
pub mod queue;
pub mod scope;
pub mod snapshot;
pub mod state;
pub mod status;
pub mod target;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use activity::{Activity, ActivityKind, TargetLines, Targets};
pub use cancel::CancelOutcome;
pub use chain::ChildChain;
pub use config::SchedulerConfig;
pub use error::{ActivityError, ErrorSeverity};
pub use event::{ActivityEvent, ActivityEventKind};
pub use node::ActivityNode;
pub use queue::{ActivityQueue, QueueTick};
pub use scope::Scope;
pub use snapshot::{ActivitySnapshot, render_tree};
pub use state::ActivityState;
pub use status::Status;
pub use target::{LineColor, Target, TargetLineNode};
pub use types::{ActorId, Position, Tick};

pub type Result<T, E = ActivityError> = std::result::Result<T, E>;
