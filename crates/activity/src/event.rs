//! Lifecycle events recorded by activity queues.
//!
//! Events are appended in the exact order transitions happen, so two runs
//! that receive the same enqueue/cancel calls and the same tick count record
//! identical sequences. The driver drains them after every actor tick.

use crate::types::{ActorId, Tick};

/// A single lifecycle transition of one activity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActivityEvent {
    pub tick: Tick,
    pub actor: ActorId,
    /// Nesting depth: 0 for top-level queue entries, 1 for their children, ...
    pub depth: usize,
    pub activity: &'static str,
    pub kind: ActivityEventKind,
}

/// Types of lifecycle transitions.
#[derive(Clone, Debug, PartialEq, Eq, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActivityEventKind {
    /// First-run hook fired.
    Started,
    /// Finished through its normal path.
    Completed,
    /// Cancel accepted; now draining.
    CancelRequested,
    /// Cancel recorded but deferred because the activity is non-interruptible.
    CancelDeferred,
    /// Finished after having been canceled.
    Canceled,
    /// Canceled before it ever ran; no hooks fired.
    Dropped,
    /// Aborted by its parent discarding the chain.
    Discarded,
    /// Discarded because it (or a descendant) returned an error.
    Faulted { error: String },
}

impl ActivityEvent {
    /// Returns true for the events that end an activity's life.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            ActivityEventKind::Completed
                | ActivityEventKind::Canceled
                | ActivityEventKind::Dropped
                | ActivityEventKind::Discarded
                | ActivityEventKind::Faulted { .. }
        )
    }
}
