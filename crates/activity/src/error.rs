//! Error types for the activity scheduler.
//!
//! Expected gameplay failures (lost target, unreachable cell) are not errors:
//! the activity reports [`Status::Done`](crate::Status::Done) having achieved
//! nothing. What remains here falls into three groups:
//!
//! - **Validation**: an activity refused to be constructed (precondition).
//! - **Internal**: the scheduler detected a broken invariant (double tick,
//!   tick after completion, clock moving backwards).
//! - **Fatal**: an activity's own logic hit an unrecoverable condition.
//!
//! Every group is contained to the actor that raised it; the driver logs it
//! and moves on to the next actor.

use crate::types::{ActorId, Tick};

/// Severity level of an error, used for logging and triage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input rejected before anything was scheduled.
    Validation,

    /// Scheduler invariant violated. Indicates a bug in calling code.
    Internal,

    /// An activity failed while ticking. The activity is discarded.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates a bug rather than bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Errors raised by the scheduler or by activities.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("activity '{activity}' was ticked after it completed")]
    TickAfterDone { activity: &'static str },

    #[error("activity '{activity}' attempted to run its first-run hook twice")]
    FirstRunRepeated { activity: &'static str },

    #[error("activity '{activity}' was ticked twice during tick {tick}")]
    DoubleTick { activity: &'static str, tick: Tick },

    #[error("queue of actor {actor} was already advanced during tick {tick}")]
    QueueAlreadyTicked { actor: ActorId, tick: Tick },

    #[error("queue of actor {actor} received tick {tick} after tick {last}")]
    ClockRewind {
        actor: ActorId,
        tick: Tick,
        last: Tick,
    },

    #[error("activity chain too deep: '{activity}' reached depth {depth}")]
    ChainTooDeep { activity: &'static str, depth: usize },

    #[error("'{activity}' requested {requested} cells of travel, the cap is {limit}")]
    DistanceCapExceeded {
        activity: &'static str,
        requested: u32,
        limit: u32,
    },

    #[error("activity '{activity}' faulted: {message}")]
    Faulted {
        activity: &'static str,
        message: String,
    },
}

impl ActivityError {
    /// Convenience constructor for activity-raised faults.
    pub fn faulted(activity: &'static str, message: impl Into<String>) -> Self {
        Self::Faulted {
            activity,
            message: message.into(),
        }
    }

    /// Returns the severity level of this error.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DistanceCapExceeded { .. } => ErrorSeverity::Validation,
            Self::TickAfterDone { .. }
            | Self::FirstRunRepeated { .. }
            | Self::DoubleTick { .. }
            | Self::QueueAlreadyTicked { .. }
            | Self::ClockRewind { .. }
            | Self::ChainTooDeep { .. } => ErrorSeverity::Internal,
            Self::Faulted { .. } => ErrorSeverity::Fatal,
        }
    }

    /// Returns a static string identifier for this error variant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TickAfterDone { .. } => "tick_after_done",
            Self::FirstRunRepeated { .. } => "first_run_repeated",
            Self::DoubleTick { .. } => "double_tick",
            Self::QueueAlreadyTicked { .. } => "queue_already_ticked",
            Self::ClockRewind { .. } => "clock_rewind",
            Self::ChainTooDeep { .. } => "chain_too_deep",
            Self::DistanceCapExceeded { .. } => "distance_cap_exceeded",
            Self::Faulted { .. } => "faulted",
        }
    }

    /// Whether the error leaves the queue untouched (rejected before any unit ran).
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::QueueAlreadyTicked { .. } | Self::ClockRewind { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        let cap = ActivityError::DistanceCapExceeded {
            activity: "MoveTo",
            requested: 40,
            limit: 32,
        };
        assert_eq!(cap.severity(), ErrorSeverity::Validation);
        assert!(!cap.severity().is_internal());

        let fault = ActivityError::faulted("Teleport", "destination vanished");
        assert_eq!(fault.severity(), ErrorSeverity::Fatal);
        assert_eq!(
            fault.to_string(),
            "activity 'Teleport' faulted: destination vanished"
        );

        let rewind = ActivityError::ClockRewind {
            actor: ActorId(1),
            tick: Tick(3),
            last: Tick(5),
        };
        assert!(rewind.is_rejection());
        assert_eq!(rewind.error_code(), "clock_rewind");
    }
}
