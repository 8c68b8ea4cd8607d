//! Lifecycle state of a scheduled activity.

/// Where an activity is in its lifecycle.
///
/// ```text
/// Pending -> FirstRun -> Running -> Canceling -> Done
///    \                      \________________/
///     \-> Done (canceled before it ever ran)
/// ```
///
/// `FirstRun` is only observable while the first-run hook executes.
/// `Canceling` never returns to `Running`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActivityState {
    /// Queued, never ticked.
    Pending,
    /// Executing its first-run hook.
    FirstRun,
    /// Ticking normally.
    Running,
    /// Cancel accepted; draining children before completion.
    Canceling,
    /// Finished or discarded. Must not be ticked again.
    Done,
}

impl ActivityState {
    /// Returns true once the activity has begun ticking and has not finished.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::FirstRun | Self::Running | Self::Canceling)
    }

    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn is_canceling(self) -> bool {
        matches!(self, Self::Canceling)
    }

    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}
