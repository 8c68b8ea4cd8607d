//! Status returned by a single tick of an activity.

/// What an activity reports at the end of one tick.
///
/// # Fixed-step Semantics
///
/// A tick always returns synchronously. "Waiting" is expressed by returning
/// [`Status::Running`] for as many ticks as the wait lasts; there is no
/// suspended or blocked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The activity has more work to do on a later tick.
    Running,

    /// The activity has finished its own work.
    ///
    /// Expected failures (target lost, path unavailable) are also reported
    /// as `Done`; the activity simply achieved nothing.
    Done,
}

impl Status {
    /// Returns `true` if this status is `Done`.
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, Status::Done)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Maps a "finished?" flag onto a status.
    #[inline]
    pub fn done_if(finished: bool) -> Self {
        if finished { Status::Done } else { Status::Running }
    }
}
