//! Interruption controller.
//!
//! Cancellation is the only externally triggered transition. A request
//! takes effect immediately on an interruptible activity, is recorded and
//! deferred on a non-interruptible one, and drops an activity that never
//! started. Once an activity is canceling it stays canceling: it skips its
//! own logic and only drains the children it already has.

use tracing::debug;

use crate::event::ActivityEventKind;
use crate::node::ActivityNode;
use crate::scope::Frame;
use crate::state::ActivityState;

/// A cancel request recorded on a non-interruptible activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CancelRequest {
    /// Also cancel the activity's child chain once the request applies.
    pub cascade: bool,
}

/// What a cancel request did to the targeted activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CancelOutcome {
    /// The activity is now canceling.
    Canceled,
    /// The activity is non-interruptible; the request waits.
    Deferred,
    /// The activity had not started and was removed without hooks.
    Dropped,
    AlreadyCanceling,
    AlreadyDone,
}

impl CancelOutcome {
    /// Whether the request changed the activity's state right away.
    pub const fn took_effect(self) -> bool {
        matches!(self, Self::Canceled | Self::Dropped)
    }
}

impl<C> ActivityNode<C> {
    /// Applies a cancel request to this node.
    pub(crate) fn request_cancel(&mut self, cascade: bool, frame: &mut Frame) -> CancelOutcome {
        let name = self.name();
        match self.state {
            ActivityState::Done => CancelOutcome::AlreadyDone,
            ActivityState::Pending => {
                self.state = ActivityState::Done;
                frame.emit(name, ActivityEventKind::Dropped);
                CancelOutcome::Dropped
            }
            ActivityState::Canceling => {
                if cascade {
                    self.children.cancel_all(true, frame);
                }
                CancelOutcome::AlreadyCanceling
            }
            ActivityState::FirstRun | ActivityState::Running => {
                self.cancel_requested = true;
                if !self.is_interruptible() {
                    let cascade = cascade || self.deferred_cancel.is_some_and(|r| r.cascade);
                    self.deferred_cancel = Some(CancelRequest { cascade });
                    debug!(
                        target: "activity::cancel",
                        actor = %frame.actor,
                        activity = name,
                        cascade,
                        "cancel deferred on non-interruptible activity"
                    );
                    frame.emit(name, ActivityEventKind::CancelDeferred);
                    return CancelOutcome::Deferred;
                }
                self.begin_cancel(cascade, frame);
                CancelOutcome::Canceled
            }
        }
    }

    /// Applies a deferred request once the activity reports itself
    /// interruptible again.
    pub(crate) fn apply_deferred_cancel(&mut self, frame: &mut Frame) {
        if self.state != ActivityState::Running || !self.is_interruptible() {
            return;
        }
        if let Some(request) = self.deferred_cancel {
            self.begin_cancel(request.cascade, frame);
        }
    }

    fn begin_cancel(&mut self, cascade: bool, frame: &mut Frame) {
        self.deferred_cancel = None;
        self.state = ActivityState::Canceling;
        frame.emit(self.name(), ActivityEventKind::CancelRequested);
        if cascade {
            self.children.cancel_all(true, frame);
        }
    }
}
