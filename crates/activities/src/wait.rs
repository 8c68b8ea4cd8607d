//! Fixed and conditional delays.

use activity::{Activity, ActivityError, Scope, Status};

/// Reports `Running` for `ticks - 1` ticks and `Done` on the `ticks`-th.
///
/// `Wait::new(0)` completes on its first tick.
#[derive(Clone, Debug)]
pub struct Wait {
    remaining: u32,
    interruptible: bool,
}

impl Wait {
    pub fn new(ticks: u32) -> Self {
        Self {
            remaining: ticks,
            interruptible: true,
        }
    }

    /// A delay that cannot be canceled once started.
    pub fn uninterruptible(ticks: u32) -> Self {
        Self {
            remaining: ticks,
            interruptible: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl<C> Activity<C> for Wait {
    fn is_interruptible(&self) -> bool {
        self.interruptible
    }

    fn tick(&mut self, _scope: &mut Scope<'_, C>) -> Result<Status, ActivityError> {
        self.remaining = self.remaining.saturating_sub(1);
        Ok(Status::done_if(self.remaining == 0))
    }
}

/// Waits until a predicate over the actor state holds.
pub struct WaitFor<F> {
    predicate: F,
}

impl<F> WaitFor<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<C, F> Activity<C> for WaitFor<F>
where
    F: FnMut(&C) -> bool,
{
    fn tick(&mut self, scope: &mut Scope<'_, C>) -> Result<Status, ActivityError> {
        Ok(Status::done_if((self.predicate)(scope.ctx())))
    }
}
