//! One-shot callbacks.

use activity::{Activity, ActivityError, Scope, Status};

/// Runs a closure against the actor state on its first tick, then completes.
pub struct CallFunc<F> {
    func: Option<F>,
    interruptible: bool,
}

impl<F> CallFunc<F> {
    pub fn new(func: F) -> Self {
        Self {
            func: Some(func),
            interruptible: true,
        }
    }

    /// Ensures the callback still runs if a cancel arrives after the
    /// activity has started.
    #[must_use]
    pub fn uninterruptible(mut self) -> Self {
        self.interruptible = false;
        self
    }
}

impl<C, F> Activity<C> for CallFunc<F>
where
    F: FnOnce(&mut C),
{
    fn is_interruptible(&self) -> bool {
        self.interruptible
    }

    fn tick(&mut self, scope: &mut Scope<'_, C>) -> Result<Status, ActivityError> {
        if let Some(func) = self.func.take() {
            func(scope.ctx_mut());
        }
        Ok(Status::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity::{ActivityQueue, ActorId, Tick};

    #[test]
    fn runs_exactly_once() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut calls = 0u32;
        queue.enqueue(CallFunc::new(|n: &mut u32| *n += 1), false);
        queue.enqueue(CallFunc::new(|n: &mut u32| *n += 10), false);

        for n in 1..=4 {
            queue.tick(&mut calls, Tick(n)).unwrap();
        }
        assert_eq!(calls, 11);
    }

    #[test]
    fn canceled_before_start_never_runs() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut calls = 0u32;
        queue.enqueue(CallFunc::new(|n: &mut u32| *n += 1), false);
        queue.cancel_active(false);
        queue.tick(&mut calls, Tick(1)).unwrap();
        assert_eq!(calls, 0);
    }
}
