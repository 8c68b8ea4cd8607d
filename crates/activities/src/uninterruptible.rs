//! Decorator that shields an activity from cancellation.

use activity::{Activity, ActivityError, ActivityKind, Scope, Status, TargetLines, Targets};

/// Runs the wrapped activity to natural completion. Cancel requests made
/// while it runs stay deferred and lapse when it finishes.
pub struct Uninterruptible<A> {
    inner: A,
}

impl<A> Uninterruptible<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<C, A> Activity<C> for Uninterruptible<A>
where
    A: Activity<C>,
{
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn kind(&self) -> ActivityKind {
        self.inner.kind()
    }

    fn is_interruptible(&self) -> bool {
        false
    }

    fn child_has_priority(&self) -> bool {
        self.inner.child_has_priority()
    }

    fn on_first_run(&mut self, scope: &mut Scope<'_, C>) -> Result<(), ActivityError> {
        self.inner.on_first_run(scope)
    }

    fn tick(&mut self, scope: &mut Scope<'_, C>) -> Result<Status, ActivityError> {
        self.inner.tick(scope)
    }

    fn on_last_run(&mut self, ctx: &mut C) {
        self.inner.on_last_run(ctx)
    }

    fn on_actor_dispose(&mut self, ctx: &mut C) {
        self.inner.on_actor_dispose(ctx)
    }

    fn targets<'a>(&'a self, ctx: &'a C) -> Targets<'a> {
        self.inner.targets(ctx)
    }

    fn target_line_nodes<'a>(&'a self, ctx: &'a C) -> TargetLines<'a> {
        self.inner.target_line_nodes(ctx)
    }
}
