//! Scripted activities shared by the unit tests.
//!
//! The context is a plain `Vec<String>` log; probes append `label:hook`
//! entries so tests can assert exact hook order.

use crate::activity::Activity;
use crate::error::ActivityError;
use crate::queue::ActivityQueue;
use crate::scope::Scope;
use crate::status::Status;
use crate::types::Tick;

pub(crate) type Log = Vec<String>;

pub(crate) fn entries(log: &Log) -> Vec<&str> {
    log.iter().map(String::as_str).collect()
}

pub(crate) fn tick_n(
    queue: &mut ActivityQueue<Log>,
    log: &mut Log,
    ticks: impl IntoIterator<Item = u64>,
) {
    for n in ticks {
        queue.tick(log, Tick(n)).unwrap();
    }
}

/// Reports `Running` until its own tick has run `total` times.
pub(crate) struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub(crate) fn new(total: u32) -> Self {
        Self { remaining: total }
    }
}

impl Activity<Log> for Countdown {
    fn tick(&mut self, _scope: &mut Scope<'_, Log>) -> Result<Status, ActivityError> {
        self.remaining = self.remaining.saturating_sub(1);
        Ok(Status::done_if(self.remaining == 0))
    }
}

/// Activity that logs every hook and can be scripted to spawn children,
/// guard part of its run or fail.
pub(crate) struct Probe {
    label: &'static str,
    total: u32,
    ticked: u32,
    guard: u32,
    child_priority: bool,
    spawn: Vec<Probe>,
    fail_at: Option<u32>,
}

impl Probe {
    pub(crate) fn new(label: &'static str, total: u32) -> Self {
        Self {
            label,
            total,
            ticked: 0,
            guard: 0,
            child_priority: true,
            spawn: Vec::new(),
            fail_at: None,
        }
    }

    /// Non-interruptible until its own tick has run `ticks` times.
    pub(crate) fn guarded(mut self, ticks: u32) -> Self {
        self.guard = ticks;
        self
    }

    pub(crate) fn parent_first(mut self) -> Self {
        self.child_priority = false;
        self
    }

    /// Queues `child` from the first-run hook.
    pub(crate) fn spawning(mut self, child: Probe) -> Self {
        self.spawn.push(child);
        self
    }

    pub(crate) fn failing_at(mut self, tick: u32) -> Self {
        self.fail_at = Some(tick);
        self
    }
}

impl Activity<Log> for Probe {
    fn name(&self) -> &'static str {
        self.label
    }

    fn is_interruptible(&self) -> bool {
        self.ticked >= self.guard
    }

    fn child_has_priority(&self) -> bool {
        self.child_priority
    }

    fn on_first_run(&mut self, scope: &mut Scope<'_, Log>) -> Result<(), ActivityError> {
        scope.ctx_mut().push(format!("{}:first", self.label));
        for child in self.spawn.drain(..) {
            scope.queue_child(child);
        }
        Ok(())
    }

    fn tick(&mut self, scope: &mut Scope<'_, Log>) -> Result<Status, ActivityError> {
        self.ticked += 1;
        scope
            .ctx_mut()
            .push(format!("{}:tick{}", self.label, self.ticked));
        if self.fail_at == Some(self.ticked) {
            return Err(ActivityError::faulted(self.label, "scripted failure"));
        }
        Ok(Status::done_if(self.ticked >= self.total))
    }

    fn on_last_run(&mut self, ctx: &mut Log) {
        ctx.push(format!("{}:last", self.label));
    }

    fn on_actor_dispose(&mut self, ctx: &mut Log) {
        ctx.push(format!("{}:dispose", self.label));
    }
}
