//! Activity state machine.
//!
//! An [`ActivityNode`] wraps one boxed [`Activity`] with the bookkeeping the
//! scheduler needs: lifecycle state, the first-run/finishing flags, a
//! deferred cancel request and the node's own [`ChildChain`].
//!
//! # Tick algorithm
//!
//! 1. A `Done` node, or one already ticked this tick, is an invariant
//!    violation and is rejected.
//! 2. A `Pending` node enters `FirstRun`, fires `on_first_run` once and
//!    becomes `Running`.
//! 3. A deferred cancel is applied if the activity now reports itself
//!    interruptible.
//! 4. With `child_has_priority`, the chain advances first and the
//!    activity's own `tick` only runs once the chain has drained. Without
//!    it, the own `tick` runs first and the chain advances afterwards.
//!    A canceling node skips its own `tick` entirely.
//! 5. The node completes when its own work reported `Done` at some point
//!    (`finishing`) and the chain is empty; `on_last_run` then fires once.

use std::fmt;

use tracing::trace;

use crate::activity::{Activity, ActivityKind};
use crate::cancel::CancelRequest;
use crate::chain::ChildChain;
use crate::error::ActivityError;
use crate::event::ActivityEventKind;
use crate::scope::{Frame, Scope};
use crate::snapshot::ActivitySnapshot;
use crate::state::ActivityState;
use crate::status::Status;
use crate::types::Tick;

/// A scheduled activity together with its lifecycle state and children.
pub struct ActivityNode<C> {
    activity: Box<dyn Activity<C>>,
    pub(crate) state: ActivityState,
    has_run: bool,
    finishing: bool,
    pub(crate) cancel_requested: bool,
    pub(crate) deferred_cancel: Option<CancelRequest>,
    ended_canceled: bool,
    eligible_from: Tick,
    last_tick: Option<Tick>,
    pub(crate) children: ChildChain<C>,
}

impl<C> ActivityNode<C> {
    pub fn new<A>(activity: A) -> Self
    where
        A: Activity<C> + 'static,
    {
        Self::from_boxed(Box::new(activity))
    }

    pub fn from_boxed(activity: Box<dyn Activity<C>>) -> Self {
        Self {
            activity,
            state: ActivityState::Pending,
            has_run: false,
            finishing: false,
            cancel_requested: false,
            deferred_cancel: None,
            ended_canceled: false,
            eligible_from: Tick::ZERO,
            last_tick: None,
            children: ChildChain::new(),
        }
    }

    /// Pre-populates the child chain (builder pattern).
    ///
    /// Pre-populated children are eligible on the node's first tick.
    #[must_use]
    pub fn with_child<A>(self, activity: A) -> Self
    where
        A: Activity<C> + 'static,
    {
        self.with_child_node(ActivityNode::new(activity))
    }

    #[must_use]
    pub fn with_child_node(mut self, child: ActivityNode<C>) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = ActivityNode<C>>) -> Self {
        for child in children {
            self.children.push(child);
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.activity.name()
    }

    pub fn kind(&self) -> ActivityKind {
        self.activity.kind()
    }

    pub fn state(&self) -> ActivityState {
        self.state
    }

    /// The wrapped activity.
    pub fn activity(&self) -> &dyn Activity<C> {
        self.activity.as_ref()
    }

    pub fn is_interruptible(&self) -> bool {
        self.activity.is_interruptible()
    }

    /// Whether the first-run hook has fired.
    pub fn has_run(&self) -> bool {
        self.has_run
    }

    pub fn is_canceling(&self) -> bool {
        self.state.is_canceling()
    }

    /// A cancel was requested, whether or not it has taken effect yet.
    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    /// A cancel request is waiting for the activity to become interruptible.
    pub fn is_cancel_deferred(&self) -> bool {
        self.deferred_cancel.is_some()
    }

    /// Whether the node finished while canceling. Only meaningful once `Done`.
    pub fn was_canceled(&self) -> bool {
        self.ended_canceled
    }

    pub fn children(&self) -> &ChildChain<C> {
        &self.children
    }

    pub(crate) fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    pub(crate) fn is_eligible(&self, now: Tick) -> bool {
        self.eligible_from <= now
    }

    pub(crate) fn set_eligible_from(&mut self, tick: Tick) {
        self.eligible_from = tick;
    }

    /// Debug view of this node and its descendants.
    pub fn snapshot(&self) -> ActivitySnapshot {
        ActivitySnapshot {
            name: self.name().to_owned(),
            kind: self.kind(),
            state: self.state,
            interruptible: self.is_interruptible(),
            cancel_pending: self.deferred_cancel.is_some(),
            children: self.children.iter().map(ActivityNode::snapshot).collect(),
        }
    }

    /// Advances this node by one tick.
    pub(crate) fn tick(&mut self, ctx: &mut C, frame: &mut Frame) -> Result<Status, ActivityError> {
        let name = self.activity.name();
        let now = frame.now;

        if self.state.is_done() {
            return Err(ActivityError::TickAfterDone { activity: name });
        }
        if self.last_tick == Some(now) {
            return Err(ActivityError::DoubleTick {
                activity: name,
                tick: now,
            });
        }
        if frame.depth > frame.config.max_chain_depth {
            return Err(ActivityError::ChainTooDeep {
                activity: name,
                depth: frame.depth,
            });
        }
        self.last_tick = Some(now);

        if self.state.is_pending() {
            self.run_first(ctx, frame)?;
        }

        self.apply_deferred_cancel(frame);

        if self.activity.child_has_priority() {
            let drained = self.children.advance(ctx, frame, false)?;
            if drained && !self.finishing {
                self.finishing = self.run_own(ctx, frame)?.is_done();
            }
        } else {
            if !self.finishing {
                self.finishing = self.run_own(ctx, frame)?.is_done();
            }
            self.children.advance(ctx, frame, false)?;
        }

        if self.finishing && self.children.is_empty() {
            self.finish(ctx, frame);
            return Ok(Status::Done);
        }
        Ok(Status::Running)
    }

    fn run_first(&mut self, ctx: &mut C, frame: &mut Frame) -> Result<(), ActivityError> {
        let name = self.activity.name();
        if self.has_run {
            return Err(ActivityError::FirstRunRepeated { activity: name });
        }
        self.has_run = true;
        self.state = ActivityState::FirstRun;
        frame.emit(name, ActivityEventKind::Started);

        let mut scope = Scope::new(ctx, &mut self.children, frame, name);
        self.activity.on_first_run(&mut scope)?;

        self.state = ActivityState::Running;
        Ok(())
    }

    fn run_own(&mut self, ctx: &mut C, frame: &mut Frame) -> Result<Status, ActivityError> {
        // Canceling activities only drain their children.
        if self.state.is_canceling() {
            return Ok(Status::Done);
        }
        let name = self.activity.name();
        let mut scope = Scope::new(ctx, &mut self.children, frame, name);
        self.activity.tick(&mut scope)
    }

    fn finish(&mut self, ctx: &mut C, frame: &mut Frame) {
        let name = self.activity.name();
        self.ended_canceled = self.state.is_canceling();
        self.state = ActivityState::Done;
        self.activity.on_last_run(ctx);

        trace!(
            target: "activity::node",
            actor = %frame.actor,
            tick = %frame.now,
            activity = name,
            canceled = self.ended_canceled,
            "activity finished"
        );

        let kind = if self.ended_canceled {
            ActivityEventKind::Canceled
        } else {
            ActivityEventKind::Completed
        };
        frame.emit(name, kind);
    }

    /// Ends this node and its chain without ticking them again.
    ///
    /// Descendants are reported as discarded; this node is reported with
    /// `kind`. Nodes that never started are dropped silently (no hooks).
    pub(crate) fn abort(&mut self, ctx: &mut C, frame: &mut Frame, kind: ActivityEventKind) {
        self.children.abort_all(ctx, frame);
        if self.state.is_done() {
            return;
        }

        let name = self.activity.name();
        self.ended_canceled = self.state.is_canceling();
        self.state = ActivityState::Done;
        if self.has_run {
            self.activity.on_last_run(ctx);
            frame.emit(name, kind);
        } else {
            frame.emit(name, ActivityEventKind::Dropped);
        }
    }

    /// Notifies this node and its chain that the owning actor is going away.
    pub(crate) fn dispose(&mut self, ctx: &mut C) {
        self.children.dispose_all(ctx);
        if self.state.is_active() {
            self.activity.on_actor_dispose(ctx);
        }
    }
}

impl<C> fmt::Debug for ActivityNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityNode")
            .field("name", &self.name())
            .field("state", &self.state)
            .field("has_run", &self.has_run)
            .field("finishing", &self.finishing)
            .field("deferred_cancel", &self.deferred_cancel)
            .field("children", &self.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::ActivityQueue;
    use crate::testing::{Log, Probe, entries, tick_n};
    use crate::types::ActorId;

    #[test]
    fn first_run_fires_exactly_once() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue(Probe::new("p", 4), false);
        tick_n(&mut queue, &mut log, 1..=4);

        assert_eq!(
            entries(&log),
            ["p:first", "p:tick1", "p:tick2", "p:tick3", "p:tick4", "p:last"]
        );
    }

    #[test]
    fn parent_waits_for_priority_child() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue(Probe::new("p", 1).spawning(Probe::new("c", 3)), false);

        // Tick 1 only queues the child; it becomes eligible on tick 2.
        tick_n(&mut queue, &mut log, 1..=1);
        assert_eq!(entries(&log), ["p:first"]);

        tick_n(&mut queue, &mut log, 2..=3);
        assert!(!log.iter().any(|e| e.starts_with("p:tick")));

        // The child finishes on tick 4 and the parent resumes in that tick.
        tick_n(&mut queue, &mut log, 4..=4);
        assert_eq!(
            entries(&log),
            [
                "p:first", "c:first", "c:tick1", "c:tick2", "c:tick3", "c:last", "p:tick1",
                "p:last"
            ]
        );
        assert!(queue.is_idle());
    }

    #[test]
    fn parent_first_runs_own_logic_before_children() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue(
            Probe::new("p", 1)
                .parent_first()
                .spawning(Probe::new("c", 2)),
            false,
        );

        tick_n(&mut queue, &mut log, 1..=2);
        assert_eq!(entries(&log), ["p:first", "p:tick1", "c:first", "c:tick1"]);

        // Own work is finished, but the node only completes once the
        // chain has drained.
        assert_eq!(queue.current().map(|n| n.state()), Some(ActivityState::Running));
        tick_n(&mut queue, &mut log, 3..=3);
        assert_eq!(log[4..], ["c:tick2", "c:last", "p:last"]);
        assert!(queue.is_idle());
    }

    #[test]
    fn chain_advances_one_member_per_tick() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue_node(
            ActivityNode::new(Probe::new("p", 1))
                .with_child(Probe::new("a", 1))
                .with_child(Probe::new("b", 1)),
            false,
        );

        tick_n(&mut queue, &mut log, 1..=1);
        assert_eq!(entries(&log), ["p:first", "a:first", "a:tick1", "a:last"]);

        tick_n(&mut queue, &mut log, 2..=2);
        assert_eq!(
            log[4..],
            ["b:first", "b:tick1", "b:last", "p:tick1", "p:last"]
        );
    }

    struct Replanner {
        resolved: Option<bool>,
    }

    impl Activity<Log> for Replanner {
        fn tick(&mut self, scope: &mut Scope<'_, Log>) -> Result<Status, ActivityError> {
            if self.resolved.is_some() {
                return Ok(Status::Done);
            }
            scope.queue_child_now(Probe::new("path", 1));
            self.resolved = Some(scope.resolve_children_now()?);
            Ok(Status::Running)
        }
    }

    #[test]
    fn forced_resolution_ticks_child_in_same_tick() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue(Replanner { resolved: None }, false);

        tick_n(&mut queue, &mut log, 1..=1);
        assert_eq!(entries(&log), ["path:first", "path:tick1", "path:last"]);

        let done = queue.tick(&mut log, Tick(2)).unwrap();
        assert!(done.is_completed());
    }

    #[test]
    fn deep_chains_fault_instead_of_recursing() {
        let config = crate::SchedulerConfig::new().with_max_chain_depth(2);
        let mut queue = ActivityQueue::with_config(ActorId(1), config);
        let mut log = Vec::new();

        let mut node = ActivityNode::new(Probe::new("leaf", 1));
        for label in ["d3", "d2", "d1", "d0"] {
            node = ActivityNode::new(Probe::new(label, 1)).with_child_node(node);
        }
        queue.enqueue_node(node, false);

        let error = queue.tick(&mut log, Tick(1)).unwrap_err();
        assert!(matches!(error, ActivityError::ChainTooDeep { activity: "d3", depth: 3 }));
        assert!(queue.is_idle());
        // Started nodes are closed deepest first.
        assert_eq!(
            log.iter().filter(|e| e.ends_with(":last")).collect::<Vec<_>>(),
            ["d2:last", "d1:last", "d0:last"]
        );
    }
}
