//! Per-actor activity queue.
//!
//! The queue holds an actor's top-level activities in insertion order. Only
//! the head is ever ticked, so at most one top-level activity is active at
//! any time. When the head completes it is removed and the next one starts
//! on the following tick.

use std::collections::VecDeque;

use tracing::debug;

use crate::activity::{Activity, ActivityKind, Targets};
use crate::cancel::CancelOutcome;
use crate::config::SchedulerConfig;
use crate::error::ActivityError;
use crate::event::{ActivityEvent, ActivityEventKind};
use crate::node::ActivityNode;
use crate::scope::Frame;
use crate::snapshot::ActivitySnapshot;
use crate::status::Status;
use crate::target::TargetLineNode;
use crate::types::{ActorId, Tick};

/// Result of one successful queue tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueTick {
    /// Nothing was queued.
    Idle,
    /// The head was ticked and is still in progress.
    Running,
    /// The head finished this tick and was removed.
    Completed {
        activity: &'static str,
        canceled: bool,
    },
}

impl QueueTick {
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Ordered top-level activities of one actor.
pub struct ActivityQueue<C> {
    units: VecDeque<ActivityNode<C>>,
    frame: Frame,
    last_tick: Option<Tick>,
}

impl<C> ActivityQueue<C> {
    pub fn new(actor: ActorId) -> Self {
        Self::with_config(actor, SchedulerConfig::default())
    }

    pub fn with_config(actor: ActorId, config: SchedulerConfig) -> Self {
        Self {
            units: VecDeque::new(),
            frame: Frame::new(actor, config),
            last_tick: None,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.frame.actor
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.frame.config
    }

    pub fn is_idle(&self) -> bool {
        self.units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The head of the queue (the active activity once it has been ticked).
    pub fn current(&self) -> Option<&ActivityNode<C>> {
        self.units.front()
    }

    /// Top-level activities in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityNode<C>> + '_ {
        self.units.iter()
    }

    /// The most recent tick this queue processed.
    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    /// Appends an activity. Queueing never starts execution.
    ///
    /// With `run_immediately` every queued activity is canceled first, so
    /// the new one starts as soon as the current head has drained. A
    /// non-interruptible head still finishes its stretch before that.
    pub fn enqueue<A>(&mut self, activity: A, run_immediately: bool)
    where
        A: Activity<C> + 'static,
    {
        self.enqueue_node(ActivityNode::new(activity), run_immediately);
    }

    /// Like [`enqueue`](Self::enqueue) for a node that may already carry a
    /// child chain.
    pub fn enqueue_node(&mut self, node: ActivityNode<C>, run_immediately: bool) {
        if run_immediately {
            self.cancel_all(true);
        }
        debug!(
            target: "activity::queue",
            actor = %self.frame.actor,
            activity = node.name(),
            run_immediately,
            queued = self.units.len(),
            "activity queued"
        );
        self.units.push_back(node);
    }

    /// Advances the head activity once.
    ///
    /// A repeated or rewound tick number is rejected before anything runs.
    /// If the head (or anything below it) returns an error, the head is
    /// aborted and the error is returned; queued activities behind it are
    /// kept and the next one starts on the following tick.
    pub fn tick(&mut self, ctx: &mut C, now: Tick) -> Result<QueueTick, ActivityError> {
        if let Some(last) = self.last_tick {
            if now == last {
                return Err(ActivityError::QueueAlreadyTicked {
                    actor: self.frame.actor,
                    tick: now,
                });
            }
            if now < last {
                return Err(ActivityError::ClockRewind {
                    actor: self.frame.actor,
                    tick: now,
                    last,
                });
            }
        }
        self.last_tick = Some(now);
        self.frame.begin(now);

        let Some(head) = self.units.front_mut() else {
            return Ok(QueueTick::Idle);
        };

        match head.tick(ctx, &mut self.frame) {
            Ok(Status::Running) => Ok(QueueTick::Running),
            Ok(Status::Done) => {
                let activity = head.name();
                let canceled = head.was_canceled();
                self.units.pop_front();
                Ok(QueueTick::Completed { activity, canceled })
            }
            Err(error) => {
                debug!(
                    target: "activity::queue",
                    actor = %self.frame.actor,
                    tick = %now,
                    activity = head.name(),
                    code = error.error_code(),
                    "aborting faulted activity"
                );
                self.frame.depth = 0;
                if let Some(mut node) = self.units.pop_front() {
                    node.abort(
                        ctx,
                        &mut self.frame,
                        ActivityEventKind::Faulted {
                            error: error.to_string(),
                        },
                    );
                }
                Err(error)
            }
        }
    }

    /// Cancels the head activity, optionally cascading into its children.
    ///
    /// Returns `None` when the queue is empty.
    pub fn cancel_active(&mut self, also_cancel_child: bool) -> Option<CancelOutcome> {
        self.frame.depth = 0;
        let outcome = self
            .units
            .front_mut()?
            .request_cancel(also_cancel_child, &mut self.frame);
        self.units.retain(|unit| !unit.state().is_done());
        Some(outcome)
    }

    /// Cancels the head and drops every pending activity behind it.
    pub fn cancel_all(&mut self, also_cancel_child: bool) {
        self.frame.depth = 0;
        for unit in self.units.iter_mut() {
            unit.request_cancel(also_cancel_child, &mut self.frame);
        }
        self.units.retain(|unit| !unit.state().is_done());
    }

    /// Depth-first view of every queued activity and its descendants.
    ///
    /// Yields `(depth, node)` with top-level activities at depth 0.
    pub fn walk(&self) -> impl Iterator<Item = (usize, &ActivityNode<C>)> + '_ {
        let mut stack: Vec<(usize, &ActivityNode<C>)> =
            self.units.iter().rev().map(|node| (0, node)).collect();
        std::iter::from_fn(move || {
            let (depth, node) = stack.pop()?;
            stack.extend(node.children().iter().rev().map(|child| (depth + 1, child)));
            Some((depth, node))
        })
    }

    /// Whether any live activity in the tree has the given kind.
    pub fn contains_kind(&self, kind: ActivityKind) -> bool {
        self.walk()
            .any(|(_, node)| node.kind() == kind && !node.state().is_done())
    }

    /// Targets of the head activity.
    pub fn targets<'a>(&'a self, ctx: &'a C) -> Targets<'a> {
        match self.units.front() {
            Some(head) => head.activity().targets(ctx),
            None => Box::new(std::iter::empty()),
        }
    }

    /// Target-line overlay for the whole queue.
    ///
    /// Canceling activities are skipped. Each activity decides whether its
    /// own lines include those of its children.
    pub fn target_line_nodes<'a>(
        &'a self,
        ctx: &'a C,
    ) -> impl Iterator<Item = TargetLineNode> + 'a {
        self.units
            .iter()
            .filter(|unit| !unit.is_canceling())
            .flat_map(move |unit| unit.activity().target_line_nodes(ctx))
    }

    pub fn snapshot(&self) -> Vec<ActivitySnapshot> {
        self.units.iter().map(ActivityNode::snapshot).collect()
    }

    /// Takes the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<ActivityEvent> {
        self.frame.take_events()
    }

    pub fn pending_events(&self) -> &[ActivityEvent] {
        self.frame.pending_events()
    }

    /// Notifies every live activity that the actor is being removed, then
    /// empties the queue. No last-run hooks fire.
    pub fn dispose(&mut self, ctx: &mut C) {
        for mut unit in self.units.drain(..) {
            unit.dispose(ctx);
        }
    }
}

impl<C> std::fmt::Debug for ActivityQueue<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityQueue")
            .field("actor", &self.frame.actor)
            .field("units", &self.units)
            .field("last_tick", &self.last_tick)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Countdown, Probe, entries, tick_n};

    #[test]
    fn countdown_reports_done_on_tick_twenty() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue(Countdown::new(20), false);

        for n in 1..20 {
            assert_eq!(queue.tick(&mut log, Tick(n)).unwrap(), QueueTick::Running);
        }
        assert_eq!(
            queue.tick(&mut log, Tick(20)).unwrap(),
            QueueTick::Completed {
                activity: "Countdown",
                canceled: false
            }
        );
        assert!(queue.is_idle());
        assert_eq!(queue.tick(&mut log, Tick(21)).unwrap(), QueueTick::Idle);
    }

    #[test]
    fn next_head_starts_on_following_tick() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue(Probe::new("a", 1), false);
        queue.enqueue(Probe::new("b", 1), false);

        assert!(queue.tick(&mut log, Tick(1)).unwrap().is_completed());
        assert_eq!(entries(&log), ["a:first", "a:tick1", "a:last"]);
        assert_eq!(queue.current().map(|n| n.state()), Some(crate::ActivityState::Pending));

        assert!(queue.tick(&mut log, Tick(2)).unwrap().is_completed());
        assert_eq!(log[3..], ["b:first", "b:tick1", "b:last"]);
    }

    #[test]
    fn single_active_unit() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        for label in ["a", "b", "c"] {
            queue.enqueue(Probe::new(label, 3), false);
        }
        for n in 1..=9 {
            queue.tick(&mut log, Tick(n)).unwrap();
            let active = queue.iter().filter(|u| u.state().is_active()).count();
            assert!(active <= 1, "tick {n}: {active} active units");
        }
        assert!(queue.is_idle());
    }

    #[test]
    fn repeated_and_rewound_ticks_are_rejected() {
        let mut queue = ActivityQueue::new(ActorId(4));
        let mut log = Vec::new();
        queue.enqueue(Probe::new("a", 5), false);

        queue.tick(&mut log, Tick(3)).unwrap();
        let before = log.len();

        let again = queue.tick(&mut log, Tick(3)).unwrap_err();
        assert!(matches!(again, ActivityError::QueueAlreadyTicked { .. }));
        let rewind = queue.tick(&mut log, Tick(2)).unwrap_err();
        assert!(matches!(rewind, ActivityError::ClockRewind { .. }));
        assert!(rewind.is_rejection());

        assert_eq!(log.len(), before);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.last_tick(), Some(Tick(3)));
    }

    #[test]
    fn fault_aborts_only_the_head() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue(Probe::new("bad", 5).failing_at(2), false);
        queue.enqueue(Probe::new("next", 1), false);

        queue.tick(&mut log, Tick(1)).unwrap();
        let error = queue.tick(&mut log, Tick(2)).unwrap_err();
        assert_eq!(error.error_code(), "faulted");
        assert_eq!(queue.len(), 1);
        assert_eq!(entries(&log), ["bad:first", "bad:tick1", "bad:tick2", "bad:last"]);

        let events = queue.drain_events();
        assert!(matches!(
            events.last().map(|e| &e.kind),
            Some(ActivityEventKind::Faulted { .. })
        ));

        assert!(queue.tick(&mut log, Tick(3)).unwrap().is_completed());
        assert!(queue.is_idle());
    }

    #[test]
    fn run_immediately_replaces_pending_work() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue(Probe::new("a", 10), false);
        queue.enqueue(Probe::new("b", 10), false);
        queue.tick(&mut log, Tick(1)).unwrap();

        queue.enqueue(Probe::new("urgent", 1), true);
        // "a" is canceling, "b" was dropped before it ever ran.
        assert_eq!(queue.len(), 2);
        assert!(queue.current().is_some_and(|n| n.is_canceling()));

        assert_eq!(
            queue.tick(&mut log, Tick(2)).unwrap(),
            QueueTick::Completed {
                activity: "a",
                canceled: true
            }
        );
        assert!(queue.tick(&mut log, Tick(3)).unwrap().is_completed());
        assert!(!log.iter().any(|entry| entry.starts_with("b:")));
        assert!(log.contains(&"urgent:first".to_owned()));
    }

    #[test]
    fn cancel_active_on_empty_queue() {
        let mut queue: ActivityQueue<Vec<String>> = ActivityQueue::new(ActorId(1));
        assert_eq!(queue.cancel_active(true), None);
    }

    #[test]
    fn walk_is_depth_first() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue_node(
            ActivityNode::new(Probe::new("root", 1))
                .with_child_node(ActivityNode::new(Probe::new("a", 5)).with_child(Probe::new("a1", 5)))
                .with_child(Probe::new("b", 5)),
            false,
        );
        queue.enqueue(Probe::new("later", 1), false);
        queue.tick(&mut log, Tick(1)).unwrap();

        let order: Vec<_> = queue.walk().map(|(d, n)| (d, n.name())).collect();
        assert_eq!(
            order,
            [(0, "root"), (1, "a"), (2, "a1"), (1, "b"), (0, "later")]
        );
        assert_eq!(queue.snapshot()[0].count(), 4);
    }

    #[test]
    fn dispose_notifies_live_units_only() {
        let mut queue = ActivityQueue::new(ActorId(1));
        let mut log = Vec::new();
        queue.enqueue(Probe::new("a", 5), false);
        queue.enqueue(Probe::new("b", 5), false);
        queue.tick(&mut log, Tick(1)).unwrap();

        queue.dispose(&mut log);
        assert!(queue.is_idle());
        assert!(log.contains(&"a:dispose".to_owned()));
        assert!(!log.iter().any(|entry| entry.starts_with("b:")));
        assert!(!log.contains(&"a:last".to_owned()));
    }

    #[test]
    fn events_are_not_recorded_when_disabled() {
        let config = SchedulerConfig::new().with_record_events(false);
        let mut queue = ActivityQueue::with_config(ActorId(1), config);
        let mut log = Vec::new();
        queue.enqueue(Probe::new("a", 1), false);
        tick_n(&mut queue, &mut log, 1..=2);
        assert!(queue.drain_events().is_empty());
    }
}
