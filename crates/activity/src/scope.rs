//! The handle an activity receives while its hooks run.
//!
//! A [`Scope`] bundles the owning actor's state with the activity's own child
//! chain and the current tick. It is the only way an activity can queue,
//! cancel or discard children, which keeps every structural change to the
//! activity tree inside the tick that caused it.

use tracing::debug;

use crate::activity::Activity;
use crate::chain::ChildChain;
use crate::config::SchedulerConfig;
use crate::error::ActivityError;
use crate::event::{ActivityEvent, ActivityEventKind};
use crate::node::ActivityNode;
use crate::types::{ActorId, Tick};

/// Per-queue bookkeeping threaded through every node tick.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) actor: ActorId,
    pub(crate) now: Tick,
    pub(crate) depth: usize,
    pub(crate) config: SchedulerConfig,
    events: Vec<ActivityEvent>,
}

impl Frame {
    pub(crate) fn new(actor: ActorId, config: SchedulerConfig) -> Self {
        Self {
            actor,
            now: Tick::ZERO,
            depth: 0,
            config,
            events: Vec::new(),
        }
    }

    /// Resets per-tick fields before the queue head is ticked.
    pub(crate) fn begin(&mut self, now: Tick) {
        self.now = now;
        self.depth = 0;
    }

    pub(crate) fn emit(&mut self, activity: &'static str, kind: ActivityEventKind) {
        tracing::trace!(
            target: "activity::event",
            actor = %self.actor,
            tick = %self.now,
            depth = self.depth,
            activity,
            kind = kind.as_ref(),
        );

        if self.config.record_events {
            self.events.push(ActivityEvent {
                tick: self.now,
                actor: self.actor,
                depth: self.depth,
                activity,
                kind,
            });
        }
    }

    pub(crate) fn take_events(&mut self) -> Vec<ActivityEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn pending_events(&self) -> &[ActivityEvent] {
        &self.events
    }
}

/// Access to actor state and the child chain during one hook invocation.
pub struct Scope<'a, C> {
    ctx: &'a mut C,
    children: &'a mut ChildChain<C>,
    frame: &'a mut Frame,
    owner: &'static str,
}

impl<'a, C> Scope<'a, C> {
    pub(crate) fn new(
        ctx: &'a mut C,
        children: &'a mut ChildChain<C>,
        frame: &'a mut Frame,
        owner: &'static str,
    ) -> Self {
        Self {
            ctx,
            children,
            frame,
            owner,
        }
    }

    /// State of the actor that owns this activity.
    pub fn ctx(&self) -> &C {
        self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut C {
        self.ctx
    }

    /// The tick currently being processed.
    pub fn now(&self) -> Tick {
        self.frame.now
    }

    pub fn actor(&self) -> ActorId {
        self.frame.actor
    }

    /// Nesting depth of the activity that owns this scope.
    pub fn depth(&self) -> usize {
        self.frame.depth
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Read-only view of the queued children, active child first.
    pub fn children(&self) -> impl Iterator<Item = &ActivityNode<C>> + '_ {
        self.children.iter()
    }

    /// Appends a child to the chain. It becomes eligible on the next tick.
    ///
    /// Scopes only exist while the owner's own logic runs, which never
    /// happens once it is canceling, so a canceling activity cannot start
    /// new children.
    pub fn queue_child<A>(&mut self, activity: A)
    where
        A: Activity<C> + 'static,
    {
        self.queue_child_node(ActivityNode::new(activity));
    }

    /// Like [`queue_child`](Self::queue_child) for a pre-built node.
    pub fn queue_child_node(&mut self, mut node: ActivityNode<C>) {
        node.set_eligible_from(self.frame.now.next());
        self.children.push(node);
    }

    /// Appends a child that may be ticked during the current tick.
    ///
    /// This is the exception to the next-tick rule. It only has an effect
    /// if the chain is advanced again this tick, either automatically
    /// (when the owner does not give its children priority) or through
    /// [`resolve_children_now`](Self::resolve_children_now).
    pub fn queue_child_now<A>(&mut self, activity: A)
    where
        A: Activity<C> + 'static,
    {
        let mut node = ActivityNode::new(activity);
        node.set_eligible_from(self.frame.now);
        self.children.push(node);
    }

    /// Advances the child chain within the current tick.
    ///
    /// Used to re-derive state (e.g. a path) before resuming in the same
    /// frame. A node is never ticked twice in one tick, so calling this
    /// after the chain already ran only advances a newly eligible head.
    ///
    /// Returns whether the chain is now empty.
    pub fn resolve_children_now(&mut self) -> Result<bool, ActivityError> {
        self.children.advance(self.ctx, self.frame, true)
    }

    /// Cancels every child: the active one is canceled (or deferred if it is
    /// non-interruptible), pending ones are dropped without running.
    pub fn cancel_children(&mut self, cascade: bool) {
        if self.children.is_empty() {
            return;
        }
        debug!(
            target: "activity::scope",
            actor = %self.frame.actor,
            owner = self.owner,
            children = self.children.len(),
            cascade,
            "canceling child chain"
        );
        self.children.cancel_all(cascade, self.frame);
    }

    /// Aborts the child chain immediately instead of draining it.
    ///
    /// Started children receive their last-run hook; none of them is
    /// ticked again.
    pub fn discard_children(&mut self) {
        if self.children.is_empty() {
            return;
        }
        self.children.abort_all(self.ctx, self.frame);
    }
}
