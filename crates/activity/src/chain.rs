//! Ordered child chain owned by an activity.

use std::collections::VecDeque;

use crate::error::ActivityError;
use crate::event::ActivityEventKind;
use crate::node::ActivityNode;
use crate::scope::Frame;
use crate::types::Tick;

/// FIFO sequence of subordinate activities.
///
/// Only the head is ever ticked, and the chain advances at most once per
/// tick, so finishing one child never starts the next in the same tick.
pub struct ChildChain<C> {
    nodes: VecDeque<ActivityNode<C>>,
    advanced_at: Option<Tick>,
}

impl<C> ChildChain<C> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: VecDeque::new(),
            advanced_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The child currently at the head of the chain.
    pub fn front(&self) -> Option<&ActivityNode<C>> {
        self.nodes.front()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, ActivityNode<C>> {
        self.nodes.iter()
    }

    pub(crate) fn push(&mut self, node: ActivityNode<C>) {
        self.nodes.push_back(node);
    }

    /// Ticks the head child once if it is eligible.
    ///
    /// `force` bypasses the once-per-tick limit on the chain itself (the
    /// same-tick resolution exception); individual nodes still refuse a
    /// second tick. Returns whether the chain is empty afterwards.
    pub(crate) fn advance(
        &mut self,
        ctx: &mut C,
        frame: &mut Frame,
        force: bool,
    ) -> Result<bool, ActivityError> {
        let now = frame.now;
        if !force && self.advanced_at == Some(now) {
            return Ok(self.nodes.is_empty());
        }
        self.advanced_at = Some(now);

        let Some(head) = self.nodes.front_mut() else {
            return Ok(true);
        };
        if !head.is_eligible(now) || head.last_tick() == Some(now) {
            return Ok(false);
        }

        frame.depth += 1;
        let result = head.tick(ctx, frame);
        frame.depth -= 1;

        if result?.is_done() {
            self.nodes.pop_front();
        }
        Ok(self.nodes.is_empty())
    }

    /// Sends a cancel request to every child and removes the ones that
    /// ended immediately (pending children are dropped).
    pub(crate) fn cancel_all(&mut self, cascade: bool, frame: &mut Frame) {
        frame.depth += 1;
        for node in self.nodes.iter_mut() {
            node.request_cancel(cascade, frame);
        }
        frame.depth -= 1;
        self.nodes.retain(|node| !node.state().is_done());
    }

    /// Removes every child without ticking it. Started children get their
    /// last-run hook, deepest first.
    pub(crate) fn abort_all(&mut self, ctx: &mut C, frame: &mut Frame) {
        frame.depth += 1;
        for mut node in self.nodes.drain(..) {
            node.abort(ctx, frame, ActivityEventKind::Discarded);
        }
        frame.depth -= 1;
    }

    pub(crate) fn dispose_all(&mut self, ctx: &mut C) {
        for node in self.nodes.iter_mut() {
            node.dispose(ctx);
        }
    }
}

impl<C> Default for ChildChain<C> {
    fn default() -> Self {
        Self::new()
    }
}
