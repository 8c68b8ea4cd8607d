//! Shorthand constructors for queue entries.
//!
//! Instead of writing `ActivityNode::new(Uninterruptible::new(Wait::new(5)))`
//! you can write `uninterruptible(Wait::new(5))`, and sequences read as a
//! flat list.

use activity::{Activity, ActivityError, ActivityNode, Target};

use crate::attack::Attack;
use crate::call::CallFunc;
use crate::movement::{MAX_MOVE_DISTANCE, MoveTo};
use crate::sequence::Sequence;
use crate::traits::{Armed, Mobile};
use crate::uninterruptible::Uninterruptible;
use crate::wait::Wait;

/// Shorthand for `ActivityNode::new(Wait::new(ticks))`.
#[inline]
pub fn wait<C>(ticks: u32) -> ActivityNode<C> {
    ActivityNode::new(Wait::new(ticks))
}

/// Shorthand for `ActivityNode::new(CallFunc::new(func))`.
#[inline]
pub fn call<C, F>(func: F) -> ActivityNode<C>
where
    F: FnOnce(&mut C) + 'static,
{
    ActivityNode::new(CallFunc::new(func))
}

/// Shorthand for `Sequence::of(members)`.
#[inline]
pub fn sequence<C>(members: Vec<ActivityNode<C>>) -> ActivityNode<C> {
    Sequence::of(members)
}

/// Shorthand for `ActivityNode::new(Uninterruptible::new(activity))`.
#[inline]
pub fn uninterruptible<C, A>(activity: A) -> ActivityNode<C>
where
    A: Activity<C> + 'static,
{
    ActivityNode::new(Uninterruptible::new(activity))
}

/// Move from the actor's current cell, subject to [`MAX_MOVE_DISTANCE`].
pub fn move_to<C: Mobile>(
    ctx: &C,
    destination: activity::Position,
) -> Result<ActivityNode<C>, ActivityError> {
    MoveTo::new(ctx.position(), destination, MAX_MOVE_DISTANCE).map(ActivityNode::new)
}

/// Shorthand for `ActivityNode::new(Attack::new(target))`.
#[inline]
pub fn attack<C: Armed>(target: Target) -> ActivityNode<C> {
    ActivityNode::new(Attack::new(target))
}
