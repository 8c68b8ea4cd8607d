//! Grouping of activities into a single queue entry.

use activity::{Activity, ActivityError, ActivityNode, Scope, Status};

/// Parent that does no work of its own; its children are the sequence.
///
/// Members run one per tick at most, and the group completes in the same
/// tick as its last member.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequence;

impl<C> Activity<C> for Sequence {
    fn tick(&mut self, _scope: &mut Scope<'_, C>) -> Result<Status, ActivityError> {
        Ok(Status::Done)
    }
}

impl Sequence {
    /// Builds a node that runs `members` one after another.
    pub fn of<C>(members: impl IntoIterator<Item = ActivityNode<C>>) -> ActivityNode<C> {
        ActivityNode::new(Sequence).with_children(members)
    }
}
