//! Stock activities for the [`activity`] scheduler.
//!
//! - Delays: [`Wait`], [`WaitFor`]
//! - Glue: [`CallFunc`], [`Sequence`], [`Uninterruptible`]
//! - Movement: [`MoveTo`], [`Teleport`]
//! - Combat: [`Attack`]
//!
//! Each activity is generic over the actor context and bounds it only by the
//! capability traits in [`traits`] that it actually uses.

pub mod attack;
pub mod builder;
pub mod call;
pub mod movement;
pub mod path;
pub mod sequence;
pub mod traits;
pub mod uninterruptible;
pub mod wait;

#[cfg(test)]
pub(crate) mod testing;

pub use attack::Attack;
pub use call::CallFunc;
pub use movement::{MAX_MOVE_DISTANCE, MoveOutcome, MoveTo, TELEPORTING, Teleport};
pub use path::find_grid_path;
pub use sequence::Sequence;
pub use traits::{Armed, ConditionToken, Conditions, Mobile};
pub use uninterruptible::Uninterruptible;
pub use wait::{Wait, WaitFor};
