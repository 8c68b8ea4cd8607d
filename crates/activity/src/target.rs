//! Target references exposed by activities for UI and debug overlays.
//!
//! These are read-only views. Holding a [`Target`] never keeps the
//! referenced actor alive and never grants access to its state.

use crate::types::{ActorId, Position};

/// Something an activity is acting upon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    /// Another actor, resolved by the caller each time it is needed.
    Actor(ActorId),
    /// A fixed cell.
    Position(Position),
    /// Nothing (e.g. the target was lost).
    #[default]
    Invalid,
}

impl Target {
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Target::Invalid)
    }

    /// The actor referenced by this target, if any.
    pub const fn actor(&self) -> Option<ActorId> {
        match self {
            Target::Actor(id) => Some(*id),
            _ => None,
        }
    }
}

/// Color of a target line, packed RGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineColor(pub u8, pub u8, pub u8);

impl LineColor {
    pub const MOVE: Self = Self(0x00, 0xc0, 0x00);
    pub const ATTACK: Self = Self(0xc0, 0x00, 0x00);
    pub const ABILITY: Self = Self(0x40, 0x80, 0xff);
    pub const NEUTRAL: Self = Self(0xc0, 0xc0, 0xc0);
}

/// One segment of the line drawn from an actor through its planned targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetLineNode {
    pub target: Target,
    pub color: LineColor,
    /// Draw a marker at the target end of the segment.
    pub marker: bool,
}

impl TargetLineNode {
    pub const fn new(target: Target, color: LineColor) -> Self {
        Self {
            target,
            color,
            marker: true,
        }
    }

    /// Segment without an end marker (intermediate waypoints).
    pub const fn waypoint(target: Target, color: LineColor) -> Self {
        Self {
            target,
            color,
            marker: false,
        }
    }
}
