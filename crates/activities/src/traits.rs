//! Narrow views of actor state consumed by the stock activities.
//!
//! Activities are generic over the actor context `C`; each one only asks
//! for the capabilities it uses, so a test actor can implement just enough
//! to drive a single activity.

use activity::{Position, Target};

/// Actors that occupy a cell and can move between cells.
pub trait Mobile {
    fn position(&self) -> Position;

    fn set_position(&mut self, cell: Position);

    /// Whether the actor may step into `cell` right now.
    fn can_enter(&self, cell: Position) -> bool;

    /// Cells to step through from `from` to the nearest enterable cell
    /// within `within` of `to`, excluding `from`. `None` when no route exists.
    fn find_path(&self, from: Position, to: Position, within: u32) -> Option<Vec<Position>>;
}

/// Handle returned when a condition is granted, used to revoke it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConditionToken(pub u32);

/// Actors that carry named, stackable status conditions.
pub trait Conditions {
    fn grant_condition(&mut self, condition: &'static str) -> ConditionToken;

    /// Returns false if the token was not active.
    fn revoke_condition(&mut self, token: ConditionToken) -> bool;

    fn has_condition(&self, condition: &'static str) -> bool;
}

/// Actors that can attack a target from range.
pub trait Armed: Mobile {
    /// Current cell of `target`, or `None` once it is gone.
    fn resolve_target(&self, target: &Target) -> Option<Position>;

    /// Maximum Chebyshev distance at which the weapon can fire.
    fn range(&self) -> u32;

    /// Ticks spent charging before each shot.
    fn charge_ticks(&self) -> u32;

    fn fire_at(&mut self, target: &Target);
}
