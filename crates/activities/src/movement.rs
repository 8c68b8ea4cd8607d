//! Grid movement and teleportation.
//!
//! Movement follows a path computed on the first tick and re-plans when the
//! next cell becomes blocked. Failing to find a route is a normal outcome:
//! the activity completes with [`MoveOutcome::Unreachable`] rather than
//! returning an error.

use std::collections::VecDeque;

use activity::{
    Activity, ActivityError, ActivityKind, LineColor, Position, Scope, Status, Target,
    TargetLineNode, TargetLines, Targets,
};
use tracing::debug;

use crate::traits::{ConditionToken, Conditions, Mobile};

/// Hard cap on how far a single delegated move may travel.
pub const MAX_MOVE_DISTANCE: u32 = 256;

/// Condition held by an actor while a teleport is in progress.
pub const TELEPORTING: &str = "teleporting";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    InProgress,
    Arrived,
    Unreachable,
}

/// Walks one cell per tick until within `stop_within` of the destination.
#[derive(Clone, Debug)]
pub struct MoveTo {
    destination: Position,
    stop_within: u32,
    path: VecDeque<Position>,
    outcome: MoveOutcome,
}

impl MoveTo {
    /// Refuses to build a move longer than `max_distance`.
    pub fn new(
        origin: Position,
        destination: Position,
        max_distance: u32,
    ) -> Result<Self, ActivityError> {
        let requested = origin.chebyshev_distance(destination);
        if requested > max_distance {
            return Err(ActivityError::DistanceCapExceeded {
                activity: "MoveTo",
                requested,
                limit: max_distance,
            });
        }
        Ok(Self::unbounded(destination))
    }

    pub fn unbounded(destination: Position) -> Self {
        Self {
            destination,
            stop_within: 0,
            path: VecDeque::new(),
            outcome: MoveOutcome::InProgress,
        }
    }

    /// Stops as soon as the actor is within `range` cells.
    #[must_use]
    pub fn within(mut self, range: u32) -> Self {
        self.stop_within = range;
        self
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    pub fn outcome(&self) -> MoveOutcome {
        self.outcome
    }

    fn arrived(&self, at: Position) -> bool {
        at.chebyshev_distance(self.destination) <= self.stop_within
    }

    fn replan<C: Mobile>(&mut self, ctx: &C) -> bool {
        match ctx.find_path(ctx.position(), self.destination, self.stop_within) {
            Some(path) => {
                self.path = path.into();
                true
            }
            None => false,
        }
    }
}

impl<C: Mobile> Activity<C> for MoveTo {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Move
    }

    fn on_first_run(&mut self, scope: &mut Scope<'_, C>) -> Result<(), ActivityError> {
        if !self.arrived(scope.ctx().position()) && !self.replan(scope.ctx()) {
            self.outcome = MoveOutcome::Unreachable;
        }
        Ok(())
    }

    fn tick(&mut self, scope: &mut Scope<'_, C>) -> Result<Status, ActivityError> {
        if self.outcome == MoveOutcome::Unreachable {
            debug!(
                target: "activities::movement",
                actor = %scope.actor(),
                destination = %self.destination,
                "no route to destination"
            );
            return Ok(Status::Done);
        }
        if self.arrived(scope.ctx().position()) {
            self.outcome = MoveOutcome::Arrived;
            return Ok(Status::Done);
        }

        let next = match self.path.front() {
            Some(&cell) if scope.ctx().can_enter(cell) => cell,
            _ => {
                if !self.replan(scope.ctx()) {
                    self.outcome = MoveOutcome::Unreachable;
                    return Ok(Status::Done);
                }
                match self.path.front() {
                    Some(&cell) if scope.ctx().can_enter(cell) => cell,
                    // Blocked right now; try again next tick.
                    _ => return Ok(Status::Running),
                }
            }
        };
        self.path.pop_front();
        scope.ctx_mut().set_position(next);

        if self.arrived(next) {
            self.outcome = MoveOutcome::Arrived;
            return Ok(Status::Done);
        }
        Ok(Status::Running)
    }

    fn targets<'a>(&'a self, _ctx: &'a C) -> Targets<'a> {
        Box::new(std::iter::once(Target::Position(self.destination)))
    }

    fn target_line_nodes<'a>(&'a self, _ctx: &'a C) -> TargetLines<'a> {
        let last = self.path.len().saturating_sub(1);
        let waypoints = self
            .path
            .iter()
            .take(last)
            .map(|&cell| TargetLineNode::waypoint(Target::Position(cell), LineColor::MOVE));
        let end = std::iter::once(TargetLineNode::new(
            Target::Position(self.destination),
            LineColor::MOVE,
        ));
        Box::new(waypoints.chain(end))
    }
}

/// Non-interruptible jump to a destination cell after a short delay.
///
/// The actor holds [`TELEPORTING`] from the first tick until the activity
/// ends, however it ends.
#[derive(Clone, Debug)]
pub struct Teleport {
    destination: Position,
    delay: u32,
    token: Option<ConditionToken>,
}

impl Teleport {
    pub fn new(
        origin: Position,
        destination: Position,
        delay: u32,
        max_distance: u32,
    ) -> Result<Self, ActivityError> {
        let requested = origin.chebyshev_distance(destination);
        if requested > max_distance {
            return Err(ActivityError::DistanceCapExceeded {
                activity: "Teleport",
                requested,
                limit: max_distance,
            });
        }
        Ok(Self {
            destination,
            delay,
            token: None,
        })
    }
}

impl<C: Mobile + Conditions> Activity<C> for Teleport {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Ability
    }

    fn is_interruptible(&self) -> bool {
        false
    }

    fn on_first_run(&mut self, scope: &mut Scope<'_, C>) -> Result<(), ActivityError> {
        self.token = Some(scope.ctx_mut().grant_condition(TELEPORTING));
        Ok(())
    }

    fn tick(&mut self, scope: &mut Scope<'_, C>) -> Result<Status, ActivityError> {
        if self.delay > 0 {
            self.delay -= 1;
            return Ok(Status::Running);
        }
        scope.ctx_mut().set_position(self.destination);
        Ok(Status::Done)
    }

    fn on_last_run(&mut self, ctx: &mut C) {
        if let Some(token) = self.token.take() {
            ctx.revoke_condition(token);
        }
    }

    fn on_actor_dispose(&mut self, ctx: &mut C) {
        if let Some(token) = self.token.take() {
            ctx.revoke_condition(token);
        }
    }

    fn targets<'a>(&'a self, _ctx: &'a C) -> Targets<'a> {
        Box::new(std::iter::once(Target::Position(self.destination)))
    }

    fn target_line_nodes<'a>(&'a self, _ctx: &'a C) -> TargetLines<'a> {
        Box::new(std::iter::once(TargetLineNode::new(
            Target::Position(self.destination),
            LineColor::ABILITY,
        )))
    }
}
