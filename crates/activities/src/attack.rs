//! Charge-then-fire attack.
//!
//! The attack runs its own logic before its children so it can re-validate
//! the target every tick: a lost target cancels the approach move and ends
//! the attack, a target that moved re-plans the approach within the same
//! tick. An approach longer than [`MAX_MOVE_DISTANCE`] or with no route
//! into range ends the attack without firing. Once in range the attack
//! charges for `charge_ticks` ticks (non-interruptible) and fires; with no
//! charge time it fires on the tick it comes into range.

use activity::{
    Activity, ActivityError, ActivityKind, LineColor, Position, Scope, Status, Target,
    TargetLineNode, TargetLines, Targets,
};
use tracing::debug;

use crate::movement::{MAX_MOVE_DISTANCE, MoveTo};
use crate::traits::Armed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Approach { toward: Option<Position> },
    Charging { remaining: u32 },
}

/// Approaches a target until in range, then fires `volleys` times.
#[derive(Clone, Debug)]
pub struct Attack {
    target: Target,
    phase: Phase,
    volleys: u32,
    fired: u32,
}

impl Attack {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            phase: Phase::Approach { toward: None },
            volleys: 1,
            fired: 0,
        }
    }

    #[must_use]
    pub fn volleys(mut self, volleys: u32) -> Self {
        self.volleys = volleys.max(1);
        self
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn shots_fired(&self) -> u32 {
        self.fired
    }

    fn approach<C: Armed>(
        &mut self,
        scope: &mut Scope<'_, C>,
        target_at: Position,
        toward: Option<Position>,
    ) -> Result<Status, ActivityError> {
        let range = scope.ctx().range();
        let position = scope.ctx().position();

        if position.chebyshev_distance(target_at) <= range {
            if scope.has_children() {
                // Stop moving; charging starts once the move has drained.
                scope.cancel_children(true);
                return Ok(Status::Running);
            }
            return Ok(match scope.ctx().charge_ticks() {
                0 => self.fire(scope),
                charge_ticks => {
                    self.phase = Phase::Charging {
                        remaining: charge_ticks,
                    };
                    Status::Running
                }
            });
        }

        if toward == Some(target_at) && scope.has_children() {
            return Ok(Status::Running);
        }

        let approach = match MoveTo::new(position, target_at, MAX_MOVE_DISTANCE) {
            Ok(approach) => approach.within(range),
            Err(error) => {
                debug!(
                    target: "activities::attack",
                    actor = %scope.actor(),
                    tick = %scope.now(),
                    %error,
                    "target beyond approach cap"
                );
                scope.discard_children();
                return Ok(Status::Done);
            }
        };
        if scope.ctx().find_path(position, target_at, range).is_none() {
            debug!(
                target: "activities::attack",
                actor = %scope.actor(),
                tick = %scope.now(),
                destination = %target_at,
                "no route into range"
            );
            scope.discard_children();
            return Ok(Status::Done);
        }

        scope.discard_children();
        scope.queue_child_now(approach);
        self.phase = Phase::Approach {
            toward: Some(target_at),
        };
        scope.resolve_children_now()?;
        Ok(Status::Running)
    }

    fn fire<C: Armed>(&mut self, scope: &mut Scope<'_, C>) -> Status {
        scope.ctx_mut().fire_at(&self.target);
        self.fired += 1;
        self.phase = Phase::Approach { toward: None };
        Status::done_if(self.fired >= self.volleys)
    }
}

impl<C: Armed> Activity<C> for Attack {
    fn kind(&self) -> ActivityKind {
        ActivityKind::Attack
    }

    fn is_interruptible(&self) -> bool {
        !matches!(self.phase, Phase::Charging { .. })
    }

    fn child_has_priority(&self) -> bool {
        false
    }

    fn tick(&mut self, scope: &mut Scope<'_, C>) -> Result<Status, ActivityError> {
        let Some(target_at) = scope.ctx().resolve_target(&self.target) else {
            debug!(
                target: "activities::attack",
                actor = %scope.actor(),
                tick = %scope.now(),
                "target lost"
            );
            self.target = Target::Invalid;
            scope.cancel_children(true);
            return Ok(Status::Done);
        };

        match self.phase {
            Phase::Approach { toward } => self.approach(scope, target_at, toward),
            Phase::Charging { remaining } if remaining > 1 => {
                self.phase = Phase::Charging {
                    remaining: remaining - 1,
                };
                Ok(Status::Running)
            }
            Phase::Charging { .. } => Ok(self.fire(scope)),
        }
    }

    fn targets<'a>(&'a self, _ctx: &'a C) -> Targets<'a> {
        Box::new(std::iter::once(self.target).filter(Target::is_valid))
    }

    // The approach move draws its own route; only the attack line is ours.
    fn target_line_nodes<'a>(&'a self, _ctx: &'a C) -> TargetLines<'a> {
        let line = TargetLineNode::new(self.target, LineColor::ATTACK);
        Box::new(std::iter::once(line).filter(|node| node.target.is_valid()))
    }
}
