//! Core activity trait.
//!
//! This module defines [`Activity`], the capability set every concrete unit
//! of behavior implements. The trait is generic over a context type `C`: the
//! state of the actor that owns the queue. The scheduler hands that state to
//! every hook explicitly; activities never reach for ambient globals.

use crate::error::ActivityError;
use crate::scope::Scope;
use crate::status::Status;
use crate::target::{Target, TargetLineNode};

/// Lazily produced target references.
pub type Targets<'a> = Box<dyn Iterator<Item = Target> + 'a>;

/// Lazily produced target-line segments.
pub type TargetLines<'a> = Box<dyn Iterator<Item = TargetLineNode> + 'a>;

/// Coarse category of an activity, used by gameplay code to ask
/// "is this actor currently moving / attacking?".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActivityKind {
    #[default]
    Undefined,
    Move,
    Attack,
    Ability,
}

/// One unit of ongoing actor behavior, advanced once per simulation tick.
///
/// Only [`tick`](Activity::tick) is required. The scheduler guarantees:
///
/// - `on_first_run` fires exactly once, before the first `tick`, unless the
///   activity is canceled while still pending (then no hook fires at all).
/// - `on_last_run` fires exactly once, after the activity and its whole child
///   chain have resolved, or when a started activity is discarded.
/// - `tick` is never called while the activity is canceling; a canceling
///   activity only drains its children.
pub trait Activity<C> {
    /// Name used in logs, events and debug trees.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    fn kind(&self) -> ActivityKind {
        ActivityKind::Undefined
    }

    /// Whether a cancel request takes effect now. Re-evaluated every tick,
    /// so an activity may guard only part of its lifetime.
    fn is_interruptible(&self) -> bool {
        true
    }

    /// When true (the default) the child chain is advanced first and
    /// `tick` only runs once it has drained. When false, `tick` runs first
    /// and may inspect or cancel children before they are advanced.
    fn child_has_priority(&self) -> bool {
        true
    }

    /// Runs once, at the start of the first tick.
    fn on_first_run(&mut self, _scope: &mut Scope<'_, C>) -> Result<(), ActivityError> {
        Ok(())
    }

    /// Performs one tick of work.
    ///
    /// # Returns
    ///
    /// - `Ok(Status::Running)` to be ticked again next tick
    /// - `Ok(Status::Done)` once the activity's own work is finished
    ///   (children queued in the same call still run to completion first)
    /// - `Err(_)` for unrecoverable faults; the actor's current activity is
    ///   discarded and other actors are unaffected
    fn tick(&mut self, scope: &mut Scope<'_, C>) -> Result<Status, ActivityError>;

    /// Runs once when the activity is finished or discarded after starting.
    fn on_last_run(&mut self, _ctx: &mut C) {}

    /// Runs when the owning actor is removed while this activity is live.
    fn on_actor_dispose(&mut self, _ctx: &mut C) {}

    /// Targets this activity is acting on. Must be free of side effects.
    fn targets<'a>(&'a self, _ctx: &'a C) -> Targets<'a> {
        Box::new(std::iter::empty())
    }

    /// Line segments for the UI target overlay. Must be free of side effects.
    fn target_line_nodes<'a>(&'a self, _ctx: &'a C) -> TargetLines<'a> {
        Box::new(std::iter::empty())
    }
}

/// Blanket implementation for boxed activities.
///
/// This allows `Box<dyn Activity<C>>` to be wrapped by decorators and
/// stored anywhere a concrete activity is accepted.
impl<C> Activity<C> for Box<dyn Activity<C>> {
    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn kind(&self) -> ActivityKind {
        (**self).kind()
    }

    #[inline]
    fn is_interruptible(&self) -> bool {
        (**self).is_interruptible()
    }

    #[inline]
    fn child_has_priority(&self) -> bool {
        (**self).child_has_priority()
    }

    #[inline]
    fn on_first_run(&mut self, scope: &mut Scope<'_, C>) -> Result<(), ActivityError> {
        (**self).on_first_run(scope)
    }

    #[inline]
    fn tick(&mut self, scope: &mut Scope<'_, C>) -> Result<Status, ActivityError> {
        (**self).tick(scope)
    }

    #[inline]
    fn on_last_run(&mut self, ctx: &mut C) {
        (**self).on_last_run(ctx)
    }

    #[inline]
    fn on_actor_dispose(&mut self, ctx: &mut C) {
        (**self).on_actor_dispose(ctx)
    }

    fn targets<'a>(&'a self, ctx: &'a C) -> Targets<'a> {
        (**self).targets(ctx)
    }

    fn target_line_nodes<'a>(&'a self, ctx: &'a C) -> TargetLines<'a> {
        (**self).target_line_nodes(ctx)
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
