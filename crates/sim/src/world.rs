//! Fixed-step world driver.
//!
//! The world owns every actor's state and activity queue. [`World::step`]
//! advances the clock by one tick and ticks each non-idle queue exactly
//! once, in ascending [`ActorId`] order. A fault in one actor's activity is
//! logged, reported and contained: the other actors tick as usual.

use std::collections::BTreeMap;

use activity::{
    ActivityError, ActivityNode, ActivityQueue, ActorId, CancelOutcome, QueueTick, Tick,
};
use tracing::{debug, error, trace};

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::journal::Journal;

/// One actor: its state and the queue of activities acting on it.
pub struct Actor<C> {
    id: ActorId,
    state: C,
    queue: ActivityQueue<C>,
}

impl<C> Actor<C> {
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut C {
        &mut self.state
    }

    pub fn queue(&self) -> &ActivityQueue<C> {
        &self.queue
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_idle()
    }
}

/// A top-level activity that finished during a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub actor: ActorId,
    pub activity: &'static str,
    pub canceled: bool,
}

/// An actor whose head activity was aborted during a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fault {
    pub actor: ActorId,
    pub error: ActivityError,
}

/// What happened during one [`World::step`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick: Tick,
    /// Actors whose queue was ticked.
    pub ticked: usize,
    pub completions: Vec<Completion>,
    pub faults: Vec<Fault>,
}

pub struct World<C> {
    actors: BTreeMap<ActorId, Actor<C>>,
    now: Tick,
    next_id: u32,
    config: SimConfig,
    journal: Journal,
}

impl<C> World<C> {
    pub fn new(config: SimConfig) -> Self {
        Self {
            actors: BTreeMap::new(),
            now: Tick::ZERO,
            next_id: 1,
            config,
            journal: Journal::new(config.journal_capacity),
        }
    }

    /// The last tick that was stepped (`Tick::ZERO` before the first step).
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Adds an actor under the next free id.
    pub fn spawn(&mut self, state: C) -> ActorId {
        while self.actors.contains_key(&ActorId(self.next_id)) {
            self.next_id += 1;
        }
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.insert(id, state);
        id
    }

    pub fn spawn_with_id(&mut self, id: ActorId, state: C) -> Result<()> {
        if self.actors.contains_key(&id) {
            return Err(SimError::DuplicateActor(id));
        }
        self.insert(id, state);
        Ok(())
    }

    fn insert(&mut self, id: ActorId, state: C) {
        debug!(target: "sim::world", actor = %id, "actor spawned");
        self.actors.insert(
            id,
            Actor {
                id,
                state,
                queue: ActivityQueue::with_config(id, self.config.scheduler),
            },
        );
    }

    /// Removes an actor, notifying its live activities, and returns its state.
    pub fn despawn(&mut self, id: ActorId) -> Result<C> {
        let mut actor = self.actors.remove(&id).ok_or(SimError::UnknownActor(id))?;
        actor.queue.dispose(&mut actor.state);
        self.journal.extend(actor.queue.drain_events());
        debug!(target: "sim::world", actor = %id, "actor despawned");
        Ok(actor.state)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor<C>> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor<C>> {
        self.actors.get_mut(&id)
    }

    /// Actors in tick order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor<C>> + '_ {
        self.actors.values()
    }

    pub fn actors_mut(&mut self) -> impl Iterator<Item = &mut Actor<C>> + '_ {
        self.actors.values_mut()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Whether every actor's queue is empty.
    pub fn is_idle(&self) -> bool {
        self.actors.values().all(Actor::is_idle)
    }

    pub fn enqueue(
        &mut self,
        id: ActorId,
        node: ActivityNode<C>,
        run_immediately: bool,
    ) -> Result<()> {
        let actor = self.actors.get_mut(&id).ok_or(SimError::UnknownActor(id))?;
        actor.queue.enqueue_node(node, run_immediately);
        Ok(())
    }

    pub fn cancel_active(
        &mut self,
        id: ActorId,
        also_cancel_child: bool,
    ) -> Result<Option<CancelOutcome>> {
        let actor = self.actors.get_mut(&id).ok_or(SimError::UnknownActor(id))?;
        let outcome = actor.queue.cancel_active(also_cancel_child);
        if let Some(outcome) = outcome {
            debug!(
                target: "sim::world",
                actor = %id,
                outcome = outcome.as_ref(),
                also_cancel_child,
                "cancel requested"
            );
        }
        Ok(outcome)
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> StepReport {
        self.now = self.now.next();
        let mut report = StepReport {
            tick: self.now,
            ..StepReport::default()
        };

        for (&id, actor) in self.actors.iter_mut() {
            if !actor.queue.is_idle() {
                report.ticked += 1;
                match actor.queue.tick(&mut actor.state, self.now) {
                    Ok(QueueTick::Completed { activity, canceled }) => {
                        trace!(
                            target: "sim::world",
                            actor = %id,
                            tick = %self.now,
                            activity,
                            canceled,
                            "activity completed"
                        );
                        report.completions.push(Completion {
                            actor: id,
                            activity,
                            canceled,
                        });
                    }
                    Ok(QueueTick::Running | QueueTick::Idle) => {}
                    Err(err) => {
                        error!(
                            target: "sim::world",
                            actor = %id,
                            tick = %self.now,
                            severity = err.severity().as_str(),
                            code = err.error_code(),
                            error = %err,
                            "activity fault contained to actor"
                        );
                        report.faults.push(Fault {
                            actor: id,
                            error: err,
                        });
                    }
                }
            }
            // Also picks up events from cancels made between steps.
            self.journal.extend(actor.queue.drain_events());
        }
        report
    }

    /// Steps `ticks` times.
    pub fn run(&mut self, ticks: u64) -> Vec<StepReport> {
        (0..ticks).map(|_| self.step()).collect()
    }

    /// Steps until every queue is empty. Fails after `settle_limit` ticks.
    pub fn run_until_idle(&mut self) -> Result<Vec<StepReport>> {
        let limit = self.config.settle_limit;
        let mut reports = Vec::new();
        while !self.is_idle() {
            if reports.len() as u64 >= limit {
                return Err(SimError::Unsettled { limit });
            }
            reports.push(self.step());
        }
        Ok(reports)
    }
}

impl<C> std::fmt::Debug for World<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("now", &self.now)
            .field("actors", &self.actors.keys().collect::<Vec<_>>())
            .field("journal", &self.journal)
            .finish()
    }
}
