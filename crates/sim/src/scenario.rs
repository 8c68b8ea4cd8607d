//! RON scenarios: units on a grid, their initial orders and timed commands.
//!
//! ```ron
//! Scenario(
//!     name: "ambush",
//!     blocked: [(x: 3, y: 0)],
//!     actors: [
//!         (id: 1, position: (x: 0, y: 0), orders: [Move((x: 6, y: 0)), Wait(5)]),
//!         (id: 2, position: (x: 9, y: 4), range: 2, orders: [Attack(target: 1)]),
//!     ],
//!     commands: [(tick: 4, actor: 1, command: Cancel(cascade: true))],
//! )
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use activities::{Attack, MAX_MOVE_DISTANCE, MoveTo, Teleport, Uninterruptible, Wait};
use activity::{ActivityError, ActivityNode, ActorId, Position, Target, Tick};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimConfig;
use crate::error::{ConfigError, Result, SimError};
use crate::unit::{Terrain, Unit};
use crate::world::{Completion, Fault, World};

/// Farthest a single teleport may jump.
pub const MAX_TELEPORT_DISTANCE: u32 = 16;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Fixed run length. Without it the scenario runs until every unit is
    /// idle and no command is left.
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub blocked: Vec<Position>,
    pub actors: Vec<ActorSpec>,
    #[serde(default)]
    pub commands: Vec<ScheduledCommand>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSpec {
    pub id: u32,
    pub position: Position,
    #[serde(default = "default_range")]
    pub range: u32,
    #[serde(default = "default_charge_ticks")]
    pub charge_ticks: u32,
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Move(Position),
    Wait(u32),
    /// A wait that cannot be canceled once started.
    Hold(u32),
    Teleport {
        to: Position,
        #[serde(default)]
        delay: u32,
    },
    Attack {
        target: u32,
        #[serde(default = "default_volleys")]
        volleys: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    /// Applied just before this tick is stepped.
    pub tick: u64,
    pub actor: u32,
    pub command: Command,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Cancel {
        #[serde(default)]
        cascade: bool,
    },
    Order {
        order: Order,
        #[serde(default)]
        immediate: bool,
    },
}

fn default_range() -> u32 {
    1
}

fn default_charge_ticks() -> u32 {
    1
}

fn default_volleys() -> u32 {
    1
}

impl Order {
    /// Builds the activity for this order, as seen from `unit`'s current cell.
    pub fn to_node(&self, unit: &Unit) -> Result<ActivityNode<Unit>, ActivityError> {
        let node = match *self {
            Order::Move(to) => ActivityNode::new(MoveTo::new(unit.position, to, MAX_MOVE_DISTANCE)?),
            Order::Wait(ticks) => ActivityNode::new(Wait::new(ticks)),
            Order::Hold(ticks) => ActivityNode::new(Uninterruptible::new(Wait::new(ticks))),
            Order::Teleport { to, delay } => ActivityNode::new(Teleport::new(
                unit.position,
                to,
                delay,
                MAX_TELEPORT_DISTANCE,
            )?),
            Order::Attack { target, volleys } => {
                ActivityNode::new(Attack::new(Target::Actor(ActorId(target))).volleys(volleys))
            }
        };
        Ok(node)
    }
}

/// Summary of a finished scenario run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioOutcome {
    pub ticks: u64,
    pub completions: Vec<(Tick, Completion)>,
    pub faults: Vec<(Tick, Fault)>,
    pub positions: BTreeMap<ActorId, Position>,
    pub shots: BTreeMap<ActorId, usize>,
    pub events: u64,
    pub digest: String,
}

impl Scenario {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    /// Spawns every unit and queues its initial orders.
    pub fn build(&self, config: SimConfig) -> Result<World<Unit>> {
        let terrain: Terrain = Arc::new(self.blocked.iter().copied().collect());
        let mut world = World::new(config);

        for spec in &self.actors {
            let id = ActorId(spec.id);
            let mut unit = Unit::new(id, spec.position, Arc::clone(&terrain));
            unit.range = spec.range;
            unit.charge_ticks = spec.charge_ticks;
            world.spawn_with_id(id, unit)?;
            for order in &spec.orders {
                apply_order(&mut world, id, order, false)?;
            }
        }
        Ok(world)
    }

    pub fn run(&self, config: SimConfig) -> Result<ScenarioOutcome> {
        info!(
            target: "sim::scenario",
            name = %self.name,
            actors = self.actors.len(),
            commands = self.commands.len(),
            "running scenario"
        );

        let mut world = self.build(config)?;
        let last_command = self.commands.iter().map(|c| c.tick).max().unwrap_or(0);
        let mut completions = Vec::new();
        let mut faults = Vec::new();

        loop {
            let next = world.now().next();
            match self.ticks {
                Some(limit) if next.0 > limit => break,
                None if world.is_idle() && next.0 > last_command => break,
                _ => {}
            }
            if self.ticks.is_none() && world.now().0 >= config.settle_limit {
                return Err(SimError::Unsettled {
                    limit: config.settle_limit,
                });
            }

            for scheduled in self.commands.iter().filter(|c| c.tick == next.0) {
                apply_command(&mut world, scheduled)?;
            }
            sync_sightings(&mut world);

            let report = world.step();
            completions.extend(report.completions.into_iter().map(|c| (report.tick, c)));
            faults.extend(report.faults.into_iter().map(|f| (report.tick, f)));
        }

        let outcome = ScenarioOutcome {
            ticks: world.now().0,
            completions,
            faults,
            positions: world.actors().map(|a| (a.id(), a.state().position)).collect(),
            shots: world.actors().map(|a| (a.id(), a.state().shots().len())).collect(),
            events: world.journal().total(),
            digest: world.journal().digest_hex(),
        };
        info!(
            target: "sim::scenario",
            name = %self.name,
            ticks = outcome.ticks,
            events = outcome.events,
            digest = %outcome.digest,
            "scenario finished"
        );
        Ok(outcome)
    }
}

/// Shows every unit where the others stood at the end of the last tick.
pub fn sync_sightings(world: &mut World<Unit>) {
    let positions: Vec<(ActorId, Position)> = world
        .actors()
        .map(|actor| (actor.id(), actor.state().position))
        .collect();
    for actor in world.actors_mut() {
        actor.state_mut().set_sightings(positions.iter().copied());
    }
}

fn apply_order(world: &mut World<Unit>, id: ActorId, order: &Order, immediate: bool) -> Result<()> {
    let unit = world.actor(id).ok_or(SimError::UnknownActor(id))?.state();
    let node = order
        .to_node(unit)
        .map_err(|source| SimError::InvalidOrder { actor: id, source })?;
    world.enqueue(id, node, immediate)
}

fn apply_command(world: &mut World<Unit>, scheduled: &ScheduledCommand) -> Result<()> {
    let id = ActorId(scheduled.actor);
    match &scheduled.command {
        Command::Cancel { cascade } => {
            world.cancel_active(id, *cascade)?;
            Ok(())
        }
        Command::Order { order, immediate } => apply_order(world, id, order, *immediate),
    }
}
