//! Grid unit used by scenarios.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use activities::{Armed, ConditionToken, Conditions, Mobile, find_grid_path};
use activity::{ActorId, Position, Target};
use tracing::info;

/// Impassable cells shared by every unit in a scenario.
pub type Terrain = Arc<BTreeSet<Position>>;

/// Actor state for scenario units.
///
/// A unit sees the other units through `sightings`, which the driver
/// refreshes from the previous tick's positions before every step.
#[derive(Clone, Debug)]
pub struct Unit {
    pub id: ActorId,
    pub position: Position,
    pub range: u32,
    pub charge_ticks: u32,
    terrain: Terrain,
    sightings: BTreeMap<ActorId, Position>,
    conditions: Vec<(ConditionToken, &'static str)>,
    next_token: u32,
    shots: Vec<Target>,
}

impl Unit {
    pub fn new(id: ActorId, position: Position, terrain: Terrain) -> Self {
        Self {
            id,
            position,
            range: 1,
            charge_ticks: 1,
            terrain,
            sightings: BTreeMap::new(),
            conditions: Vec::new(),
            next_token: 0,
            shots: Vec::new(),
        }
    }

    pub fn set_sightings(&mut self, sightings: impl IntoIterator<Item = (ActorId, Position)>) {
        self.sightings = sightings
            .into_iter()
            .filter(|(id, _)| *id != self.id)
            .collect();
    }

    pub fn shots(&self) -> &[Target] {
        &self.shots
    }

    fn occupied(&self, cell: Position) -> bool {
        self.sightings.values().any(|&other| other == cell)
    }
}

impl Mobile for Unit {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, cell: Position) {
        self.position = cell;
    }

    fn can_enter(&self, cell: Position) -> bool {
        !self.terrain.contains(&cell) && !self.occupied(cell)
    }

    fn find_path(&self, from: Position, to: Position, within: u32) -> Option<Vec<Position>> {
        find_grid_path(from, to, within, |cell| self.can_enter(cell))
    }
}

impl Conditions for Unit {
    fn grant_condition(&mut self, condition: &'static str) -> ConditionToken {
        self.next_token += 1;
        let token = ConditionToken(self.next_token);
        self.conditions.push((token, condition));
        token
    }

    fn revoke_condition(&mut self, token: ConditionToken) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|(held, _)| *held != token);
        before != self.conditions.len()
    }

    fn has_condition(&self, condition: &'static str) -> bool {
        self.conditions.iter().any(|(_, held)| *held == condition)
    }
}

impl Armed for Unit {
    fn resolve_target(&self, target: &Target) -> Option<Position> {
        match target {
            Target::Actor(id) => self.sightings.get(id).copied(),
            Target::Position(cell) => Some(*cell),
            Target::Invalid => None,
        }
    }

    fn range(&self) -> u32 {
        self.range
    }

    fn charge_ticks(&self) -> u32 {
        self.charge_ticks
    }

    fn fire_at(&mut self, target: &Target) {
        info!(target: "sim::unit", actor = %self.id, ?target, "fired");
        self.shots.push(*target);
    }
}
