//! Minimal grid actor for exercising the stock activities.

use std::collections::{BTreeMap, BTreeSet};

use activity::{ActorId, Position, Target};

use crate::path::find_grid_path;
use crate::traits::{Armed, ConditionToken, Conditions, Mobile};

#[derive(Debug, Default)]
pub(crate) struct Grid {
    pub position: Position,
    pub blocked: BTreeSet<Position>,
    pub conditions: Vec<(ConditionToken, &'static str)>,
    pub next_token: u32,
    pub sightings: BTreeMap<ActorId, Position>,
    pub range: u32,
    pub charge_ticks: u32,
    pub shots: Vec<Target>,
}

impl Grid {
    pub(crate) fn at(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub(crate) fn block(&mut self, cell: Position) {
        self.blocked.insert(cell);
    }
}

impl Mobile for Grid {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, cell: Position) {
        self.position = cell;
    }

    fn can_enter(&self, cell: Position) -> bool {
        !self.blocked.contains(&cell)
    }

    fn find_path(&self, from: Position, to: Position, within: u32) -> Option<Vec<Position>> {
        find_grid_path(from, to, within, |cell| self.can_enter(cell))
    }
}

impl Conditions for Grid {
    fn grant_condition(&mut self, condition: &'static str) -> ConditionToken {
        self.next_token += 1;
        let token = ConditionToken(self.next_token);
        self.conditions.push((token, condition));
        token
    }

    fn revoke_condition(&mut self, token: ConditionToken) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|(t, _)| *t != token);
        self.conditions.len() != before
    }

    fn has_condition(&self, condition: &'static str) -> bool {
        self.conditions.iter().any(|(_, c)| *c == condition)
    }
}

impl Armed for Grid {
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
        self.shots.push(*target);
    }
}
