//! Deterministic grid pathing for [`Mobile`](crate::Mobile) implementors.
//!
//! Breadth-first distance field from the goal cells over the 8-neighbourhood,
//! then a greedy walk from the start that always prefers the straight
//! [`Position::step_toward`] cell when it is on a shortest route. On an open
//! grid that yields the same line `step_toward` would walk; obstacles bend
//! it minimally. Ties break on a fixed neighbour order, never on hashing,
//! so every peer computes the same route.

use std::collections::{BTreeMap, VecDeque};

use activity::Position;

/// Cells beyond the start/goal bounding box the search may use.
pub const SEARCH_MARGIN: i32 = 8;

const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
    (1, -1),
];

/// Route from `from` to the nearest passable cell within `within` of `to`,
/// excluding `from`.
///
/// With `within == 0` the route ends on `to` itself, which must be
/// passable. Returns `None` if no goal cell can be reached inside the search
/// box. A start that already satisfies the goal yields an empty route.
pub fn find_grid_path(
    from: Position,
    to: Position,
    within: u32,
    passable: impl Fn(Position) -> bool,
) -> Option<Vec<Position>> {
    if from.chebyshev_distance(to) <= within {
        return Some(Vec::new());
    }

    let reach = i32::try_from(within).unwrap_or(i32::MAX / 4).min(i32::MAX / 4);
    // Coordinates saturate at the edge of the i32 plane.
    let min_x = from.x.min(to.x.saturating_sub(reach)).saturating_sub(SEARCH_MARGIN);
    let max_x = from.x.max(to.x.saturating_add(reach)).saturating_add(SEARCH_MARGIN);
    let min_y = from.y.min(to.y.saturating_sub(reach)).saturating_sub(SEARCH_MARGIN);
    let max_y = from.y.max(to.y.saturating_add(reach)).saturating_add(SEARCH_MARGIN);
    let in_box = |p: Position| p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y;

    // Distance to the nearest goal cell for every reachable cell.
    let mut distance: BTreeMap<Position, u32> = BTreeMap::new();
    let mut frontier = VecDeque::new();
    for y in to.y.saturating_sub(reach)..=to.y.saturating_add(reach) {
        for x in to.x.saturating_sub(reach)..=to.x.saturating_add(reach) {
            let goal = Position::new(x, y);
            if in_box(goal) && passable(goal) {
                distance.insert(goal, 0);
                frontier.push_back(goal);
            }
        }
    }

    while let Some(cell) = frontier.pop_front() {
        if cell == from {
            break;
        }
        let d = distance[&cell];
        for (dx, dy) in NEIGHBOURS {
            let next = neighbour(cell, dx, dy);
            if !in_box(next) || distance.contains_key(&next) {
                continue;
            }
            if next != from && !passable(next) {
                continue;
            }
            distance.insert(next, d + 1);
            frontier.push_back(next);
        }
    }

    let mut remaining = *distance.get(&from)?;
    let mut route = Vec::with_capacity(remaining as usize);
    let mut at = from;
    while remaining > 0 {
        let straight = at.step_toward(to);
        let next = std::iter::once(straight)
            .chain(
                NEIGHBOURS
                    .iter()
                    .map(|&(dx, dy)| neighbour(at, dx, dy)),
            )
            .find(|cell| distance.get(cell) == Some(&(remaining - 1)))?;
        route.push(next);
        at = next;
        remaining -= 1;
    }
    Some(route)
}

// At the plane's edge this saturates back onto `cell`, which the search
// has always visited already.
fn neighbour(cell: Position, dx: i32, dy: i32) -> Position {
    Position::new(cell.x.saturating_add(dx), cell.y.saturating_add(dy))
}
