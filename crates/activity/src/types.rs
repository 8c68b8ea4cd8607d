use std::cmp::Ordering;
use std::fmt;

/// Identifier of the actor that owns an activity queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One fixed-timestep advance of the simulation.
///
/// Tick `0` is the state before the first step; the first `step()` runs tick `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the tick that follows this one.
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discrete grid position expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Number of king-moves between two cells.
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// One king-move from `self` toward `target`. Returns `self` when already there.
    pub fn step_toward(self, target: Position) -> Position {
        Position {
            x: step_axis(self.x, target.x),
            y: step_axis(self.y, target.y),
        }
    }
}

fn step_axis(from: i32, to: i32) -> i32 {
    match to.cmp(&from) {
        Ordering::Greater => from + 1,
        Ordering::Less => from - 1,
        Ordering::Equal => from,
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_distance_takes_the_longer_axis() {
        let a = Position::new(0, 0);
        assert_eq!(a.chebyshev_distance(Position::new(3, -7)), 7);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn step_toward_moves_diagonally_then_straight() {
        let mut p = Position::new(0, 0);
        let target = Position::new(2, 4);
        let mut steps = Vec::new();
        while p != target {
            p = p.step_toward(target);
            steps.push(p);
        }
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], Position::new(1, 1));
        assert_eq!(steps[1], Position::new(2, 2));
    }

    #[test]
    fn distance_and_step_span_the_whole_plane() {
        let low = Position::new(i32::MIN, i32::MIN);
        let high = Position::new(i32::MAX, 0);
        assert_eq!(low.chebyshev_distance(high), u32::MAX);
        assert_eq!(high.chebyshev_distance(low), u32::MAX);
        assert_eq!(high.step_toward(low), Position::new(i32::MAX - 1, -1));
        assert_eq!(low.step_toward(high), Position::new(i32::MIN + 1, i32::MIN + 1));
    }

    #[test]
    fn display_formats() {
        assert_eq!(ActorId(3).to_string(), "#3");
        assert_eq!(Tick(12).to_string(), "12");
        assert_eq!(Tick(1).next(), Tick(2));
    }
}
