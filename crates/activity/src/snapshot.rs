//! Debug snapshots of activity trees.

use std::fmt;

use crate::activity::ActivityKind;
use crate::state::ActivityState;

/// Point-in-time view of one activity and its descendants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivitySnapshot {
    pub name: String,
    pub kind: ActivityKind,
    pub state: ActivityState,
    pub interruptible: bool,
    /// A cancel request is waiting on a non-interruptible activity.
    pub cancel_pending: bool,
    pub children: Vec<ActivitySnapshot>,
}

impl ActivitySnapshot {
    /// Number of activities in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ActivitySnapshot::count).sum::<usize>()
    }

    /// Longest parent/child path in this subtree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ActivitySnapshot::depth)
            .max()
            .unwrap_or(0)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:width$}- {} [{}]", "", self.name, self.state, width = indent * 2)?;
        if self.kind != ActivityKind::Undefined {
            write!(f, " ({})", self.kind)?;
        }
        if !self.interruptible {
            f.write_str(" uninterruptible")?;
        }
        if self.cancel_pending {
            f.write_str(" cancel-pending")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, indent + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ActivitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Renders a queue's worth of snapshots as an indented tree.
pub fn render_tree(snapshots: &[ActivitySnapshot]) -> String {
    snapshots.iter().map(ToString::to_string).collect()
}
