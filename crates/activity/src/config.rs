/// Scheduler tunables shared by every queue in a simulation.
///
/// All peers must run with identical values; they influence observable
/// behavior (event journal contents, depth faults).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Deepest parent/child nesting a queue will tick before faulting the head.
    pub max_chain_depth: usize,
    /// Record lifecycle events for the journal.
    pub record_events: bool,
}

impl SchedulerConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 32;

    pub const fn new() -> Self {
        Self {
            max_chain_depth: Self::DEFAULT_MAX_CHAIN_DEPTH,
            record_events: true,
        }
    }

    pub const fn with_max_chain_depth(mut self, max_chain_depth: usize) -> Self {
        self.max_chain_depth = max_chain_depth;
        self
    }

    pub const fn with_record_events(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}
