//! Ordered record of activity lifecycle events with a replay digest.
//!
//! The digest is a running SHA-256 over the bincode encoding of every event
//! ever appended, in order. Two runs fed the same enqueue/cancel calls for
//! the same number of ticks produce the same digest; any divergence in
//! event order or content changes it.

use std::collections::VecDeque;

use activity::ActivityEvent;
use sha2::{Digest, Sha256};

#[derive(Clone)]
pub struct Journal {
    events: VecDeque<ActivityEvent>,
    capacity: Option<usize>,
    total: u64,
    hasher: Sha256,
}

impl Journal {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            total: 0,
            hasher: Sha256::new(),
        }
    }

    pub fn push(&mut self, event: ActivityEvent) {
        // bincode serialization is deterministic across peers
        if let Ok(bytes) = bincode::serialize(&event) {
            self.hasher.update(&bytes);
        }
        self.total += 1;

        if let Some(capacity) = self.capacity
            && self.events.len() >= capacity
        {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = ActivityEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Events still held in memory, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &ActivityEvent> + '_ {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events ever appended, including evicted ones.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn digest(&self) -> [u8; 32] {
        self.hasher.clone().finalize().into()
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("len", &self.events.len())
            .field("capacity", &self.capacity)
            .field("total", &self.total)
            .finish()
    }
}
