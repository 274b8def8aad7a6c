//! Coordination-id generation capability.
//!
//! The workflow coordinator stamps each plan with a correlation id. The
//! generator is an injected capability: production uses a process-wide
//! counter, tests construct their own instance and get a known sequence.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of coordination ids for workflow plans.
pub trait CoordinationIdGen: Send + Sync {
    /// Produce the next id. Ids are opaque to callers.
    fn next_id(&self) -> String;
}

/// Counter-backed id generator. Ids are `coord-1`, `coord-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGen {
    counter: AtomicU64,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoordinationIdGen for SequentialIdGen {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("coord-{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGen::new();
        assert_eq!(ids.next_id(), "coord-1");
        assert_eq!(ids.next_id(), "coord-2");
        assert_eq!(ids.next_id(), "coord-3");
    }

    #[test]
    fn test_fresh_generator_restarts() {
        let ids = SequentialIdGen::new();
        assert_eq!(ids.next_id(), "coord-1");
        let other = SequentialIdGen::new();
        assert_eq!(other.next_id(), "coord-1");
    }
}
