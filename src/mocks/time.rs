use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::traits::TimeProvider;

/// Manually driven clock for deterministic tests.
#[derive(Debug, Clone)]
pub struct MockTime {
    now: Arc<AtomicU64>,
}

impl MockTime {
    pub fn new(now: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeProvider for MockTime {
    fn now_unix(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
