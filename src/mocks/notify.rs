use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{GavelError, GavelResult};
use crate::events::AuctionEvent;
use crate::traits::Notifier;

/// Notifier that records every published event for assertion.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<AuctionEvent>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuctionEvent> {
        self.inner.lock().events.clone()
    }

    pub fn clear(&self) {
        self.inner.lock().events.clear();
    }

    /// Make every subsequent publish fail.
    pub fn set_fail_mode(&self, fail: bool) {
        self.inner.lock().fail = fail;
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, event: AuctionEvent) -> GavelResult<()> {
        let mut inner = self.inner.lock();
        if inner.fail {
            return Err(GavelError::Storage("notifier unavailable".to_string()));
        }
        inner.events.push(event);
        Ok(())
    }
}
