use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::AuctionId;

/// Per-auction mutual exclusion.
///
/// Every state-mutating operation on one auction (placement, retraction,
/// closing, cancellation) holds this lock across its validate-then-commit
/// sequence. Operations on different auctions never contend.
#[derive(Debug, Clone, Default)]
pub struct AuctionLocks {
    inner: Arc<parking_lot::Mutex<HashMap<AuctionId, Arc<AsyncMutex<()>>>>>,
}

impl AuctionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive lock for one auction, waiting if another
    /// operation on the same auction is in flight.
    pub async fn acquire(&self, auction: AuctionId) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.inner.lock();
            map.entry(auction).or_default().clone()
        };
        entry.lock_owned().await
    }
}
