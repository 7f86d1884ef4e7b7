use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{Auction, AuctionId, AuctionStatus, Bid, BidId, TrustRecord, UserId};
use crate::error::{GavelError, GavelResult};
use crate::traits::{AuctionCommit, AuctionStore};

/// In-memory store with the same atomicity and version-check behavior a
/// real backend must provide.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    auctions: HashMap<AuctionId, Auction>,
    bids: HashMap<BidId, Bid>,
    trust: HashMap<UserId, TrustRecord>,
    next_auction_id: u64,
    next_bid_id: u64,
    fail_commits: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` commits fail with a version conflict.
    pub fn fail_next_commits(&self, n: u32) {
        self.inner.lock().fail_commits = n;
    }

    /// Seed an auction directly, bypassing the registry.
    pub fn seed_auction(&self, auction: Auction) {
        self.inner.lock().auctions.insert(auction.id, auction);
    }

    /// Seed a bid directly, bypassing the placement engine.
    pub fn seed_bid(&self, bid: Bid) {
        self.inner.lock().bids.insert(bid.id, bid);
    }

    /// Seed a trust record directly.
    pub fn seed_trust(&self, record: TrustRecord) {
        self.inner.lock().trust.insert(record.user, record);
    }

    /// Seed a trust record with a fixed score and no history.
    pub fn seed_trust_score(&self, user: UserId, score: u32) {
        let mut record = TrustRecord::new(user);
        record.score = score;
        self.seed_trust(record);
    }

    pub fn get_auction(&self, id: AuctionId) -> Option<Auction> {
        self.inner.lock().auctions.get(&id).cloned()
    }

    pub fn get_bid(&self, id: BidId) -> Option<Bid> {
        self.inner.lock().bids.get(&id).cloned()
    }

    pub fn get_trust(&self, user: UserId) -> Option<TrustRecord> {
        self.inner.lock().trust.get(&user).cloned()
    }
}

#[async_trait]
impl AuctionStore for MemoryStore {
    async fn load_auction(&self, id: AuctionId) -> GavelResult<Auction> {
        self.inner
            .lock()
            .auctions
            .get(&id)
            .cloned()
            .ok_or_else(|| GavelError::NotFound(format!("auction {id}")))
    }

    async fn load_bids(&self, auction: AuctionId) -> GavelResult<Vec<Bid>> {
        Ok(self
            .inner
            .lock()
            .bids
            .values()
            .filter(|b| b.auction == auction)
            .cloned()
            .collect())
    }

    async fn load_bid(&self, id: BidId) -> GavelResult<Bid> {
        self.inner
            .lock()
            .bids
            .get(&id)
            .cloned()
            .ok_or_else(|| GavelError::NotFound(format!("bid {id}")))
    }

    async fn load_bids_for_user(&self, user: UserId) -> GavelResult<Vec<Bid>> {
        Ok(self
            .inner
            .lock()
            .bids
            .values()
            .filter(|b| b.bidder == user)
            .cloned()
            .collect())
    }

    async fn load_trust(&self, user: UserId) -> GavelResult<TrustRecord> {
        Ok(self
            .inner
            .lock()
            .trust
            .entry(user)
            .or_insert_with(|| TrustRecord::new(user))
            .clone())
    }

    async fn allocate_auction_id(&self) -> GavelResult<AuctionId> {
        let mut inner = self.inner.lock();
        inner.next_auction_id += 1;
        Ok(AuctionId(inner.next_auction_id))
    }

    async fn allocate_bid_id(&self) -> GavelResult<BidId> {
        let mut inner = self.inner.lock();
        inner.next_bid_id += 1;
        Ok(BidId(inner.next_bid_id))
    }

    async fn insert_auction(&self, auction: Auction) -> GavelResult<()> {
        let mut inner = self.inner.lock();
        if inner.auctions.contains_key(&auction.id) {
            return Err(GavelError::StateConflict(format!(
                "auction {} already exists",
                auction.id
            )));
        }
        inner.auctions.insert(auction.id, auction);
        Ok(())
    }

    async fn commit(&self, commit: AuctionCommit) -> GavelResult<()> {
        let mut inner = self.inner.lock();
        if inner.fail_commits > 0 {
            inner.fail_commits -= 1;
            return Err(GavelError::StateConflict(
                "injected version conflict".to_string(),
            ));
        }

        if let Some(auction) = &commit.auction {
            let stored = inner
                .auctions
                .get(&auction.id)
                .ok_or_else(|| GavelError::NotFound(format!("auction {}", auction.id)))?;
            if stored.version != auction.version {
                return Err(GavelError::StateConflict(format!(
                    "auction {} version {} does not match stored {}",
                    auction.id, auction.version, stored.version
                )));
            }
        }

        // Version checked; apply everything.
        if let Some(auction) = commit.auction {
            let mut auction = auction;
            auction.version += 1;
            inner.auctions.insert(auction.id, auction);
        }
        for bid in commit.bids {
            inner.bids.insert(bid.id, bid);
        }
        for record in commit.trust {
            inner.trust.insert(record.user, record);
        }
        Ok(())
    }

    async fn active_auctions(&self) -> GavelResult<Vec<Auction>> {
        Ok(self
            .inner
            .lock()
            .auctions
            .values()
            .filter(|a| a.status == AuctionStatus::Active)
            .cloned()
            .collect())
    }

    async fn upcoming_auctions(&self) -> GavelResult<Vec<Auction>> {
        Ok(self
            .inner
            .lock()
            .auctions
            .values()
            .filter(|a| a.status == AuctionStatus::Upcoming)
            .cloned()
            .collect())
    }
}
