//! Read-only bid queries. These take no lock and may observe slightly
//! stale state.

use crate::domain::{highest_live, AuctionId, Bid, BidId, UserId};
use crate::error::GavelResult;
use crate::traits::AuctionStore;

/// Query surface over committed bids.
#[derive(Debug, Clone)]
pub struct BidLedger<S> {
    store: S,
}

impl<S: AuctionStore> BidLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_bid(&self, id: BidId) -> GavelResult<Bid> {
        self.store.load_bid(id).await
    }

    /// All bids for an auction, highest first, earlier placement first
    /// within equal amounts.
    pub async fn bid_history(&self, auction: AuctionId) -> GavelResult<Vec<Bid>> {
        let mut bids = self.store.load_bids(auction).await?;
        bids.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(bids)
    }

    /// The bid currently leading the auction, if any.
    pub async fn highest_bid(&self, auction: AuctionId) -> GavelResult<Option<Bid>> {
        let bids = self.store.load_bids(auction).await?;
        Ok(highest_live(&bids).cloned())
    }

    pub async fn bids_for_user(&self, user: UserId) -> GavelResult<Vec<Bid>> {
        let mut bids = self.store.load_bids_for_user(user).await?;
        bids.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(bids)
    }

    /// Whether the user has any non-retracted bid on the auction.
    pub async fn has_user_bid(&self, auction: AuctionId, user: UserId) -> GavelResult<bool> {
        let bids = self.store.load_bids(auction).await?;
        Ok(bids
            .iter()
            .any(|b| b.bidder == user && b.status != crate::domain::BidStatus::Retracted))
    }
}
