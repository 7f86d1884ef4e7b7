//! Auction finalization.
//!
//! Closing derives its outcome purely from persisted ledger state, so a
//! close interrupted mid-operation reaches the identical result when
//! re-run. A periodic sweep applies time-driven transitions: Upcoming
//! auctions whose start time has arrived become Active, Active auctions
//! past their deadline are closed.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::{COMMIT_MAX_RETRIES, SWEEP_INTERVAL_SECS};
use crate::domain::{Auction, AuctionId, AuctionStatus, BidStatus, UserId};
use crate::engine::locks::AuctionLocks;
use crate::engine::proxy::index_of_highest_live;
use crate::error::{GavelError, GavelResult};
use crate::events::AuctionEvent;
use crate::traits::{AuctionCommit, AuctionStore, Notifier, TimeProvider};

/// Finalizes auctions and applies time-driven lifecycle transitions.
#[derive(Debug, Clone)]
pub struct AuctionCloser<S, N, T> {
    store: S,
    notifier: N,
    time: T,
    locks: AuctionLocks,
}

impl<S, N, T> AuctionCloser<S, N, T>
where
    S: AuctionStore,
    N: Notifier,
    T: TimeProvider,
{
    pub fn new(store: S, notifier: N, time: T, locks: AuctionLocks) -> Self {
        Self {
            store,
            notifier,
            time,
            locks,
        }
    }

    /// Finalize an auction. Safe to call repeatedly: a non-Active auction
    /// is returned unchanged.
    pub async fn close_auction(&self, auction_id: AuctionId) -> GavelResult<Auction> {
        let _guard = self.locks.acquire(auction_id).await;
        self.close_locked(auction_id).await
    }

    /// Seller-initiated early close.
    pub async fn end_auction(
        &self,
        auction_id: AuctionId,
        requester: UserId,
    ) -> GavelResult<Auction> {
        let _guard = self.locks.acquire(auction_id).await;
        let auction = self.store.load_auction(auction_id).await?;
        if requester != auction.seller {
            return Err(GavelError::Unauthorized(
                "only the seller may end an auction".to_string(),
            ));
        }
        self.close_locked(auction_id).await
    }

    /// One pass over time-driven transitions. Returns the number of
    /// auctions transitioned.
    pub async fn sweep_once(&self) -> GavelResult<u32> {
        let now = self.time.now_unix();
        let mut transitions = 0u32;

        for auction in self.store.upcoming_auctions().await? {
            if auction.start_time <= now {
                self.activate(auction.id, now).await?;
                transitions += 1;
            }
        }
        for auction in self.store.active_auctions().await? {
            if auction.has_ended_at(now) {
                let _guard = self.locks.acquire(auction.id).await;
                self.close_locked(auction.id).await?;
                transitions += 1;
            }
        }
        Ok(transitions)
    }

    /// Run the periodic sweep until the task is dropped.
    pub async fn run_sweep(&self) {
        let mut ticker = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            match self.sweep_once().await {
                Ok(0) => {}
                Ok(n) => info!(transitions = n, "lifecycle sweep applied transitions"),
                Err(e) => warn!(error = %e, "lifecycle sweep failed"),
            }
        }
    }

    async fn activate(&self, auction_id: AuctionId, now: u64) -> GavelResult<()> {
        let _guard = self.locks.acquire(auction_id).await;

        let mut attempts = 0u32;
        loop {
            let mut auction = self.store.load_auction(auction_id).await?;
            if auction.status != AuctionStatus::Upcoming || auction.start_time > now {
                return Ok(());
            }
            auction.status = AuctionStatus::Active;

            let commit = AuctionCommit::new().auction(auction);
            match self.store.commit(commit).await {
                Ok(()) => {
                    info!(auction = %auction_id, "auction opened for bidding");
                    return Ok(());
                }
                Err(e) if e.is_conflict() && attempts < COMMIT_MAX_RETRIES => {
                    attempts += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Close under an already-held per-auction lock.
    async fn close_locked(&self, auction_id: AuctionId) -> GavelResult<Auction> {
        let mut attempts = 0u32;
        let (closed, events) = loop {
            let mut auction = self.store.load_auction(auction_id).await?;
            if auction.status != AuctionStatus::Active {
                return Ok(auction);
            }
            let mut bids = self.store.load_bids(auction_id).await?;

            auction.status = AuctionStatus::Ended;
            let mut events = Vec::new();
            let mut trust = Vec::new();

            if let Some(winner_idx) = index_of_highest_live(&bids) {
                if auction.reserve_met() {
                    let winner = bids[winner_idx].bidder;
                    let final_price = bids[winner_idx].amount;
                    auction.winner = Some(winner);
                    auction.final_price = Some(final_price);

                    for (i, bid) in bids.iter_mut().enumerate() {
                        if i == winner_idx {
                            bid.status = BidStatus::Won;
                        } else if bid.status == BidStatus::Active {
                            bid.status = BidStatus::Lost;
                        }
                    }

                    let mut winner_trust = self.store.load_trust(winner).await?;
                    winner_trust.record_success();
                    let mut seller_trust = self.store.load_trust(auction.seller).await?;
                    seller_trust.record_success();
                    trust.push(winner_trust);
                    trust.push(seller_trust);

                    events.push(AuctionEvent::AuctionWon {
                        winner,
                        auction: auction_id,
                        final_price,
                    });
                    events.push(AuctionEvent::AuctionSold {
                        seller: auction.seller,
                        auction: auction_id,
                        final_price,
                    });
                } else {
                    let highest_amount = bids[winner_idx].amount;
                    for bid in bids.iter_mut() {
                        if bid.is_live() {
                            bid.status = BidStatus::Lost;
                        }
                    }
                    events.push(AuctionEvent::ReserveNotMet {
                        seller: auction.seller,
                        auction: auction_id,
                        highest_amount,
                    });
                }
            }

            let changed: Vec<_> = bids
                .into_iter()
                .filter(|b| matches!(b.status, BidStatus::Won | BidStatus::Lost))
                .collect();
            let summary = auction.clone();
            let commit = AuctionCommit {
                auction: Some(auction),
                bids: changed,
                trust,
            };
            match self.store.commit(commit).await {
                Ok(()) => break (summary, events),
                Err(e) if e.is_conflict() && attempts < COMMIT_MAX_RETRIES => {
                    attempts += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        match (closed.winner, closed.final_price) {
            (Some(winner), Some(price)) => {
                info!(auction = %auction_id, winner = %winner, final_price = price, "auction closed with winner");
            }
            _ => info!(auction = %auction_id, "auction closed without winner"),
        }
        for event in events {
            if let Err(e) = self.notifier.publish(event).await {
                warn!(auction = %auction_id, error = %e, "event delivery failed");
            }
        }
        Ok(closed)
    }
}
