//! Auction creation and seller-driven lifecycle transitions.

use tracing::info;

use crate::config::COMMIT_MAX_RETRIES;
use crate::domain::{Auction, AuctionId, AuctionStatus, UserId};
use crate::engine::locks::AuctionLocks;
use crate::error::{GavelError, GavelResult};
use crate::traits::{AuctionCommit, AuctionStore, TimeProvider};

/// Parameters for creating an auction.
#[derive(Debug, Clone)]
pub struct NewAuction {
    pub seller: UserId,
    pub title: String,
    pub starting_price: u64,
    pub reserve_price: Option<u64>,
    pub buy_now_price: Option<u64>,
    /// Opening time; defaults to now.
    pub starts_at: Option<u64>,
    pub duration_secs: u64,
}

/// Owns auction records and their forward-only status transitions.
#[derive(Debug, Clone)]
pub struct AuctionRegistry<S, T> {
    store: S,
    time: T,
    locks: AuctionLocks,
}

impl<S, T> AuctionRegistry<S, T>
where
    S: AuctionStore,
    T: TimeProvider,
{
    pub fn new(store: S, time: T, locks: AuctionLocks) -> Self {
        Self { store, time, locks }
    }

    /// Create an Upcoming auction. It starts accepting bids once started
    /// explicitly or picked up by the lifecycle sweep.
    pub async fn create_auction(&self, request: NewAuction) -> GavelResult<Auction> {
        let id = self.store.allocate_auction_id().await?;

        let mut builder = Auction::builder_with_time(self.time.clone())
            .id(id)
            .seller(request.seller)
            .title(request.title)
            .starting_price(request.starting_price)
            .duration(request.duration_secs);
        if let Some(reserve) = request.reserve_price {
            builder = builder.reserve_price(reserve);
        }
        if let Some(buy_now) = request.buy_now_price {
            builder = builder.buy_now_price(buy_now);
        }
        if let Some(starts_at) = request.starts_at {
            builder = builder.starts_at(starts_at);
        }

        let auction = builder.build().map_err(GavelError::InvalidAuction)?;
        self.store.insert_auction(auction.clone()).await?;
        info!(auction = %id, seller = %auction.seller, "auction created");
        Ok(auction)
    }

    /// Open an Upcoming auction for bidding immediately.
    pub async fn start_auction(
        &self,
        auction_id: AuctionId,
        requester: UserId,
    ) -> GavelResult<Auction> {
        let now = self.time.now_unix();
        self.transition(auction_id, requester, move |auction| {
            if auction.status != AuctionStatus::Upcoming {
                return Err(GavelError::StateConflict(
                    "only an upcoming auction can be started".to_string(),
                ));
            }
            auction.status = AuctionStatus::Active;
            if auction.start_time > now {
                auction.start_time = now;
            }
            Ok(())
        })
        .await
    }

    /// Withdraw an auction. Allowed while Upcoming, or Active with no
    /// bids committed.
    pub async fn cancel_auction(
        &self,
        auction_id: AuctionId,
        requester: UserId,
    ) -> GavelResult<Auction> {
        self.transition(auction_id, requester, |auction| {
            let cancellable = auction.status == AuctionStatus::Upcoming
                || (auction.status == AuctionStatus::Active && auction.bid_count == 0);
            if !cancellable {
                return Err(GavelError::StateConflict(
                    "auction has bids or is already finished".to_string(),
                ));
            }
            auction.status = AuctionStatus::Cancelled;
            Ok(())
        })
        .await
    }

    pub async fn get_auction(&self, auction_id: AuctionId) -> GavelResult<Auction> {
        self.store.load_auction(auction_id).await
    }

    /// Smallest amount the next bid must meet.
    pub async fn minimum_next_bid(&self, auction_id: AuctionId) -> GavelResult<u64> {
        let auction = self.store.load_auction(auction_id).await?;
        Ok(auction.minimum_next_bid())
    }

    async fn transition<F>(
        &self,
        auction_id: AuctionId,
        requester: UserId,
        apply: F,
    ) -> GavelResult<Auction>
    where
        F: Fn(&mut Auction) -> GavelResult<()>,
    {
        let _guard = self.locks.acquire(auction_id).await;

        let mut attempts = 0u32;
        loop {
            let mut auction = self.store.load_auction(auction_id).await?;
            if requester != auction.seller {
                return Err(GavelError::Unauthorized(
                    "only the seller may manage an auction".to_string(),
                ));
            }
            apply(&mut auction)?;

            let commit = AuctionCommit::new().auction(auction.clone());
            match self.store.commit(commit).await {
                Ok(()) => {
                    info!(auction = %auction_id, status = ?auction.status, "auction transitioned");
                    return Ok(auction);
                }
                Err(e) if e.is_conflict() && attempts < COMMIT_MAX_RETRIES => {
                    attempts += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
