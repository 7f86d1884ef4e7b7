//! Bid acceptance and retraction.
//!
//! Every mutation follows the same shape: take the per-auction lock,
//! load a consistent snapshot, validate, rewrite the snapshot in memory,
//! commit it atomically, and only then publish events. Version conflicts
//! from concurrent writers are retried a bounded number of times.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::{
    COMMIT_MAX_RETRIES, HIGH_VALUE_BID_CENTS, HIGH_VALUE_TRUST, MIN_BIDDING_TRUST,
    PROXY_STEP_CENTS,
};
use crate::domain::{Auction, AuctionId, Bid, BidId, BidKind, BidStatus, UserId};
use crate::engine::locks::AuctionLocks;
use crate::engine::proxy::{index_of_highest_live, resolve_standing_proxies};
use crate::error::{GavelError, GavelResult};
use crate::events::AuctionEvent;
use crate::traits::{AuctionCommit, AuctionStore, Notifier, TimeProvider};

/// Accepts, escalates, and retracts bids.
#[derive(Debug, Clone)]
pub struct BidEngine<S, N, T> {
    store: S,
    notifier: N,
    time: T,
    locks: AuctionLocks,
}

impl<S, N, T> BidEngine<S, N, T>
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

    /// Place a manual bid at a fixed amount.
    pub async fn place_bid(
        &self,
        auction_id: AuctionId,
        bidder: UserId,
        amount: u64,
    ) -> GavelResult<Bid> {
        self.place(auction_id, bidder, amount, BidKind::Manual).await
    }

    /// Place a proxy bid with a hidden ceiling. The visible amount enters
    /// one step above the prior highest bid and is escalated automatically
    /// as rivals appear.
    pub async fn place_proxy_bid(
        &self,
        auction_id: AuctionId,
        bidder: UserId,
        max_amount: u64,
    ) -> GavelResult<Bid> {
        self.place(auction_id, bidder, max_amount, BidKind::Proxy).await
    }

    /// Withdraw a bid on a still-active auction. If the bid was leading,
    /// the next-highest standing bid is promoted in the same commit. The
    /// retraction counts as a failed transaction against the bidder's
    /// trust score.
    pub async fn retract_bid(
        &self,
        bid_id: BidId,
        requester: UserId,
        reason: String,
    ) -> GavelResult<()> {
        let target = self.store.load_bid(bid_id).await?;
        let auction_id = target.auction;

        let _guard = self.locks.acquire(auction_id).await;
        let now = self.time.now_unix();

        let mut attempts = 0u32;
        loop {
            let mut auction = self.store.load_auction(auction_id).await?;
            let mut bids = self.store.load_bids(auction_id).await?;

            let idx = bids
                .iter()
                .position(|b| b.id == bid_id)
                .ok_or_else(|| GavelError::NotFound(format!("bid {bid_id}")))?;
            if bids[idx].bidder != requester {
                return Err(GavelError::Unauthorized(
                    "only the bid owner may retract it".to_string(),
                ));
            }
            if !auction.is_active_at(now) {
                return Err(GavelError::StateConflict(
                    "auction is no longer active".to_string(),
                ));
            }
            if bids[idx].status == BidStatus::Retracted {
                return Err(GavelError::StateConflict(
                    "bid is already retracted".to_string(),
                ));
            }

            let was_leading = bids[idx].status == BidStatus::Winning;
            bids[idx].status = BidStatus::Retracted;
            bids[idx].note = Some(reason.clone());

            let mut changed = vec![bids[idx].clone()];
            if was_leading {
                match next_standing(&bids) {
                    Some(next) => {
                        bids[next].status = BidStatus::Winning;
                        auction.current_price = bids[next].amount;
                        changed.push(bids[next].clone());
                    }
                    None => auction.current_price = auction.starting_price,
                }
            }

            let mut trust = self.store.load_trust(requester).await?;
            trust.record_failure();

            let commit = AuctionCommit {
                auction: Some(auction),
                bids: changed,
                trust: vec![trust],
            };
            match self.store.commit(commit).await {
                Ok(()) => break,
                Err(e) if e.is_conflict() && attempts < COMMIT_MAX_RETRIES => {
                    attempts += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        info!(auction = %auction_id, bid = %bid_id, user = %requester, "bid retracted");
        Ok(())
    }

    async fn place(
        &self,
        auction_id: AuctionId,
        bidder: UserId,
        committed: u64,
        kind: BidKind,
    ) -> GavelResult<Bid> {
        let _guard = self.locks.acquire(auction_id).await;
        let now = self.time.now_unix();

        let mut attempts = 0u32;
        let (placed, events) = loop {
            let mut auction = self.store.load_auction(auction_id).await?;
            let mut bids = self.store.load_bids(auction_id).await?;

            self.validate(&auction, bidder, committed, now).await?;

            // Snapshot for change detection after escalation.
            let before: HashMap<BidId, (BidStatus, u64)> =
                bids.iter().map(|b| (b.id, (b.status, b.amount))).collect();

            let amount = match kind {
                BidKind::Manual => committed,
                BidKind::Proxy => {
                    let prior = index_of_highest_live(&bids)
                        .map(|i| bids[i].amount)
                        .unwrap_or(auction.starting_price);
                    committed.min(prior + PROXY_STEP_CENTS)
                }
            };

            let id = self.store.allocate_bid_id().await?;
            bids.push(Bid {
                id,
                auction: auction_id,
                bidder,
                amount,
                max_amount: (kind == BidKind::Proxy).then_some(committed),
                status: BidStatus::Active,
                kind,
                created_at: now,
                note: None,
            });

            promote_leader(&mut auction, &mut bids);
            resolve_standing_proxies(&mut auction, &mut bids);
            auction.bid_count += 1;

            let changed: Vec<Bid> = bids
                .iter()
                .filter(|b| before.get(&b.id) != Some(&(b.status, b.amount)))
                .cloned()
                .collect();
            let events = placement_events(&bids, &before, id);
            let placed = bids
                .iter()
                .find(|b| b.id == id)
                .cloned()
                .ok_or_else(|| GavelError::Storage("placed bid missing from ledger".to_string()))?;

            let commit = AuctionCommit {
                auction: Some(auction),
                bids: changed,
                trust: Vec::new(),
            };
            match self.store.commit(commit).await {
                Ok(()) => break (placed, events),
                Err(e) if e.is_conflict() && attempts < COMMIT_MAX_RETRIES => {
                    attempts += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            auction = %auction_id,
            bid = %placed.id,
            user = %bidder,
            amount = placed.amount,
            "bid placed"
        );
        for event in events {
            if let Err(e) = self.notifier.publish(event).await {
                warn!(auction = %auction_id, error = %e, "event delivery failed");
            }
        }
        Ok(placed)
    }

    /// Validation order is fixed; the first failure wins. For proxy bids
    /// `amount` is the ceiling.
    async fn validate(
        &self,
        auction: &Auction,
        bidder: UserId,
        amount: u64,
        now: u64,
    ) -> GavelResult<()> {
        if !auction.is_active_at(now) {
            return Err(GavelError::AuctionNotActive);
        }
        if bidder == auction.seller {
            return Err(GavelError::SelfBid);
        }
        let minimum = auction.minimum_next_bid();
        if amount < minimum {
            return Err(GavelError::BidTooLow { minimum });
        }
        let trust = self.store.load_trust(bidder).await?;
        if trust.score < MIN_BIDDING_TRUST {
            return Err(GavelError::InsufficientTrust {
                required: MIN_BIDDING_TRUST,
                actual: trust.score,
            });
        }
        if amount > HIGH_VALUE_BID_CENTS && trust.score < HIGH_VALUE_TRUST {
            return Err(GavelError::InsufficientTrust {
                required: HIGH_VALUE_TRUST,
                actual: trust.score,
            });
        }
        Ok(())
    }
}

/// Promote the highest live bid to Winning, demote other live bids, and
/// pull the auction price up to the leader.
fn promote_leader(auction: &mut Auction, bids: &mut [Bid]) {
    let Some(leader) = index_of_highest_live(bids) else {
        return;
    };
    for (i, bid) in bids.iter_mut().enumerate() {
        if i == leader {
            bid.status = BidStatus::Winning;
        } else if bid.is_live() {
            bid.status = BidStatus::Outbid;
        }
    }
    auction.current_price = bids[leader].amount;
}

/// Highest standing bid, for promotion after the leader retracts.
fn next_standing(bids: &[Bid]) -> Option<usize> {
    bids.iter()
        .enumerate()
        .filter(|(_, b)| b.is_standing())
        .max_by(|(_, a), (_, b)| {
            a.amount
                .cmp(&b.amount)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        })
        .map(|(i, _)| i)
}

/// Events for one accepted bid: `BidPlaced` for the new bid, `Outbid`
/// for every bid this commit demoted away from a different bidder.
fn placement_events(
    bids: &[Bid],
    before: &HashMap<BidId, (BidStatus, u64)>,
    placed: BidId,
) -> Vec<AuctionEvent> {
    let mut events = Vec::new();
    let Some(leader) = index_of_highest_live(bids) else {
        return events;
    };
    let leader = &bids[leader];

    if let Some(bid) = bids.iter().find(|b| b.id == placed) {
        events.push(AuctionEvent::BidPlaced {
            bidder: bid.bidder,
            auction: bid.auction,
            bid: bid.id,
            amount: bid.amount,
        });
    }
    for bid in bids {
        let newly_demoted = bid.status == BidStatus::Outbid
            && before
                .get(&bid.id)
                .map_or(true, |(status, _)| *status != BidStatus::Outbid);
        if newly_demoted && bid.bidder != leader.bidder {
            events.push(AuctionEvent::Outbid {
                user: bid.bidder,
                auction: bid.auction,
                new_leading_bid: leader.id,
                new_amount: leader.amount,
            });
        }
    }
    events
}
