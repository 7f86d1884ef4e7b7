use serde::{Deserialize, Serialize};

use crate::domain::{AuctionId, BidId, UserId};

/// Settlement state of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidStatus {
    /// Committed, not currently leading.
    Active,
    /// Surpassed by a higher bid.
    Outbid,
    /// Currently leading the auction. At most one per auction.
    Winning,
    /// Final winner of an ended auction.
    Won,
    /// Did not win an ended auction.
    Lost,
    /// Withdrawn by its owner while the auction was still active.
    Retracted,
    /// Refused by an external screening step. Never set by this core.
    Rejected,
}

/// How the bid was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidKind {
    Manual,
    /// Carries a hidden ceiling (`max_amount`) the engine escalates toward.
    Proxy,
}

/// A single bid in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub auction: AuctionId,
    pub bidder: UserId,

    /// Visible amount in cents. For proxy bids this is raised
    /// automatically, up to `max_amount`.
    pub amount: u64,

    /// Hidden ceiling, present only for proxy bids.
    pub max_amount: Option<u64>,

    pub status: BidStatus,
    pub kind: BidKind,

    /// Unix timestamp of placement. Ties are broken in favor of the
    /// earlier bid.
    pub created_at: u64,

    /// Free-text note; carries the retraction reason.
    pub note: Option<String>,
}

impl Bid {
    /// Still counted for winner determination.
    pub fn is_live(&self) -> bool {
        matches!(self.status, BidStatus::Active | BidStatus::Winning)
    }

    /// Still in play for proxy escalation (not withdrawn or settled).
    pub fn is_standing(&self) -> bool {
        matches!(
            self.status,
            BidStatus::Active | BidStatus::Winning | BidStatus::Outbid
        )
    }

    /// The most this bid can reach: `max_amount` for proxy bids, the
    /// visible amount for manual bids.
    pub fn ceiling(&self) -> u64 {
        match self.kind {
            BidKind::Proxy => self.max_amount.unwrap_or(self.amount),
            BidKind::Manual => self.amount,
        }
    }
}

/// Highest bid still in contention, with ties broken by earliest
/// placement, then by lowest id.
///
/// Winner determination at close derives solely from this, so re-running
/// a close over unchanged ledger state always picks the same bid.
pub fn highest_live(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().filter(|b| b.is_live()).max_by(|a, b| {
        a.amount
            .cmp(&b.amount)
            .then(b.created_at.cmp(&a.created_at))
            .then(b.id.cmp(&a.id))
    })
}
