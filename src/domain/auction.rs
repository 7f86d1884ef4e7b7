use serde::{Deserialize, Serialize};

use crate::config::{now_unix, INCREMENT_PERCENT, MIN_INCREMENT_CENTS};
use crate::domain::{AuctionId, UserId};
use crate::traits::{SystemTimeProvider, TimeProvider};

/// Lifecycle state of an auction.
///
/// Transitions are forward-only, except `Cancelled`, which is reachable
/// only from `Upcoming` or from `Active` with zero bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionStatus {
    /// Created, not yet open for bids.
    Upcoming,
    /// Open and accepting bids.
    Active,
    /// Finalized; winner and final price are settled (or absent).
    Ended,
    /// Withdrawn by the seller before any bid existed.
    Cancelled,
    /// Administratively frozen; not biddable.
    Suspended,
}

/// A timed auction with a hard deadline.
///
/// All monetary fields are integer cents. `version` is the optimistic
/// concurrency counter checked by the store on every commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,

    /// The auction creator. Sellers cannot bid on their own auctions.
    pub seller: UserId,

    pub title: String,

    /// Price the bidding opens at.
    pub starting_price: u64,

    /// Most recently accepted bid amount; equals `starting_price` before
    /// any bid. Non-decreasing while the auction is Active, except on
    /// retraction of the leading bid.
    pub current_price: u64,

    /// Seller-set floor. If unmet at close, no winner is declared.
    pub reserve_price: Option<u64>,

    /// Optional immediate-purchase price. Stored attribute only; no
    /// buy-now operation exists in this core.
    pub buy_now_price: Option<u64>,

    /// Unix timestamp when bidding opens.
    pub start_time: u64,

    /// Unix timestamp of the hard deadline.
    pub end_time: u64,

    pub status: AuctionStatus,

    /// Number of committed bids. Updated only inside the per-auction
    /// atomic commit.
    pub bid_count: u32,

    /// Set only when status is Ended and the reserve was met.
    pub winner: Option<UserId>,

    /// Set only when status is Ended and the reserve was met.
    pub final_price: Option<u64>,

    /// Unix timestamp when the auction record was created.
    pub created_at: u64,

    /// Optimistic concurrency counter, bumped by the store on every
    /// committed write.
    pub version: u64,
}

impl Auction {
    /// Create a new auction builder.
    pub const fn builder() -> AuctionBuilder<SystemTimeProvider> {
        AuctionBuilder::new(SystemTimeProvider::new())
    }

    /// Create a new auction builder with a custom time provider.
    pub const fn builder_with_time<T: TimeProvider>(time: T) -> AuctionBuilder<T> {
        AuctionBuilder::new(time)
    }

    /// Check if the auction is accepting bids right now.
    pub fn is_active(&self) -> bool {
        self.is_active_at(now_unix())
    }

    /// Check if the auction is accepting bids at a specific timestamp:
    /// status Active and `now` within `[start_time, end_time)`.
    pub fn is_active_at(&self, now: u64) -> bool {
        self.status == AuctionStatus::Active && self.start_time <= now && now < self.end_time
    }

    /// Check if the deadline has passed at a specific timestamp.
    pub const fn has_ended_at(&self, now: u64) -> bool {
        self.end_time <= now
    }

    /// Get time remaining in seconds at a specific timestamp (0 if ended).
    pub const fn time_remaining_at(&self, now: u64) -> u64 {
        self.end_time.saturating_sub(now)
    }

    /// Smallest amount a new bid must meet: the current price plus the
    /// larger of a 5% increment (rounded down to a whole dollar) or $1.
    pub fn minimum_next_bid(&self) -> u64 {
        let percent = self.current_price / 100 * INCREMENT_PERCENT / 100 * 100;
        self.current_price + percent.max(MIN_INCREMENT_CENTS)
    }

    /// True when no reserve is set or the current price has reached it.
    pub fn reserve_met(&self) -> bool {
        match self.reserve_price {
            None => true,
            Some(reserve) => self.current_price >= reserve,
        }
    }
}

/// Builder for creating new auctions.
pub struct AuctionBuilder<T: TimeProvider> {
    time: T,
    id: Option<AuctionId>,
    seller: Option<UserId>,
    title: Option<String>,
    starting_price: Option<u64>,
    reserve_price: Option<u64>,
    buy_now_price: Option<u64>,
    start_time: Option<u64>,
    duration_secs: Option<u64>,
}

impl<T: TimeProvider> AuctionBuilder<T> {
    /// Create a new builder with a time provider.
    pub const fn new(time: T) -> Self {
        Self {
            time,
            id: None,
            seller: None,
            title: None,
            starting_price: None,
            reserve_price: None,
            buy_now_price: None,
            start_time: None,
            duration_secs: None,
        }
    }

    #[must_use]
    pub const fn id(mut self, id: AuctionId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub const fn seller(mut self, seller: UserId) -> Self {
        self.seller = Some(seller);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn starting_price(mut self, cents: u64) -> Self {
        self.starting_price = Some(cents);
        self
    }

    #[must_use]
    pub const fn reserve_price(mut self, cents: u64) -> Self {
        self.reserve_price = Some(cents);
        self
    }

    #[must_use]
    pub const fn buy_now_price(mut self, cents: u64) -> Self {
        self.buy_now_price = Some(cents);
        self
    }

    /// Set an explicit opening time (defaults to now).
    #[must_use]
    pub const fn starts_at(mut self, timestamp: u64) -> Self {
        self.start_time = Some(timestamp);
        self
    }

    /// Set auction duration in seconds from the opening time.
    #[must_use]
    pub const fn duration(mut self, seconds: u64) -> Self {
        self.duration_secs = Some(seconds);
        self
    }

    /// Build the auction (returns error if required fields are missing or
    /// inconsistent).
    pub fn build(self) -> Result<Auction, String> {
        let created_at = self.time.now_unix();
        let start_time = self.start_time.unwrap_or(created_at);
        let duration = self.duration_secs.ok_or("duration is required")?;
        if duration == 0 {
            return Err("end time must be after start time".to_string());
        }
        if start_time < created_at {
            return Err("start time cannot be in the past".to_string());
        }

        let starting_price = self.starting_price.ok_or("starting_price is required")?;
        if starting_price == 0 {
            return Err("starting price must be greater than zero".to_string());
        }

        Ok(Auction {
            id: self.id.ok_or("id is required")?,
            seller: self.seller.ok_or("seller is required")?,
            title: self.title.ok_or("title is required")?,
            starting_price,
            current_price: starting_price,
            reserve_price: self.reserve_price,
            buy_now_price: self.buy_now_price,
            start_time,
            end_time: start_time + duration,
            status: AuctionStatus::Upcoming,
            bid_count: 0,
            winner: None,
            final_price: None,
            created_at,
            version: 0,
        })
    }
}
