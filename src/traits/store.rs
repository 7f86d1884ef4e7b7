use async_trait::async_trait;

use crate::domain::{Auction, AuctionId, Bid, BidId, TrustRecord, UserId};
use crate::error::GavelResult;

/// The set of records written atomically by one settlement step.
///
/// A commit carries the auction header plus every bid and trust record
/// the step touched. The store applies all of it or none of it, and
/// must reject the commit with `GavelError::StateConflict` when the
/// stored auction's `version` no longer matches `auction.version`; on
/// success the stored version is bumped by one.
#[derive(Debug, Clone, Default)]
pub struct AuctionCommit {
    pub auction: Option<Auction>,
    pub bids: Vec<Bid>,
    pub trust: Vec<TrustRecord>,
}

impl AuctionCommit {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn auction(mut self, auction: Auction) -> Self {
        self.auction = Some(auction);
        self
    }

    #[must_use]
    pub fn bid(mut self, bid: Bid) -> Self {
        self.bids.push(bid);
        self
    }

    #[must_use]
    pub fn trust(mut self, record: TrustRecord) -> Self {
        self.trust.push(record);
        self
    }
}

/// Persistence backend for auctions, bids, and trust records.
#[async_trait]
pub trait AuctionStore: Send + Sync + Clone + 'static {
    async fn load_auction(&self, id: AuctionId) -> GavelResult<Auction>;

    /// All bids for an auction, in no particular order.
    async fn load_bids(&self, auction: AuctionId) -> GavelResult<Vec<Bid>>;

    async fn load_bid(&self, id: BidId) -> GavelResult<Bid>;

    async fn load_bids_for_user(&self, user: UserId) -> GavelResult<Vec<Bid>>;

    /// Trust record for a user, creating a default one if absent.
    async fn load_trust(&self, user: UserId) -> GavelResult<TrustRecord>;

    async fn allocate_auction_id(&self) -> GavelResult<AuctionId>;

    async fn allocate_bid_id(&self) -> GavelResult<BidId>;

    /// Insert a freshly built auction. Fails if the id already exists.
    async fn insert_auction(&self, auction: Auction) -> GavelResult<()>;

    /// Apply a commit atomically, enforcing the version check described
    /// on [`AuctionCommit`].
    async fn commit(&self, commit: AuctionCommit) -> GavelResult<()>;

    /// Auctions whose status is Active.
    async fn active_auctions(&self) -> GavelResult<Vec<Auction>>;

    /// Auctions whose status is Upcoming.
    async fn upcoming_auctions(&self) -> GavelResult<Vec<Auction>>;
}
