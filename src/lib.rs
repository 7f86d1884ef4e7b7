pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod events;
pub mod traits;
pub mod util;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use config::*;
pub use domain::{
    Auction, AuctionId, AuctionStatus, Bid, BidId, BidKind, BidStatus, TrustRecord, UserId,
};
pub use engine::{AuctionCloser, AuctionLocks, AuctionRegistry, BidEngine, BidLedger, NewAuction};
pub use error::{GavelError, GavelResult};
pub use events::AuctionEvent;
pub use traits::{AuctionCommit, AuctionStore, Notifier, SystemTimeProvider, TimeProvider};
