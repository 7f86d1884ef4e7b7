//! Entity types owned by the auction core.
//!
//! Auctions are owned by the registry, bids by the ledger, trust records
//! by the trust updater; all three are mutated only through the engine's
//! atomic commits, never directly by callers.

pub mod auction;
pub mod bid;
pub mod trust;

pub use auction::{Auction, AuctionBuilder, AuctionStatus};
pub use bid::{highest_live, Bid, BidKind, BidStatus};
pub use trust::TrustRecord;

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_newtype!(
    /// Identifier of an auction record.
    AuctionId
);
id_newtype!(
    /// Identifier of a bid record.
    BidId
);
id_newtype!(
    /// Identifier of a user (bidder or seller).
    UserId
);
