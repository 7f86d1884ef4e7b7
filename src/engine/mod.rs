//! Settlement engines.
//!
//! Each engine is generic over its collaborators and shares one
//! [`AuctionLocks`] instance so every mutation on the same auction is
//! serialized across engines.

pub mod closer;
pub mod ledger;
pub mod locks;
pub mod placement;
mod proxy;
pub mod registry;

pub use closer::AuctionCloser;
pub use ledger::BidLedger;
pub use locks::AuctionLocks;
pub use placement::BidEngine;
pub use registry::{AuctionRegistry, NewAuction};
