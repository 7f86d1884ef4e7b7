//! Trait seams between the settlement engines and their collaborators.
//!
//! Engines are generic over these traits so tests can run against
//! in-memory implementations while production wires in real storage and
//! delivery backends.

pub mod notify;
pub mod store;
pub mod time;

pub use notify::Notifier;
pub use store::{AuctionCommit, AuctionStore};
pub use time::{SystemTimeProvider, TimeProvider};
