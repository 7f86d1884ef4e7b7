pub mod harness;

pub use harness::AuctionHarness;
