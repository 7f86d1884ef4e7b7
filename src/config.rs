//! Configuration constants for the auction engine.
//!
//! This module centralizes magic numbers and tuning values
//! to improve maintainability and enable easier tuning.

/// Minimum trust score required to place any bid.
pub const MIN_BIDDING_TRUST: u32 = 300;

/// Trust score required for bids above [`HIGH_VALUE_BID_CENTS`].
pub const HIGH_VALUE_TRUST: u32 = 600;

/// Bids strictly above this amount (in cents) require [`HIGH_VALUE_TRUST`].
pub const HIGH_VALUE_BID_CENTS: u64 = 100_000;

/// Percentage used for the minimum next-bid increment.
pub const INCREMENT_PERCENT: u64 = 5;

/// Floor for the minimum next-bid increment, in cents ($1.00).
pub const MIN_INCREMENT_CENTS: u64 = 100;

/// Flat step used by proxy-bid escalation, in cents ($1.00).
pub const PROXY_STEP_CENTS: u64 = 100;

/// Maximum retries for a commit that keeps hitting optimistic-concurrency
/// conflicts before the conflict is surfaced to the caller.
pub const COMMIT_MAX_RETRIES: u32 = 5;

/// Interval in seconds between auction sweep passes.
pub const SWEEP_INTERVAL_SECS: u64 = 10;

/// Default trust score for users with no transaction history.
pub const DEFAULT_TRUST_SCORE: u32 = 500;

/// Maximum size in bytes accepted when decoding an event payload.
pub const MAX_EVENT_SIZE: usize = 32_768;

/// Return the current Unix timestamp in seconds.
///
/// This is a convenience wrapper that avoids the boilerplate of
/// `SystemTimeProvider::new().now_unix()` in production code paths.
/// For testable code, prefer accepting a `TimeProvider` parameter instead.
pub fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
