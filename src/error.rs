/// Domain-specific error types for the auction engine.
#[derive(Debug, thiserror::Error)]
pub enum GavelError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Auction is not active")]
    AuctionNotActive,

    #[error("You cannot bid on your own auction")]
    SelfBid,

    #[error("Bid must be at least {}", crate::util::format_cents(*minimum))]
    BidTooLow {
        /// Minimum acceptable amount, in cents.
        minimum: u64,
    },

    #[error("Trust score {actual} is below the required {required}")]
    InsufficientTrust { required: u32, actual: u32 },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Conflicting update: {0}")]
    StateConflict(String),

    #[error("Invalid auction: {0}")]
    InvalidAuction(String),

    #[error("Storage operation failed: {0}")]
    Storage(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GavelError {
    /// User-correctable validation failures. Surfaced immediately, never
    /// retried.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::AuctionNotActive
                | Self::SelfBid
                | Self::BidTooLow { .. }
                | Self::InsufficientTrust { .. }
                | Self::InvalidAuction(_)
        )
    }

    /// Concurrent-write contention. Retried internally up to a bound
    /// before being surfaced.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StateConflict(_))
    }
}

/// Convenience type alias.
pub type GavelResult<T> = Result<T, GavelError>;
