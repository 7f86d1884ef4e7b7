//! Notification events emitted after successful commits.
//!
//! Events are advisory. They are published after the ledger write has
//! committed, and a publish failure never rolls back or retries the
//! settlement that produced it.

use serde::{Deserialize, Serialize};

use crate::config::MAX_EVENT_SIZE;
use crate::domain::{AuctionId, BidId, UserId};
use crate::error::{GavelError, GavelResult};
use crate::util::cbor_from_limited_reader;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionEvent {
    /// A bid was accepted into the ledger.
    BidPlaced {
        bidder: UserId,
        auction: AuctionId,
        bid: BidId,
        amount: u64,
    },
    /// A previously leading or active bid was surpassed.
    Outbid {
        user: UserId,
        auction: AuctionId,
        new_leading_bid: BidId,
        new_amount: u64,
    },
    /// The auction closed with a winner.
    AuctionWon {
        winner: UserId,
        auction: AuctionId,
        final_price: u64,
    },
    /// Seller-side counterpart of a won auction.
    AuctionSold {
        seller: UserId,
        auction: AuctionId,
        final_price: u64,
    },
    /// The auction closed without a sale because the reserve was unmet.
    ReserveNotMet {
        seller: UserId,
        auction: AuctionId,
        highest_amount: u64,
    },
}

impl AuctionEvent {
    /// The auction this event concerns.
    pub fn auction(&self) -> AuctionId {
        match self {
            Self::BidPlaced { auction, .. }
            | Self::Outbid { auction, .. }
            | Self::AuctionWon { auction, .. }
            | Self::AuctionSold { auction, .. }
            | Self::ReserveNotMet { auction, .. } => *auction,
        }
    }

    /// The user the event should be delivered to.
    pub fn recipient(&self) -> UserId {
        match self {
            Self::BidPlaced { bidder, .. } => *bidder,
            Self::Outbid { user, .. } => *user,
            Self::AuctionWon { winner, .. } => *winner,
            Self::AuctionSold { seller, .. } | Self::ReserveNotMet { seller, .. } => *seller,
        }
    }

    /// Serialize to CBOR for transport.
    pub fn to_cbor(&self) -> GavelResult<Vec<u8>> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes)
            .map_err(|e| GavelError::Serialization(format!("CBOR serialization failed: {e}")))?;
        Ok(bytes)
    }

    /// Deserialize from CBOR, rejecting oversized payloads.
    pub fn from_cbor(data: &[u8]) -> GavelResult<Self> {
        cbor_from_limited_reader(data, MAX_EVENT_SIZE)
    }
}
