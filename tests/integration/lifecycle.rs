//! Auction lifecycle transitions around bidding.

use gavel::{AuctionStatus, GavelError, NewAuction, UserId};

use crate::common::AuctionHarness;

const SELLER: UserId = UserId(1);
const ALICE: UserId = UserId(2);

fn scheduled(starts_at: u64) -> NewAuction {
    NewAuction {
        seller: SELLER,
        title: "Scheduled item".to_string(),
        starting_price: 10_000,
        reserve_price: None,
        buy_now_price: None,
        starts_at: Some(starts_at),
        duration_secs: 3600,
    }
}

#[tokio::test]
async fn test_upcoming_auction_rejects_bids() {
    let harness = AuctionHarness::new();
    let auction = harness.registry.create_auction(scheduled(2000)).await.unwrap();
    assert_eq!(auction.status, AuctionStatus::Upcoming);

    let err = harness
        .bids
        .place_bid(auction.id, ALICE, 10_500)
        .await
        .unwrap_err();
    assert!(matches!(err, GavelError::AuctionNotActive));
}

#[tokio::test]
async fn test_sweep_activates_due_auction() {
    let harness = AuctionHarness::new();
    let auction = harness.registry.create_auction(scheduled(2000)).await.unwrap();

    assert_eq!(harness.closer.sweep_once().await.unwrap(), 0);

    harness.time.set(2000);
    assert_eq!(harness.closer.sweep_once().await.unwrap(), 1);
    assert_eq!(
        harness.registry.get_auction(auction.id).await.unwrap().status,
        AuctionStatus::Active
    );

    harness
        .bids
        .place_bid(auction.id, ALICE, 10_500)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancelled_auction_rejects_bids() {
    let harness = AuctionHarness::new();
    let auction = harness.registry.create_auction(scheduled(2000)).await.unwrap();
    harness
        .registry
        .cancel_auction(auction.id, SELLER)
        .await
        .unwrap();

    harness.time.set(2500);
    let err = harness
        .bids
        .place_bid(auction.id, ALICE, 10_500)
        .await
        .unwrap_err();
    assert!(matches!(err, GavelError::AuctionNotActive));

    // A cancelled auction never gets picked up by the sweep.
    harness.time.set(9999);
    assert_eq!(harness.closer.sweep_once().await.unwrap(), 0);
    assert_eq!(
        harness.registry.get_auction(auction.id).await.unwrap().status,
        AuctionStatus::Cancelled
    );
}

#[tokio::test]
async fn test_cancel_blocked_once_bids_exist() {
    let harness = AuctionHarness::new();
    let auction = harness.open_auction(SELLER, 10_000, 3600).await;
    harness.bids.place_bid(auction.id, ALICE, 10_500).await.unwrap();

    let err = harness
        .registry
        .cancel_auction(auction.id, SELLER)
        .await
        .unwrap_err();
    assert!(matches!(err, GavelError::StateConflict(_)));
}

#[tokio::test]
async fn test_closed_auction_is_not_reclosed_by_sweep() {
    let harness = AuctionHarness::new();
    let auction = harness.open_auction(SELLER, 10_000, 3600).await;
    harness.bids.place_bid(auction.id, ALICE, 10_500).await.unwrap();

    harness.advance_past_deadline(&auction);
    assert_eq!(harness.closer.sweep_once().await.unwrap(), 1);
    assert_eq!(harness.closer.sweep_once().await.unwrap(), 0);

    // Trust is credited exactly once.
    assert_eq!(
        harness
            .store
            .get_trust(ALICE)
            .unwrap()
            .successful_transactions,
        1
    );
}
