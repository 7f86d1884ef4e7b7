//! Deadline and seller-driven auction finalization.

use gavel::{AuctionEvent, AuctionStatus, BidStatus, GavelError, UserId};

use crate::common::AuctionHarness;

const SELLER: UserId = UserId(1);
const ALICE: UserId = UserId(2);
const BOB: UserId = UserId(3);

#[tokio::test]
async fn test_sweep_closes_expired_auction_with_winner() {
    let harness = AuctionHarness::new();
    let auction = harness.open_auction(SELLER, 10_000, 3600).await;

    harness.bids.place_bid(auction.id, ALICE, 10_500).await.unwrap();
    let top = harness.bids.place_bid(auction.id, BOB, 11_000).await.unwrap();

    harness.advance_past_deadline(&auction);
    assert_eq!(harness.closer.sweep_once().await.unwrap(), 1);

    let closed = harness.registry.get_auction(auction.id).await.unwrap();
    assert_eq!(closed.status, AuctionStatus::Ended);
    assert_eq!(closed.winner, Some(BOB));
    assert_eq!(closed.final_price, Some(11_000));
    assert_eq!(harness.store.get_bid(top.id).unwrap().status, BidStatus::Won);

    // Winner and seller both record a successful transaction.
    assert_eq!(
        harness.store.get_trust(BOB).unwrap().successful_transactions,
        1
    );
    assert_eq!(
        harness
            .store
            .get_trust(SELLER)
            .unwrap()
            .successful_transactions,
        1
    );

    let events = harness.notifier.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, AuctionEvent::AuctionWon { winner, .. } if *winner == BOB)));
    assert!(events
        .iter()
        .any(|e| matches!(e, AuctionEvent::AuctionSold { seller, .. } if *seller == SELLER)));
}

#[tokio::test]
async fn test_close_twice_yields_identical_outcome() {
    let harness = AuctionHarness::new();
    let auction = harness.open_auction(SELLER, 10_000, 3600).await;
    harness.bids.place_bid(auction.id, ALICE, 10_500).await.unwrap();

    harness.advance_past_deadline(&auction);
    let first = harness.closer.close_auction(auction.id).await.unwrap();
    let second = harness.closer.close_auction(auction.id).await.unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.winner, second.winner);
    assert_eq!(first.final_price, second.final_price);

    // The second close changes no trust state.
    assert_eq!(
        harness
            .store
            .get_trust(ALICE)
            .unwrap()
            .successful_transactions,
        1
    );
}

#[tokio::test]
async fn test_reserve_not_met_ends_without_sale() {
    let harness = AuctionHarness::new();
    let auction = harness
        .open_auction_with_reserve(SELLER, 10_000, 3600, Some(50_000))
        .await;

    let bid = harness.bids.place_bid(auction.id, ALICE, 45_000).await.unwrap();

    harness.advance_past_deadline(&auction);
    let closed = harness.closer.close_auction(auction.id).await.unwrap();

    assert_eq!(closed.status, AuctionStatus::Ended);
    assert_eq!(closed.winner, None);
    assert_eq!(closed.final_price, None);
    assert_eq!(
        harness.store.get_bid(bid.id).unwrap().status,
        BidStatus::Lost
    );
    assert!(harness.notifier.events().iter().any(|e| matches!(
        e,
        AuctionEvent::ReserveNotMet { seller, highest_amount, .. }
            if *seller == SELLER && *highest_amount == 45_000
    )));
    // No trust change on a reserve failure.
    let trust = harness.store.get_trust(ALICE).unwrap();
    assert_eq!(trust.successful_transactions, 0);
    assert_eq!(trust.failed_transactions, 0);
    assert_eq!(trust.score, 500);
}

#[tokio::test]
async fn test_reserve_met_exactly_sells() {
    let harness = AuctionHarness::new();
    let auction = harness
        .open_auction_with_reserve(SELLER, 10_000, 3600, Some(45_000))
        .await;

    harness.bids.place_bid(auction.id, ALICE, 45_000).await.unwrap();

    harness.advance_past_deadline(&auction);
    let closed = harness.closer.close_auction(auction.id).await.unwrap();
    assert_eq!(closed.winner, Some(ALICE));
    assert_eq!(closed.final_price, Some(45_000));
}

#[tokio::test]
async fn test_seller_ends_auction_early() {
    let harness = AuctionHarness::new();
    let auction = harness.open_auction(SELLER, 10_000, 3600).await;
    harness.bids.place_bid(auction.id, ALICE, 10_500).await.unwrap();

    let err = harness
        .closer
        .end_auction(auction.id, ALICE)
        .await
        .unwrap_err();
    assert!(matches!(err, GavelError::Unauthorized(_)));

    // No deadline has passed; the seller ends it explicitly.
    let closed = harness.closer.end_auction(auction.id, SELLER).await.unwrap();
    assert_eq!(closed.status, AuctionStatus::Ended);
    assert_eq!(closed.winner, Some(ALICE));
}

#[tokio::test]
async fn test_no_bids_after_close() {
    let harness = AuctionHarness::new();
    let auction = harness.open_auction(SELLER, 10_000, 3600).await;

    harness.advance_past_deadline(&auction);
    harness.closer.close_auction(auction.id).await.unwrap();

    let err = harness
        .bids
        .place_bid(auction.id, ALICE, 10_500)
        .await
        .unwrap_err();
    assert!(matches!(err, GavelError::AuctionNotActive));
}
