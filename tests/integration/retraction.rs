//! Bid withdrawal and its trust-score consequences.

use gavel::{BidStatus, GavelError, UserId};

use crate::common::AuctionHarness;

const SELLER: UserId = UserId(1);
const ALICE: UserId = UserId(2);
const BOB: UserId = UserId(3);

#[tokio::test]
async fn test_retracting_leader_promotes_runner_up() {
    let harness = AuctionHarness::new();
    let auction = harness.open_auction(SELLER, 9_000, 3600).await;

    let first = harness.bids.place_bid(auction.id, ALICE, 10_000).await.unwrap();
    let second = harness.bids.place_bid(auction.id, BOB, 12_000).await.unwrap();

    harness
        .bids
        .retract_bid(second.id, BOB, "found it cheaper".to_string())
        .await
        .unwrap();

    assert_eq!(
        harness.store.get_bid(second.id).unwrap().status,
        BidStatus::Retracted
    );
    assert_eq!(
        harness.store.get_bid(first.id).unwrap().status,
        BidStatus::Winning
    );
    assert_eq!(
        harness
            .registry
            .get_auction(auction.id)
            .await
            .unwrap()
            .current_price,
        10_000
    );

    let trust = harness.store.get_trust(BOB).unwrap();
    assert_eq!(trust.failed_transactions, 1);
    assert_eq!(trust.score, 490);
}

#[tokio::test]
async fn test_promoted_bid_wins_at_close() {
    let harness = AuctionHarness::new();
    let auction = harness.open_auction(SELLER, 9_000, 3600).await;

    harness.bids.place_bid(auction.id, ALICE, 10_000).await.unwrap();
    let leader = harness.bids.place_bid(auction.id, BOB, 12_000).await.unwrap();
    harness
        .bids
        .retract_bid(leader.id, BOB, "retracted".to_string())
        .await
        .unwrap();

    harness.advance_past_deadline(&auction);
    let closed = harness.closer.close_auction(auction.id).await.unwrap();

    assert_eq!(closed.winner, Some(ALICE));
    assert_eq!(closed.final_price, Some(10_000));
}

#[tokio::test]
async fn test_retracted_bid_cannot_be_retracted_again() {
    let harness = AuctionHarness::new();
    let auction = harness.open_auction(SELLER, 10_000, 3600).await;

    let bid = harness.bids.place_bid(auction.id, ALICE, 10_500).await.unwrap();
    harness
        .bids
        .retract_bid(bid.id, ALICE, "first".to_string())
        .await
        .unwrap();

    let err = harness
        .bids
        .retract_bid(bid.id, ALICE, "second".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, GavelError::StateConflict(_)));

    // Only one penalty is recorded.
    assert_eq!(harness.store.get_trust(ALICE).unwrap().failed_transactions, 1);
}

#[tokio::test]
async fn test_repeated_retractions_erode_trust_below_bidding_floor() {
    let harness = AuctionHarness::new();

    // 21 failures: 500 - 210 = 290, below the bidding floor of 300.
    for i in 0..21 {
        let auction = harness.open_auction(SELLER, 10_000, 3600).await;
        let bid = harness
            .bids
            .place_bid(auction.id, ALICE, 10_500)
            .await
            .unwrap_or_else(|e| panic!("bid {i} rejected: {e}"));
        harness
            .bids
            .retract_bid(bid.id, ALICE, "again".to_string())
            .await
            .unwrap();
    }

    assert_eq!(harness.store.get_trust(ALICE).unwrap().score, 290);

    let auction = harness.open_auction(SELLER, 10_000, 3600).await;
    let err = harness
        .bids
        .place_bid(auction.id, ALICE, 10_500)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GavelError::InsufficientTrust { required: 300, .. }
    ));
}
