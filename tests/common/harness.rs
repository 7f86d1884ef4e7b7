//! Shared test harness wiring every engine to the same in-memory
//! collaborators and mock clock.

use gavel::mocks::{MemoryStore, MockTime, RecordingNotifier};
use gavel::{
    Auction, AuctionCloser, AuctionLocks, AuctionRegistry, BidEngine, BidLedger, NewAuction,
    UserId,
};

pub struct AuctionHarness {
    pub store: MemoryStore,
    pub notifier: RecordingNotifier,
    pub time: MockTime,
    pub bids: BidEngine<MemoryStore, RecordingNotifier, MockTime>,
    pub closer: AuctionCloser<MemoryStore, RecordingNotifier, MockTime>,
    pub registry: AuctionRegistry<MemoryStore, MockTime>,
    pub ledger: BidLedger<MemoryStore>,
}

#[allow(dead_code)]
impl AuctionHarness {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let time = MockTime::new(1000);
        let locks = AuctionLocks::new();

        Self {
            bids: BidEngine::new(
                store.clone(),
                notifier.clone(),
                time.clone(),
                locks.clone(),
            ),
            closer: AuctionCloser::new(
                store.clone(),
                notifier.clone(),
                time.clone(),
                locks.clone(),
            ),
            registry: AuctionRegistry::new(store.clone(), time.clone(), locks),
            ledger: BidLedger::new(store.clone()),
            store,
            notifier,
            time,
        }
    }

    /// Create and immediately start an auction.
    pub async fn open_auction(
        &self,
        seller: UserId,
        starting_price: u64,
        duration_secs: u64,
    ) -> Auction {
        self.open_auction_with_reserve(seller, starting_price, duration_secs, None)
            .await
    }

    pub async fn open_auction_with_reserve(
        &self,
        seller: UserId,
        starting_price: u64,
        duration_secs: u64,
        reserve_price: Option<u64>,
    ) -> Auction {
        let auction = self
            .registry
            .create_auction(NewAuction {
                seller,
                title: "Test item".to_string(),
                starting_price,
                reserve_price,
                buy_now_price: None,
                starts_at: None,
                duration_secs,
            })
            .await
            .expect("create auction");
        self.registry
            .start_auction(auction.id, seller)
            .await
            .expect("start auction")
    }

    /// Move the clock to the auction deadline.
    pub fn advance_past_deadline(&self, auction: &Auction) {
        self.time.set(auction.end_time);
    }
}
