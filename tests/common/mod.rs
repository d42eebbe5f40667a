#![allow(dead_code)]

use proxy_auction::auction::model::{Auction, NewAuction};
use proxy_auction::bidding::commands::BiddingService;
use proxy_auction::bidding::eligibility::EligibilityPolicy;
use proxy_auction::store::memory::InMemoryStore;
use proxy_auction::store::AuctionStore;
use std::sync::Arc;

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;
pub const CAROL: i64 = 3;
pub const GRUMPY: i64 = 4;

/// 트레이싱 초기화 (여러 번 호출해도 안전)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 기본 입찰자가 등록된 인메모리 저장소
pub async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.register_bidder(ALICE, "Alice Nguyen", 10, 0).await;
    store.register_bidder(BOB, "Bob Tran", 4, 1).await;
    store.register_bidder(CAROL, "Carol Pham", 0, 0).await;
    // 평점 50%
    store.register_bidder(GRUMPY, "Grumpy Le", 5, 5).await;
    store
}

pub fn service(store: Arc<InMemoryStore>) -> BiddingService {
    BiddingService::new(
        store.clone(),
        store,
        EligibilityPolicy::default(),
        proxy_auction::config::DEFAULT_MAX_BID_RETRIES,
    )
}

pub async fn create_test_auction(
    store: &InMemoryStore,
    start_price: i64,
    step_price: i64,
) -> Auction {
    store
        .create_auction(NewAuction {
            product_id: None,
            start_price,
            step_price,
        })
        .await
        .unwrap()
}
