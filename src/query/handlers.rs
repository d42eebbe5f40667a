// region:    --- Imports
use super::mask::mask_name;
use crate::auction::model::{Auction, BidHistoryItem, HighestBid, Paginated, ProductId};
use crate::error::BidError;
use crate::store::AuctionStore;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// 페이지 파라미터 검증
pub fn validate_page(page: i64, limit: i64) -> Result<(), BidError> {
    if page < 1 {
        return Err(BidError::InvalidRequest("page must be at least 1".to_string()));
    }
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(BidError::InvalidRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(())
}

/// 경매 상태 조회 (상한은 포함하지 않음)
pub async fn get_auction_state(
    store: &dyn AuctionStore,
    product_id: ProductId,
) -> Result<Auction, BidError> {
    info!("{:<12} --> 경매 상태 조회 id: {}", "Query", product_id);
    store
        .auction(product_id)
        .await?
        .ok_or_else(|| BidError::product_not_found(product_id))
}

/// 최고 입찰가 조회
pub async fn get_highest_bid(
    store: &dyn AuctionStore,
    product_id: ProductId,
) -> Result<HighestBid, BidError> {
    info!("{:<12} --> 최고 입찰가 조회 id: {}", "Query", product_id);
    let mut highest = store
        .highest_bid(product_id)
        .await?
        .ok_or_else(|| BidError::product_not_found(product_id))?;

    if let Some(bidder) = highest.highest_bidder.as_mut() {
        bidder.full_name = mask_name(&bidder.full_name);
    }
    Ok(highest)
}

/// 입찰 이력 조회
pub async fn get_bid_history(
    store: &dyn AuctionStore,
    product_id: ProductId,
    page: i64,
    limit: i64,
) -> Result<Paginated<BidHistoryItem>, BidError> {
    info!(
        "{:<12} --> 입찰 이력 조회 id: {}, page: {}, limit: {}",
        "Query", product_id, page, limit
    );
    validate_page(page, limit)?;

    let history = store.bid_history(product_id, page, limit).await?;
    Ok(history.map(|item| BidHistoryItem {
        bidder_name: mask_name(&item.bidder_name),
        ..item
    }))
}

// endregion: --- Query Handlers
