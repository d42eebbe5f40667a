use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 금액 (최소 화폐 단위 정수)
pub type Amount = i64;
pub type ProductId = i64;
pub type BidderId = i64;

// 경매 모델 (상품당 하나)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub product_id: ProductId,
    pub start_price: Amount,
    pub step_price: Amount,
    pub current_price: Amount,
    pub highest_bidder_id: Option<BidderId>,
    pub bid_count: i64,
}

/// 잠금 하에서 읽은 경매 스냅샷
/// 최고 입찰자가 있으면 그 입찰자의 자동 입찰 상한을 함께 담는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionSnapshot {
    pub auction: Auction,
    pub leader_ceiling: Option<Amount>,
}

// 공개 입찰 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidRecord {
    pub product_id: ProductId,
    pub bidder_id: BidderId,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
}

/// 입찰자 평판 (사용자 관리 서비스 소유)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReputationSnapshot {
    pub positive_reviews: i64,
    pub negative_reviews: i64,
}

/// 신규 경매 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuction {
    pub product_id: Option<ProductId>,
    pub start_price: Amount,
    pub step_price: Amount,
}

// 입찰 이력 항목 (표시 이름 포함)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidHistoryItem {
    pub created_at: DateTime<Utc>,
    pub bidder_name: String,
    pub amount: Amount,
}

// 최고 입찰자 요약
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighestBidder {
    pub id: BidderId,
    pub full_name: String,
    pub positive_reviews: i64,
    pub negative_reviews: i64,
}

// 현재 가격 + 최고 입찰자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighestBid {
    pub current_price: Amount,
    pub highest_bidder: Option<HighestBidder>,
}

/// 페이지네이션 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 {
            total.saturating_add(limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// OFFSET 계산 (page 는 1부터 시작)
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.limit)
    }
}

/// 페이지 단위 조회 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
