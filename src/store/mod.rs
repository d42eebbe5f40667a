/// 경매 저장소 / 평판 조회 트레이트와 Postgres 구현체
// region:    --- Imports
use crate::auction::model::{
    Amount, Auction, AuctionSnapshot, BidHistoryItem, BidderId, HighestBid, HighestBidder,
    NewAuction, Paginated, Pagination, ProductId, ReputationSnapshot,
};
use crate::auction::outcome::BidOutcome;
use crate::database::DatabaseManager;
use crate::error::BidError;
use crate::query::queries;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Postgres, Row, Transaction};
use std::sync::Arc;
use tracing::debug;

pub mod memory;

// endregion: --- Imports

// region:    --- Store Traits
/// 입찰자 평판 조회 (읽기 전용)
#[async_trait]
pub trait ReputationSource: Send + Sync {
    async fn reputation(&self, bidder_id: BidderId)
        -> Result<Option<ReputationSnapshot>, BidError>;
}

/// 한 경매에 대한 잠금 트랜잭션
/// snapshot 부터 commit 까지 같은 상품의 다른 입찰은 끼어들 수 없다.
/// commit 없이 버려지면 롤백된다.
#[async_trait]
pub trait AuctionTx: Send {
    /// 잠금 하에서 경매 스냅샷 조회
    async fn snapshot(&mut self) -> Result<AuctionSnapshot, BidError>;

    async fn ceiling(&mut self, bidder_id: BidderId) -> Result<Option<Amount>, BidError>;

    /// 경매 갱신 + 입찰 기록 + 상한 upsert
    async fn apply(&mut self, outcome: &BidOutcome) -> Result<(), BidError>;

    async fn commit(self: Box<Self>) -> Result<(), BidError>;

    async fn rollback(self: Box<Self>) -> Result<(), BidError>;
}

#[async_trait]
pub trait AuctionStore: Send + Sync {
    async fn begin(&self, product_id: ProductId) -> Result<Box<dyn AuctionTx>, BidError>;

    async fn create_auction(&self, new_auction: NewAuction) -> Result<Auction, BidError>;

    async fn auction(&self, product_id: ProductId) -> Result<Option<Auction>, BidError>;

    /// 비공개 상한 조회 (내부용)
    async fn ceiling(
        &self,
        product_id: ProductId,
        bidder_id: BidderId,
    ) -> Result<Option<Amount>, BidError>;

    /// 최신순 입찰 이력 (마스킹 전 이름)
    async fn bid_history(
        &self,
        product_id: ProductId,
        page: i64,
        limit: i64,
    ) -> Result<Paginated<BidHistoryItem>, BidError>;

    async fn highest_bid(&self, product_id: ProductId) -> Result<Option<HighestBid>, BidError>;
}

pub(crate) fn validate_new_auction(new_auction: &NewAuction) -> Result<(), BidError> {
    if new_auction.start_price < 0 {
        return Err(BidError::InvalidRequest(
            "start_price must not be negative".to_string(),
        ));
    }
    if new_auction.step_price <= 0 {
        return Err(BidError::InvalidRequest(
            "step_price must be positive".to_string(),
        ));
    }
    Ok(())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

// endregion: --- Store Traits

// region:    --- Postgres Store
/// Postgres 경매 저장소
pub struct PostgresAuctionStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresAuctionStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

/// Postgres 잠금 트랜잭션
/// snapshot 에서 SELECT ... FOR UPDATE 로 경매 행을 잠근다.
pub struct PostgresAuctionTx {
    tx: Transaction<'static, Postgres>,
    product_id: ProductId,
}

#[async_trait]
impl AuctionTx for PostgresAuctionTx {
    async fn snapshot(&mut self) -> Result<AuctionSnapshot, BidError> {
        let auction = sqlx::query_as::<_, Auction>(queries::LOCK_AUCTION)
            .bind(self.product_id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or_else(|| BidError::product_not_found(self.product_id))?;

        let leader_ceiling = match auction.highest_bidder_id {
            Some(leader_id) => self.ceiling(leader_id).await?,
            None => None,
        };

        Ok(AuctionSnapshot {
            auction,
            leader_ceiling,
        })
    }

    async fn ceiling(&mut self, bidder_id: BidderId) -> Result<Option<Amount>, BidError> {
        let max_amount = sqlx::query_scalar::<_, i64>(queries::GET_CEILING)
            .bind(self.product_id)
            .bind(bidder_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(max_amount)
    }

    async fn apply(&mut self, outcome: &BidOutcome) -> Result<(), BidError> {
        debug!(
            "{:<12} --> 결과 반영: product_id={}, {:?}",
            "Store", self.product_id, outcome
        );

        if let Some(update) = outcome.auction_update() {
            sqlx::query(queries::UPDATE_AUCTION)
                .bind(self.product_id)
                .bind(update.current_price)
                .bind(update.highest_bidder_id)
                .execute(&mut *self.tx)
                .await?;
        }

        if let Some(entry) = outcome.ledger_entry() {
            sqlx::query(queries::INSERT_BID)
                .bind(self.product_id)
                .bind(entry.bidder_id)
                .bind(entry.amount)
                .bind(Utc::now())
                .execute(&mut *self.tx)
                .await?;
        }

        if let Some(write) = outcome.ceiling_write() {
            sqlx::query(queries::UPSERT_CEILING)
                .bind(self.product_id)
                .bind(write.bidder_id)
                .bind(write.max_amount)
                .execute(&mut *self.tx)
                .await?;
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), BidError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), BidError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl AuctionStore for PostgresAuctionStore {
    async fn begin(&self, product_id: ProductId) -> Result<Box<dyn AuctionTx>, BidError> {
        let tx = self.db_manager.pool().begin().await?;
        Ok(Box::new(PostgresAuctionTx { tx, product_id }))
    }

    async fn create_auction(&self, new_auction: NewAuction) -> Result<Auction, BidError> {
        validate_new_auction(&new_auction)?;
        let requested_id = new_auction.product_id;
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let query = match new_auction.product_id {
                        Some(product_id) => {
                            sqlx::query_as::<_, Auction>(queries::INSERT_AUCTION_WITH_ID)
                                .bind(product_id)
                        }
                        None => sqlx::query_as::<_, Auction>(queries::INSERT_AUCTION),
                    };
                    let auction = query
                        .bind(new_auction.start_price)
                        .bind(new_auction.step_price)
                        .fetch_one(&mut **tx)
                        .await?;

                    // ID 를 직접 넣으면 시퀀스가 따라오지 않는다
                    if new_auction.product_id.is_some() {
                        sqlx::query(queries::SYNC_PRODUCT_ID_SEQUENCE)
                            .execute(&mut **tx)
                            .await?;
                    }
                    Ok(auction)
                })
            })
            .await
            .map_err(|e| match e {
                BidError::Database(db_err) if is_unique_violation(&db_err) => {
                    BidError::InvalidRequest(format!(
                        "product {} already has an auction",
                        requested_id.unwrap_or_default()
                    ))
                }
                other => other,
            })
    }

    async fn auction(&self, product_id: ProductId) -> Result<Option<Auction>, BidError> {
        let auction = sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
            .bind(product_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(auction)
    }

    async fn ceiling(
        &self,
        product_id: ProductId,
        bidder_id: BidderId,
    ) -> Result<Option<Amount>, BidError> {
        let max_amount = sqlx::query_scalar::<_, i64>(queries::GET_CEILING)
            .bind(product_id)
            .bind(bidder_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(max_amount)
    }

    async fn bid_history(
        &self,
        product_id: ProductId,
        page: i64,
        limit: i64,
    ) -> Result<Paginated<BidHistoryItem>, BidError> {
        let pool = self.db_manager.pool();

        let exists = sqlx::query_scalar::<_, bool>(queries::AUCTION_EXISTS)
            .bind(product_id)
            .fetch_one(pool)
            .await?;
        if !exists {
            return Err(BidError::product_not_found(product_id));
        }

        let total = sqlx::query_scalar::<_, i64>(queries::COUNT_BIDS)
            .bind(product_id)
            .fetch_one(pool)
            .await?;
        let pagination = Pagination::new(page, limit, total);

        let data = sqlx::query_as::<_, BidHistoryItem>(queries::GET_BID_HISTORY)
            .bind(product_id)
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

        Ok(Paginated { data, pagination })
    }

    async fn highest_bid(&self, product_id: ProductId) -> Result<Option<HighestBid>, BidError> {
        let row = sqlx::query(queries::GET_HIGHEST_BID)
            .bind(product_id)
            .fetch_optional(self.db_manager.pool())
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let highest_bidder = match row.try_get::<Option<i64>, _>("user_id")? {
            Some(id) => Some(HighestBidder {
                id,
                full_name: row.try_get("full_name")?,
                positive_reviews: row.try_get("positive_reviews")?,
                negative_reviews: row.try_get("negative_reviews")?,
            }),
            None => None,
        };

        Ok(Some(HighestBid {
            current_price: row.try_get("current_price")?,
            highest_bidder,
        }))
    }
}

#[async_trait]
impl ReputationSource for PostgresAuctionStore {
    async fn reputation(
        &self,
        bidder_id: BidderId,
    ) -> Result<Option<ReputationSnapshot>, BidError> {
        let reputation = sqlx::query_as::<_, ReputationSnapshot>(queries::GET_REPUTATION)
            .bind(bidder_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(reputation)
    }
}

// endregion: --- Postgres Store
