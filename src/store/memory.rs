/// 인메모리 경매 저장소
/// 단일 프로세스 전용. 상품별 쓰기 잠금이 Postgres 의 행 잠금 역할을 한다.
/// 조회는 커밋된 상태만 읽으므로 쓰기 잠금을 기다리지 않는다.
// region:    --- Imports
use super::{validate_new_auction, AuctionStore, AuctionTx, ReputationSource};
use crate::auction::model::{
    Amount, Auction, AuctionSnapshot, BidHistoryItem, BidRecord, BidderId, HighestBid,
    HighestBidder, NewAuction, Paginated, Pagination, ProductId, ReputationSnapshot,
};
use crate::auction::outcome::BidOutcome;
use crate::error::BidError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

// endregion: --- Imports

// region:    --- Rows
#[derive(Debug, Clone)]
struct BidderRow {
    full_name: String,
    reputation: ReputationSnapshot,
}

#[derive(Debug)]
struct AuctionRows {
    auction: Auction,
    ceilings: HashMap<BidderId, Amount>,
    // 오래된 순
    bids: Vec<BidRecord>,
}

impl AuctionRows {
    fn apply(&mut self, outcome: &BidOutcome) {
        let now = Utc::now();
        if let Some(update) = outcome.auction_update() {
            self.auction.current_price = update.current_price;
            self.auction.highest_bidder_id = Some(update.highest_bidder_id);
            self.auction.bid_count += 1;
        }
        if let Some(entry) = outcome.ledger_entry() {
            self.bids.push(BidRecord {
                product_id: self.auction.product_id,
                bidder_id: entry.bidder_id,
                amount: entry.amount,
                created_at: now,
            });
        }
        if let Some(write) = outcome.ceiling_write() {
            let stored = self
                .ceilings
                .entry(write.bidder_id)
                .or_insert(write.max_amount);
            *stored = (*stored).max(write.max_amount);
        }
    }
}

struct AuctionSlot {
    writer: Arc<Mutex<()>>,
    rows: RwLock<AuctionRows>,
}

// endregion: --- Rows

// region:    --- In-Memory Store
#[derive(Default)]
pub struct InMemoryStore {
    auctions: RwLock<HashMap<ProductId, Arc<AuctionSlot>>>,
    bidders: RwLock<HashMap<BidderId, BidderRow>>,
    next_product_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 입찰자 등록 (사용자 관리 서비스 대용)
    pub async fn register_bidder(
        &self,
        bidder_id: BidderId,
        full_name: impl Into<String>,
        positive_reviews: i64,
        negative_reviews: i64,
    ) {
        self.bidders.write().await.insert(
            bidder_id,
            BidderRow {
                full_name: full_name.into(),
                reputation: ReputationSnapshot {
                    positive_reviews,
                    negative_reviews,
                },
            },
        );
    }

    async fn slot(&self, product_id: ProductId) -> Result<Arc<AuctionSlot>, BidError> {
        self.auctions
            .read()
            .await
            .get(&product_id)
            .cloned()
            .ok_or_else(|| BidError::product_not_found(product_id))
    }

    async fn display_name(&self, bidder_id: BidderId) -> String {
        self.bidders
            .read()
            .await
            .get(&bidder_id)
            .map(|row| row.full_name.clone())
            .unwrap_or_else(|| bidder_id.to_string())
    }
}

/// 인메모리 잠금 트랜잭션
/// 반영 내용은 commit 시점에 한 번에 적용된다.
pub struct InMemoryAuctionTx {
    slot: Arc<AuctionSlot>,
    _writer: OwnedMutexGuard<()>,
    staged: Vec<BidOutcome>,
}

#[async_trait]
impl AuctionTx for InMemoryAuctionTx {
    async fn snapshot(&mut self) -> Result<AuctionSnapshot, BidError> {
        let rows = self.slot.rows.read().await;
        let mut auction = rows.auction.clone();
        for outcome in &self.staged {
            if let Some(update) = outcome.auction_update() {
                auction.current_price = update.current_price;
                auction.highest_bidder_id = Some(update.highest_bidder_id);
                auction.bid_count += 1;
            }
        }
        drop(rows);

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
        let committed = self.slot.rows.read().await.ceilings.get(&bidder_id).copied();
        let staged = self
            .staged
            .iter()
            .filter_map(BidOutcome::ceiling_write)
            .filter(|write| write.bidder_id == bidder_id)
            .map(|write| write.max_amount)
            .max();
        Ok(committed.max(staged))
    }

    async fn apply(&mut self, outcome: &BidOutcome) -> Result<(), BidError> {
        self.staged.push(outcome.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), BidError> {
        let mut rows = self.slot.rows.write().await;
        for outcome in &self.staged {
            rows.apply(outcome);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), BidError> {
        Ok(())
    }
}

#[async_trait]
impl AuctionStore for InMemoryStore {
    async fn begin(&self, product_id: ProductId) -> Result<Box<dyn AuctionTx>, BidError> {
        let slot = self.slot(product_id).await?;
        let writer = Arc::clone(&slot.writer).lock_owned().await;
        Ok(Box::new(InMemoryAuctionTx {
            slot,
            _writer: writer,
            staged: Vec::new(),
        }))
    }

    async fn create_auction(&self, new_auction: NewAuction) -> Result<Auction, BidError> {
        validate_new_auction(&new_auction)?;
        let mut auctions = self.auctions.write().await;

        let product_id = match new_auction.product_id {
            Some(product_id) => product_id,
            None => loop {
                let candidate = self.next_product_id.fetch_add(1, Ordering::SeqCst) + 1;
                if !auctions.contains_key(&candidate) {
                    break candidate;
                }
            },
        };
        if auctions.contains_key(&product_id) {
            return Err(BidError::InvalidRequest(format!(
                "product {product_id} already has an auction"
            )));
        }

        let auction = Auction {
            product_id,
            start_price: new_auction.start_price,
            step_price: new_auction.step_price,
            // 첫 입찰 전에는 0, 최소 입찰가는 시작가가 된다
            current_price: 0,
            highest_bidder_id: None,
            bid_count: 0,
        };
        auctions.insert(
            product_id,
            Arc::new(AuctionSlot {
                writer: Arc::new(Mutex::new(())),
                rows: RwLock::new(AuctionRows {
                    auction: auction.clone(),
                    ceilings: HashMap::new(),
                    bids: Vec::new(),
                }),
            }),
        );
        Ok(auction)
    }

    async fn auction(&self, product_id: ProductId) -> Result<Option<Auction>, BidError> {
        let Ok(slot) = self.slot(product_id).await else {
            return Ok(None);
        };
        let auction = slot.rows.read().await.auction.clone();
        Ok(Some(auction))
    }

    async fn ceiling(
        &self,
        product_id: ProductId,
        bidder_id: BidderId,
    ) -> Result<Option<Amount>, BidError> {
        let Ok(slot) = self.slot(product_id).await else {
            return Ok(None);
        };
        let max_amount = slot.rows.read().await.ceilings.get(&bidder_id).copied();
        Ok(max_amount)
    }

    async fn bid_history(
        &self,
        product_id: ProductId,
        page: i64,
        limit: i64,
    ) -> Result<Paginated<BidHistoryItem>, BidError> {
        let slot = self.slot(product_id).await?;
        let (records, total) = {
            let rows = slot.rows.read().await;
            let total = rows.bids.len() as i64;
            let pagination = Pagination::new(page, limit, total);
            let records: Vec<BidRecord> = rows
                .bids
                .iter()
                .rev()
                .skip(pagination.offset().max(0) as usize)
                .take(pagination.limit.max(0) as usize)
                .cloned()
                .collect();
            (records, total)
        };

        let mut data = Vec::with_capacity(records.len());
        for record in records {
            data.push(BidHistoryItem {
                created_at: record.created_at,
                bidder_name: self.display_name(record.bidder_id).await,
                amount: record.amount,
            });
        }

        Ok(Paginated {
            data,
            pagination: Pagination::new(page, limit, total),
        })
    }

    async fn highest_bid(&self, product_id: ProductId) -> Result<Option<HighestBid>, BidError> {
        let Some(auction) = self.auction(product_id).await? else {
            return Ok(None);
        };

        let highest_bidder = match auction.highest_bidder_id {
            Some(id) => self.bidders.read().await.get(&id).map(|row| HighestBidder {
                id,
                full_name: row.full_name.clone(),
                positive_reviews: row.reputation.positive_reviews,
                negative_reviews: row.reputation.negative_reviews,
            }),
            None => None,
        };

        Ok(Some(HighestBid {
            current_price: auction.current_price,
            highest_bidder,
        }))
    }
}

#[async_trait]
impl ReputationSource for InMemoryStore {
    async fn reputation(
        &self,
        bidder_id: BidderId,
    ) -> Result<Option<ReputationSnapshot>, BidError> {
        Ok(self
            .bidders
            .read()
            .await
            .get(&bidder_id)
            .map(|row| row.reputation))
    }
}

// endregion: --- In-Memory Store
