/// 입찰 커맨드 처리
/// 자격 검사 -> 잠금 스냅샷 -> 결과 계산 -> 커밋
// region:    --- Imports
use super::eligibility::{validate_bidder, EligibilityPolicy};
use super::resolver::resolve_bid;
use crate::auction::model::{Amount, Auction, BidderId, ProductId};
use crate::auction::outcome::BidOutcome;
use crate::error::BidError;
use crate::store::{AuctionStore, AuctionTx, ReputationSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령 (max_amount 는 비공개 자동 입찰 상한)
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct PlaceBidCommand {
    pub product_id: ProductId,
    pub bidder_id: BidderId,
    pub max_amount: Amount,
}

impl PlaceBidCommand {
    pub fn validate(&self) -> Result<(), BidError> {
        if self.product_id <= 0 {
            return Err(BidError::InvalidRequest(
                "product_id must be positive".to_string(),
            ));
        }
        if self.bidder_id <= 0 {
            return Err(BidError::InvalidRequest(
                "bidder_id must be positive".to_string(),
            ));
        }
        if self.max_amount <= 0 {
            return Err(BidError::InvalidRequest(
                "max_amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// 커밋된 입찰 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedBid {
    pub outcome: BidOutcome,
    /// 커밋 직후 경매 상태
    pub auction: Auction,
}

#[derive(Clone)]
pub struct BiddingService {
    store: Arc<dyn AuctionStore>,
    reputation: Arc<dyn ReputationSource>,
    policy: EligibilityPolicy,
    max_retries: u32,
}

impl BiddingService {
    pub fn new(
        store: Arc<dyn AuctionStore>,
        reputation: Arc<dyn ReputationSource>,
        policy: EligibilityPolicy,
        max_retries: u32,
    ) -> Self {
        Self {
            store,
            reputation,
            policy,
            max_retries,
        }
    }

    pub fn store(&self) -> &Arc<dyn AuctionStore> {
        &self.store
    }

    /// 입찰
    /// 직렬화 충돌만 새 스냅샷에서 재시도하고, 나머지 오류는 그대로 돌려준다.
    pub async fn handle_place_bid(&self, cmd: PlaceBidCommand) -> Result<PlacedBid, BidError> {
        info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
        cmd.validate()?;

        // 잠금 전에 자격 검사
        validate_bidder(self.reputation.as_ref(), &self.policy, cmd.bidder_id).await?;

        let max_retries = self.max_retries.max(1);
        let mut retries = 0;

        while retries < max_retries {
            match self.try_place_bid(&cmd).await {
                Err(e) if e.is_retryable() => {
                    warn!(
                        "{:<12} --> 트랜잭션 충돌로 재시도 ({}/{}): {}",
                        "Command",
                        retries + 1,
                        max_retries,
                        e
                    );
                    retries += 1;
                }
                Ok(placed) => {
                    info!(
                        "{:<12} --> 입찰 처리 완료: {} product_id={}, current_price={}",
                        "Command",
                        placed.outcome.kind(),
                        placed.auction.product_id,
                        placed.auction.current_price
                    );
                    return Ok(placed);
                }
                Err(e) => return Err(e),
            }
        }

        Err(BidError::Conflict(format!(
            "bid on product {} could not be serialized after {} attempts",
            cmd.product_id, max_retries
        )))
    }

    async fn try_place_bid(&self, cmd: &PlaceBidCommand) -> Result<PlacedBid, BidError> {
        let mut tx = self.store.begin(cmd.product_id).await?;

        match resolve_and_stage(tx.as_mut(), cmd).await {
            Ok(placed) => {
                tx.commit().await?;
                Ok(placed)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(
                        "{:<12} --> 롤백 실패: {}",
                        "Command", rollback_err
                    );
                }
                Err(e)
            }
        }
    }
}

/// 트랜잭션 안에서 스냅샷을 읽고 결과를 반영
async fn resolve_and_stage(
    tx: &mut dyn AuctionTx,
    cmd: &PlaceBidCommand,
) -> Result<PlacedBid, BidError> {
    let snapshot = tx.snapshot().await?;

    let prior_ceiling = if snapshot.auction.highest_bidder_id == Some(cmd.bidder_id) {
        snapshot.leader_ceiling
    } else {
        tx.ceiling(cmd.bidder_id).await?
    };

    let outcome = resolve_bid(&snapshot, cmd.bidder_id, cmd.max_amount, prior_ceiling)?;

    if !outcome.is_noop() {
        tx.apply(&outcome).await?;
    }

    let mut auction = snapshot.auction;
    if let Some(update) = outcome.auction_update() {
        auction.current_price = update.current_price;
        auction.highest_bidder_id = Some(update.highest_bidder_id);
        auction.bid_count += 1;
    }

    Ok(PlacedBid { outcome, auction })
}

// endregion: --- Commands
