/// 입찰자 자격 검사
/// 트랜잭션 잠금을 잡기 전에 실행된다.
// region:    --- Imports
use crate::auction::model::{BidderId, ReputationSnapshot};
use crate::error::BidError;
use crate::store::ReputationSource;
use serde::{Deserialize, Serialize};

// endregion: --- Imports

pub const DEFAULT_MIN_RATING_PERCENT: f64 = 0.8;
pub const DEFAULT_MIN_RATING_REVIEWS: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub min_rating_percent: f64,
    /// 리뷰 수가 이 값을 넘을 때만 평점을 검사
    pub min_rating_reviews: i64,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_rating_percent: DEFAULT_MIN_RATING_PERCENT,
            min_rating_reviews: DEFAULT_MIN_RATING_REVIEWS,
        }
    }
}

impl EligibilityPolicy {
    pub fn check(&self, reputation: &ReputationSnapshot) -> Result<(), BidError> {
        let total = reputation.positive_reviews + reputation.negative_reviews;
        if total > self.min_rating_reviews {
            let rating = reputation.positive_reviews as f64 / total as f64;
            if rating < self.min_rating_percent {
                return Err(BidError::rating_too_low());
            }
        }
        Ok(())
    }
}

/// 평판 조회 후 정책 검사
pub async fn validate_bidder(
    reputation_source: &dyn ReputationSource,
    policy: &EligibilityPolicy,
    bidder_id: BidderId,
) -> Result<(), BidError> {
    let reputation = reputation_source
        .reputation(bidder_id)
        .await?
        .ok_or_else(|| BidError::user_not_found(bidder_id))?;
    policy.check(&reputation)
}
