use crate::auction::model::Amount;
use thiserror::Error;

/// 입찰 엔진 오류
#[derive(Debug, Error)]
pub enum BidError {
    /// 최소 입찰가 미달, 평점 미달
    #[error("{0}")]
    Forbidden(String),

    /// 존재하지 않는 입찰자 또는 경매
    #[error("{0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 직렬화 실패 (재시도 대상)
    #[error("transaction conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl BidError {
    pub fn below_minimum(min_bid: Amount) -> Self {
        BidError::Forbidden(format!("Placed max bid price must be at least {min_bid}"))
    }

    pub fn rating_too_low() -> Self {
        BidError::Forbidden("Rating percentage is too low to place a bid".to_string())
    }

    pub fn product_not_found(product_id: i64) -> Self {
        BidError::NotFound(format!("Product {product_id} not found"))
    }

    pub fn user_not_found(bidder_id: i64) -> Self {
        BidError::NotFound(format!("User {bidder_id} not found"))
    }

    /// 응답에 실리는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            BidError::Forbidden(_) => "FORBIDDEN",
            BidError::NotFound(_) => "NOT_FOUND",
            BidError::InvalidRequest(_) => "INVALID_REQUEST",
            BidError::Conflict(_) => "MAX_RETRIES_EXCEEDED",
            BidError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, BidError::Conflict(_))
    }
}

// 40001: serialization_failure, 40P01: deadlock_detected
const RETRYABLE_SQLSTATES: [&str; 2] = ["40001", "40P01"];

impl From<sqlx::Error> for BidError {
    fn from(e: sqlx::Error) -> Self {
        let retryable = e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| RETRYABLE_SQLSTATES.iter().any(|state| *state == code));
        if retryable {
            BidError::Conflict(e.to_string())
        } else {
            BidError::Database(e)
        }
    }
}
