// region:    --- Imports
use crate::auction::model::NewAuction;
use crate::bidding::commands::{BiddingService, PlaceBidCommand};
use crate::error::BidError;
use crate::query;
use crate::query::handlers::{DEFAULT_LIMIT, DEFAULT_PAGE};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- App State
#[derive(Clone)]
pub struct AppState {
    pub bidding: BiddingService,
}

/// 라우터 설정
pub fn router(state: AppState) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/bid", post(handle_bid))
        .route("/auction", post(handle_create_auction))
        .route("/auction/:id", get(handle_get_auction_state))
        .route(
            "/auction/:id/highest-bid",
            get(handle_get_highest_bid),
        )
        .route("/auction/:id/bids", get(handle_get_bid_history))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

// endregion: --- App State

// region:    --- Error Response
impl IntoResponse for BidError {
    fn into_response(self) -> Response {
        let status = match &self {
            BidError::Forbidden(_) => StatusCode::FORBIDDEN,
            BidError::NotFound(_) => StatusCode::NOT_FOUND,
            BidError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BidError::Conflict(_) => StatusCode::CONFLICT,
            BidError::Database(e) => {
                error!("{:<12} --> 데이터베이스 오류: {:?}", "Handler", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(serde_json::json!({
                "success": false,
                "error": self.to_string(),
                "code": self.code(),
            })),
        )
            .into_response()
    }
}

fn rejected(rejection: JsonRejection) -> BidError {
    BidError::InvalidRequest(rejection.body_text())
}

// endregion: --- Error Response

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    payload: Result<Json<PlaceBidCommand>, JsonRejection>,
) -> Result<impl IntoResponse, BidError> {
    let Json(cmd) = payload.map_err(rejected)?;
    info!("{:<12} --> 입찰 요청: {:?}", "Handler", cmd);

    let placed = state.bidding.handle_place_bid(cmd).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Bid placed successfully",
        "current_price": placed.auction.current_price,
        "is_leader": placed.auction.highest_bidder_id == Some(cmd.bidder_id),
    })))
}

/// 경매 생성 (상품 등록 시 호출)
pub async fn handle_create_auction(
    State(state): State<AppState>,
    payload: Result<Json<NewAuction>, JsonRejection>,
) -> Result<impl IntoResponse, BidError> {
    let Json(new_auction) = payload.map_err(rejected)?;
    info!("{:<12} --> 경매 생성 요청: {:?}", "Handler", new_auction);

    let auction = state.bidding.store().create_auction(new_auction).await?;
    Ok((StatusCode::CREATED, Json(auction)))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// 경매 상태 조회
pub async fn handle_get_auction_state(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, BidError> {
    info!("{:<12} --> 경매 상태 조회 id: {}", "HandlerQuery", product_id);
    let auction =
        query::handlers::get_auction_state(state.bidding.store().as_ref(), product_id).await?;
    Ok(Json(auction))
}

/// 최고 입찰가 조회
pub async fn handle_get_highest_bid(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, BidError> {
    info!(
        "{:<12} --> 최고 입찰가 조회 id: {}",
        "HandlerQuery", product_id
    );
    let highest =
        query::handlers::get_highest_bid(state.bidding.store().as_ref(), product_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": highest,
    })))
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, BidError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", product_id);
    let history = query::handlers::get_bid_history(
        state.bidding.store().as_ref(),
        product_id,
        params.page.unwrap_or(DEFAULT_PAGE),
        params.limit.unwrap_or(DEFAULT_LIMIT),
    )
    .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": history.data,
        "pagination": history.pagination,
    })))
}

// endregion: --- Query Handlers
