mod common;

use axum::http::StatusCode;
use common::*;
use proxy_auction::handlers::{self, AppState};
use proxy_auction::store::memory::InMemoryStore;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// 임시 포트에 서버 실행 후 주소 반환
async fn spawn_server(store: Arc<InMemoryStore>) -> String {
    init_tracing();
    let app = handlers::router(AppState {
        bidding: service(store),
    });
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("리스너 생성 실패");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

async fn create_auction(client: &Client, base: &str, start_price: i64, step_price: i64) -> i64 {
    let response = client
        .post(format!("{base}/auction"))
        .json(&json!({ "start_price": start_price, "step_price": step_price }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    body["product_id"].as_i64().unwrap()
}

async fn place_bid(client: &Client, base: &str, product_id: i64, bidder_id: i64, max_amount: i64) -> (StatusCode, Value) {
    let response = client
        .post(format!("{base}/bid"))
        .json(&json!({
            "product_id": product_id,
            "bidder_id": bidder_id,
            "max_amount": max_amount
        }))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.json().await.unwrap())
}

/// 입찰 시나리오 테스트
#[tokio::test]
async fn test_place_bid_flow() {
    let base = spawn_server(seeded_store().await).await;
    let client = Client::new();
    let id = create_auction(&client, &base, 100, 10).await;

    let (status, body) = place_bid(&client, &base, id, ALICE, 150).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_price"], 100);
    assert_eq!(body["is_leader"], true);

    let (status, body) = place_bid(&client, &base, id, BOB, 130).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_price"], 130);
    assert_eq!(body["is_leader"], false);

    let (status, body) = place_bid(&client, &base, id, CAROL, 200).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_price"], 160);
    assert_eq!(body["is_leader"], true);

    // 경매 상태
    let state: Value = client
        .get(format!("{base}/auction/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["current_price"], 160);
    assert_eq!(state["highest_bidder_id"], CAROL);
    assert_eq!(state["bid_count"], 3);
    assert!(state.get("max_amount").is_none());

    // 최고 입찰자
    let highest: Value = client
        .get(format!("{base}/auction/{id}/highest-bid"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(highest["data"]["current_price"], 160);
    assert_eq!(highest["data"]["highest_bidder"]["full_name"], "****Pham");

    // 입찰 이력
    let history: Value = client
        .get(format!("{base}/auction/{id}/bids?page=1&limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["data"].as_array().unwrap().len(), 2);
    assert_eq!(history["data"][0]["amount"], 160);
    assert_eq!(history["data"][0]["bidder_name"], "****Pham");
    assert_eq!(history["pagination"]["total"], 3);
    assert_eq!(history["pagination"]["total_pages"], 2);
}

/// 오류 응답 테스트
#[tokio::test]
async fn test_error_responses() {
    let base = spawn_server(seeded_store().await).await;
    let client = Client::new();
    let id = create_auction(&client, &base, 100, 10).await;

    let (status, body) = place_bid(&client, &base, id, ALICE, 99).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = place_bid(&client, &base, id, GRUMPY, 500).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, body) = place_bid(&client, &base, 9999, ALICE, 500).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = place_bid(&client, &base, id, ALICE, -5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    // 필드 누락
    let response = client
        .post(format!("{base}/bid"))
        .json(&json!({ "product_id": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{base}/auction/{id}/bids?limit=500"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{base}/auction/9999/highest-bid"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // 거절된 입찰 후 상태 불변
    let state: Value = client
        .get(format!("{base}/auction/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["bid_count"], 0);
    assert_eq!(state["current_price"], 0);
    assert!(state["highest_bidder_id"].is_null());
}

/// 동시성 입찰 테스트
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bidding_over_http() {
    let store = Arc::new(InMemoryStore::new());
    for i in 1..=50 {
        store
            .register_bidder(i, format!("Concurrent Bidder {i}"), 1, 0)
            .await;
    }
    let base = spawn_server(store.clone()).await;
    let client = Client::new();
    let id = create_auction(&client, &base, 10000, 1000).await;

    // 50개의 동시 입찰, 상한은 모두 다름
    let mut handles = vec![];
    for i in 1..=50_i64 {
        let client = client.clone();
        let base = base.clone();
        handles.push(tokio::spawn(async move {
            place_bid(&client, &base, id, i, 10000 + i * 1000).await
        }));
    }

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert!(
            status == StatusCode::OK || status == StatusCode::FORBIDDEN,
            "unexpected response: {status} {body}"
        );
    }

    // 최고 상한(60000)을 낸 입찰자가 이기고, 가격은 두 번째 상한 + 호가를 넘지 않는다
    let state: Value = client
        .get(format!("{base}/auction/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["highest_bidder_id"], 50);
    let current_price = state["current_price"].as_i64().unwrap();
    assert!(current_price <= 60000);
    assert!(current_price >= 10000);

    let history: Value = client
        .get(format!("{base}/auction/{id}/bids?limit=100"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["pagination"]["total"], state["bid_count"]);
}
