// region:    --- Imports
use proxy_auction::bidding::commands::BiddingService;
use proxy_auction::config::AppConfig;
use proxy_auction::database::DatabaseManager;
use proxy_auction::handlers::{self, AppState};
use proxy_auction::store::memory::InMemoryStore;
use proxy_auction::store::{AuctionStore, PostgresAuctionStore, ReputationSource};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    // 저장소 선택: DATABASE_URL 이 있으면 Postgres, 없으면 인메모리
    let (store, reputation): (Arc<dyn AuctionStore>, Arc<dyn ReputationSource>) =
        match &config.database_url {
            Some(database_url) => {
                let db_manager =
                    Arc::new(DatabaseManager::connect(database_url, config.max_connections).await?);

                // 데이터베이스 초기화
                if let Err(e) = db_manager.initialize_database(config.reset_database).await {
                    error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                    return Err(e.into());
                }
                info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

                let store = Arc::new(PostgresAuctionStore::new(db_manager));
                (
                    store.clone() as Arc<dyn AuctionStore>,
                    store as Arc<dyn ReputationSource>,
                )
            }
            None => {
                warn!(
                    "{:<12} --> DATABASE_URL 미설정: 인메모리 저장소로 실행",
                    "Main"
                );
                let store = Arc::new(InMemoryStore::new());
                (
                    store.clone() as Arc<dyn AuctionStore>,
                    store as Arc<dyn ReputationSource>,
                )
            }
        };

    let bidding = BiddingService::new(
        store,
        reputation,
        config.eligibility,
        config.max_bid_retries,
    );
    let routes_all = handlers::router(AppState { bidding });

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
