// region:    --- Imports
use crate::broadcast::Broadcaster;
use crate::registry::AuctionRegistry;
use crate::scheduler::LifecycleSweeper;
use chrono::Utc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Modules
mod auction;
mod bidding;
mod broadcast;
mod handlers;
mod query;
mod registry;
mod scheduler;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 브로드캐스트 채널 생성
    let broadcaster = Arc::new(Broadcaster::new());

    // 레지스트리 생성 (시드 상품 등록)
    let seed = registry::seed_auctions(Utc::now());
    info!("{:<12} --> 경매 레지스트리 초기화: 상품 {}개", "Main", seed.len());
    let registry = Arc::new(AuctionRegistry::new(seed, Arc::clone(&broadcaster)));

    // 경매 종료 스위퍼 시작
    let sweeper = LifecycleSweeper::new(Arc::clone(&registry));
    sweeper.start().await;

    // 라우터 설정
    let routes_all = handlers::app(Arc::clone(&registry), Arc::clone(&broadcaster));

    // 리스너 생성 (기본은 3000번 포트)
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr).await.unwrap();
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr().unwrap()
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
