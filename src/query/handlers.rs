// region:    --- Imports
use crate::bidding::model::AuctionRecord;
use crate::registry::AuctionRegistry;
use chrono::{DateTime, Utc};
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 모든 상품 조회
/// 상태는 캡처 시점 기준으로 다시 계산된다; 마감이 지난 상품이 active로 보이는 일은 없다
pub async fn get_all_items(registry: &AuctionRegistry, now: DateTime<Utc>) -> Vec<AuctionRecord> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    registry.snapshot(now).await
}

/// 상품 조회
pub async fn get_item(
    registry: &AuctionRegistry,
    item_id: &str,
    now: DateTime<Utc>,
) -> Option<AuctionRecord> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", item_id);
    registry.get(item_id, now).await
}

// endregion: --- Query Handlers
