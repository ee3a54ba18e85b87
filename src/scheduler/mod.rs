/// 경매 종료 스위퍼
/// active 상태로 마감 시각을 지난 상품을 ended로 전이시키고 종료 이벤트를 발행한다
/// 입찰 경로의 지연 전이와 같은 배타 구간 규율을 쓰므로 입찰 커밋과 경합하지 않는다
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::registry::AuctionRegistry;
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Lifecycle Sweeper
/// 경매 종료 스위퍼
pub struct LifecycleSweeper {
    registry: Arc<AuctionRegistry>,
}

/// 경매 종료 스위퍼 생성
impl LifecycleSweeper {
    pub fn new(registry: Arc<AuctionRegistry>) -> Self {
        Self { registry }
    }

    /// 경매 종료 스위퍼 시작
    pub async fn start(&self) {
        let registry = Arc::clone(&self.registry);
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(1)); // 1초마다 실행
            loop {
                interval.tick().await;
                Self::sweep(&registry).await;
            }
        });
    }

    /// 전체 상품 1회 순회
    /// 실제로 전이가 일어난 상품에 대해서만 AuctionEnded를 발행한다 (상품당 1회)
    pub async fn sweep(registry: &AuctionRegistry) {
        let now = Utc::now();
        for item_id in registry.item_ids() {
            let swept = registry
                .with_exclusive(item_id, |item, outbox| {
                    if item.close_if_due(now) {
                        outbox.push(AuctionEvent::AuctionEnded {
                            item_id: item.id.clone(),
                        });
                        return true;
                    }
                    false
                })
                .await;

            match swept {
                Ok(true) => info!("{:<12} --> 경매 종료 처리 id: {}", "Sweeper", item_id),
                Ok(false) => {}
                Err(e) => error!(
                    "{:<12} --> 경매 상태 갱신 중 오류 발생 id: {} ({:?})",
                    "Sweeper", item_id, e
                ),
            }
        }
    }
}
// endregion: --- Lifecycle Sweeper
