// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::bidding::model::AuctionRecord;
use crate::broadcast::Broadcaster;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time;

// endregion: --- Imports

// region:    --- Registry Error

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown auction item")]
    UnknownItem,
    #[error("timed out waiting for the item's exclusive section")]
    Contended,
}

// endregion: --- Registry Error

// region:    --- Auction Registry

/// 배타 구간 획득 대기 상한
/// 임계 구역은 I/O 없이 짧게 끝나므로 정상 운영에서는 도달하지 않는다
pub const EXCLUSIVE_WAIT: time::Duration = time::Duration::from_secs(2);

/// 경매 상태의 단독 소유자
/// 상품 목록은 기동 시 시드로 고정되고, 변경은 상품별 배타 구간을 통해서만 일어난다
pub struct AuctionRegistry {
    items: HashMap<String, Mutex<AuctionRecord>>,
    // 시드 등록 순서 (목록 응답의 정렬 기준)
    order: Vec<String>,
    channel: Arc<Broadcaster>,
}

/// AuctionRegistry 구현
impl AuctionRegistry {
    pub fn new(seed: Vec<AuctionRecord>, channel: Arc<Broadcaster>) -> Self {
        let mut items = HashMap::with_capacity(seed.len());
        let mut order = Vec::with_capacity(seed.len());
        for record in seed {
            order.push(record.id.clone());
            items.insert(record.id.clone(), Mutex::new(record));
        }
        Self {
            items,
            order,
            channel,
        }
    }

    /// 상품 1건 조회 (조회 시점 기준 상태로 투영한 사본)
    pub async fn get(&self, item_id: &str, now: DateTime<Utc>) -> Option<AuctionRecord> {
        let slot = self.items.get(item_id)?;
        let record = slot.lock().await;
        Some(record.projected(now))
    }

    /// 상품별 배타 구간에서 클로저 실행
    ///
    /// 클로저는 전달받은 레코드 변경과 outbox 적재 외의 부수 효과를 가지면 안 된다.
    /// outbox에 쌓인 이벤트는 구간이 해제되기 전에 채널로 들어가므로
    /// 같은 상품의 이벤트는 항상 커밋 순서대로 구독자에게 도달한다.
    /// (채널 적재는 유한한 메모리 연산이고, 소켓 I/O는 구독자 측 태스크가 수행한다)
    pub async fn with_exclusive<F, R>(&self, item_id: &str, f: F) -> Result<R, RegistryError>
    where
        F: FnOnce(&mut AuctionRecord, &mut Vec<AuctionEvent>) -> R,
    {
        let slot = self.items.get(item_id).ok_or(RegistryError::UnknownItem)?;
        let mut record = time::timeout(EXCLUSIVE_WAIT, slot.lock())
            .await
            .map_err(|_| RegistryError::Contended)?;

        let mut outbox = Vec::new();
        let result = f(&mut record, &mut outbox);

        for event in outbox {
            self.channel.publish(event);
        }
        Ok(result)
    }

    /// 전체 상품 스냅샷 (시드 순서, 캡처 시점 기준 상태)
    pub async fn snapshot(&self, now: DateTime<Utc>) -> Vec<AuctionRecord> {
        let mut records = Vec::with_capacity(self.order.len());
        for item_id in &self.order {
            if let Some(slot) = self.items.get(item_id) {
                let record = slot.lock().await;
                records.push(record.projected(now));
            }
        }
        records
    }

    /// 등록된 상품 id 목록 (시드 순서)
    pub fn item_ids(&self) -> &[String] {
        &self.order
    }
}

// endregion: --- Auction Registry

// region:    --- Seed

/// 기동 시 등록되는 시드 상품
pub fn seed_auctions(now: DateTime<Utc>) -> Vec<AuctionRecord> {
    vec![
        AuctionRecord::new("1", "MacBook Pro", 10.0, now + Duration::minutes(60)),
        AuctionRecord::new("2", "Internship Stipend", 300.0, now + Duration::minutes(10)),
        AuctionRecord::new("3", "Sony Wireless Headphones", 20.0, now + Duration::seconds(90)),
    ]
}

// endregion: --- Seed
