// region:    --- Imports
use crate::auction::events::AuctionEvent;
use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Broadcaster

// 공개 채널 버퍼: 느린 구독자는 밀린 만큼 이벤트를 유실한다 (스냅샷으로 복구)
const PUBLIC_CAPACITY: usize = 256;
// 구독자별 개인 알림 레인 버퍼
const DIRECT_CAPACITY: usize = 32;

/// 경매 이벤트 팬아웃 채널
/// 수락/종료 이벤트는 전체 구독자에게, 거절 통지는 제출자에게만 전달한다
pub struct Broadcaster {
    public_tx: broadcast::Sender<AuctionEvent>,
    direct: DashMap<Uuid, mpsc::Sender<AuctionEvent>>,
}

/// Broadcaster 구현
impl Broadcaster {
    pub fn new() -> Self {
        let (public_tx, _) = broadcast::channel(PUBLIC_CAPACITY);
        Self {
            public_tx,
            direct: DashMap::new(),
        }
    }

    /// 공개 이벤트 스트림 구독
    /// 구독 이후의 이벤트만 전달된다; 과거 상태는 스냅샷으로 받는다
    pub fn subscribe(&self) -> broadcast::Receiver<AuctionEvent> {
        self.public_tx.subscribe()
    }

    /// 현재 구독자 전원에게 이벤트 발행
    pub fn publish(&self, event: AuctionEvent) {
        // 구독자가 없으면 send가 실패하지만 오류가 아니다
        if let Err(e) = self.public_tx.send(event) {
            debug!("{:<12} --> 구독자 없음, 이벤트 폐기: {:?}", "Broadcast", e.0);
        }
    }

    /// 개인 알림 레인 등록 (연결당 1개)
    pub fn register(&self, conn_id: Uuid) -> mpsc::Receiver<AuctionEvent> {
        let (tx, rx) = mpsc::channel(DIRECT_CAPACITY);
        self.direct.insert(conn_id, tx);
        rx
    }

    /// 개인 알림 레인 해제
    pub fn unregister(&self, conn_id: &Uuid) {
        self.direct.remove(conn_id);
    }

    /// 특정 구독자에게만 이벤트 전달 (입찰 거절 통지 전용)
    pub async fn notify(&self, conn_id: Uuid, event: AuctionEvent) {
        // DashMap 가드를 await 경계 너머로 들고 가지 않는다
        let sender = self.direct.get(&conn_id).map(|entry| entry.value().clone());
        match sender {
            Some(tx) => {
                if tx.send(event).await.is_err() {
                    debug!("{:<12} --> 구독자 이탈, 통지 폐기: {}", "Broadcast", conn_id);
                }
            }
            None => debug!("{:<12} --> 미등록 구독자: {}", "Broadcast", conn_id),
        }
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

// endregion: --- Broadcaster
