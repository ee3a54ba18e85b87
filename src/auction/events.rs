use crate::bidding::commands::PlaceBidCommand;
use serde::{Deserialize, Serialize};

/// 서버가 내보내는 경매 이벤트 (닫힌 집합)
/// 이벤트 페이로드가 곧 와이어 계약이다
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum AuctionEvent {
    // 입찰 수락 이벤트 (전체 공개)
    #[serde(rename_all = "camelCase")]
    BidAccepted {
        item_id: String,
        current_bid: f64,
        highest_bidder: String,
    },
    // 입찰 거절 이벤트 (제출자에게만 전달)
    BidRejected { reason: RejectReason },
    // 경매 종료 이벤트 (전체 공개, 상품당 1회)
    #[serde(rename_all = "camelCase")]
    AuctionEnded { item_id: String },
}

/// 클라이언트가 보내는 이벤트
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum ClientEvent {
    // 입찰 제출
    BidSubmitted(PlaceBidCommand),
}

/// 입찰 거절 사유
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    // 존재하지 않는 상품
    UnknownItem,
    // 이미 종료된 경매
    AuctionEnded,
    // 현재 가격 이하의 입찰
    BidTooLow,
    // 배타 구간 대기 시간 초과
    Contended,
    // 검증 실패한 입력 (금액, 입찰자 토큰)
    InvalidBid,
}
