use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuctionRecord {
    pub id: String,
    pub title: String,
    pub starting_price: f64,
    pub current_bid: f64,
    pub highest_bidder: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ends_at: DateTime<Utc>,
    pub status: AuctionStatus,
}

// 경매 상태: ended는 종착 상태이며 역전이는 없다
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Active,
    Ended,
}

impl AuctionRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        starting_price: f64,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            starting_price,
            current_bid: starting_price,
            highest_bidder: None,
            ends_at,
            status: AuctionStatus::Active,
        }
    }

    /// 마감 시각이 지났으면 종료 상태로 전이
    /// 실제로 active -> ended 전이가 일어났을 때만 true를 반환한다
    pub fn close_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == AuctionStatus::Active && now >= self.ends_at {
            self.status = AuctionStatus::Ended;
            return true;
        }
        false
    }

    /// 조회 시점 기준으로 상태를 다시 계산한 사본 (원본 레코드는 변경하지 않음)
    pub fn projected(&self, now: DateTime<Utc>) -> AuctionRecord {
        let mut record = self.clone();
        record.close_if_due(now);
        record
    }
}
