/// 입찰 중재 커맨드 처리
/// 같은 상품의 입찰은 레지스트리의 배타 구간에서 완전히 직렬화되며,
/// 진행 중인 입찰 뒤에 도착한 입찰은 커밋 이후의 최신 상태로 재평가된다
// region:    --- Imports
use crate::auction::events::{AuctionEvent, RejectReason};
use crate::bidding::model::AuctionStatus;
use crate::registry::{AuctionRegistry, RegistryError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidCommand {
    pub item_id: String,
    pub amount: f64,
    pub bidder_id: String,
}

/// 중재 결과
#[derive(Debug, Clone, PartialEq)]
pub enum BidOutcome {
    Accepted {
        item_id: String,
        new_current_bid: f64,
        highest_bidder: String,
    },
    Rejected {
        item_id: String,
        reason: RejectReason,
    },
}

/// 입찰 처리
pub async fn handle_place_bid(cmd: PlaceBidCommand, registry: &AuctionRegistry) -> BidOutcome {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    // 입력 검증: 유한한 양수 금액, 비어 있지 않은 입찰자 토큰
    if !cmd.amount.is_finite() || cmd.amount <= 0.0 || cmd.bidder_id.trim().is_empty() {
        return BidOutcome::Rejected {
            item_id: cmd.item_id,
            reason: RejectReason::InvalidBid,
        };
    }

    let PlaceBidCommand {
        item_id,
        amount,
        bidder_id,
    } = cmd;

    let result = registry
        .with_exclusive(&item_id, |item, outbox| {
            let now = Utc::now();

            // 배타 구간 안에서 마감 재확인 (지연 전이, 전이 시에만 종료 이벤트 발행)
            if item.close_if_due(now) {
                outbox.push(AuctionEvent::AuctionEnded {
                    item_id: item.id.clone(),
                });
            }

            if item.status == AuctionStatus::Ended {
                return BidOutcome::Rejected {
                    item_id: item.id.clone(),
                    reason: RejectReason::AuctionEnded,
                };
            }

            // 현재 가격과 같은 금액은 이기지 못한다 (초과해야 함)
            if amount <= item.current_bid {
                return BidOutcome::Rejected {
                    item_id: item.id.clone(),
                    reason: RejectReason::BidTooLow,
                };
            }

            // 커밋
            item.current_bid = amount;
            item.highest_bidder = Some(bidder_id.clone());
            outbox.push(AuctionEvent::BidAccepted {
                item_id: item.id.clone(),
                current_bid: amount,
                highest_bidder: bidder_id.clone(),
            });

            BidOutcome::Accepted {
                item_id: item.id.clone(),
                new_current_bid: amount,
                highest_bidder: bidder_id.clone(),
            }
        })
        .await;

    match result {
        Ok(outcome) => {
            if let BidOutcome::Accepted {
                item_id,
                new_current_bid,
                ..
            } = &outcome
            {
                info!(
                    "{:<12} --> 입찰 수락 id: {} 현재가: {}",
                    "Command", item_id, new_current_bid
                );
            }
            outcome
        }
        Err(RegistryError::UnknownItem) => BidOutcome::Rejected {
            item_id,
            reason: RejectReason::UnknownItem,
        },
        Err(RegistryError::Contended) => BidOutcome::Rejected {
            item_id,
            reason: RejectReason::Contended,
        },
    }
}

// endregion: --- Commands
