// region:    --- Imports
use crate::auction::events::{AuctionEvent, ClientEvent, RejectReason};
use crate::bidding::commands::{self, BidOutcome};
use crate::broadcast::Broadcaster;
use crate::query;
use crate::registry::AuctionRegistry;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

// endregion: --- Imports

pub type AppState = (Arc<AuctionRegistry>, Arc<Broadcaster>);

// region:    --- Router

/// 라우터 설정 (HTTP 스냅샷 + WebSocket 이벤트 전송로)
pub fn app(registry: Arc<AuctionRegistry>, broadcaster: Arc<Broadcaster>) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/items", get(handle_get_items))
        .route("/items/:id", get(handle_get_item))
        .route("/ws", get(handle_ws_upgrade))
        .layer(cors)
        .with_state((registry, broadcaster))
}

// endregion: --- Router

// region:    --- Query Handlers

/// 전체 상품 스냅샷 조회
/// serverTime과 각 상품의 status는 같은 캡처 시점을 기준으로 한다
pub async fn handle_get_items(State((registry, _)): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 전체 스냅샷 조회", "HandlerQuery");
    let now = Utc::now();
    let items = query::handlers::get_all_items(&registry, now).await;
    Json(serde_json::json!({
        "serverTime": now.timestamp_millis(),
        "items": items
    }))
}

/// 상품 조회
pub async fn handle_get_item(
    State((registry, _)): State<AppState>,
    Path(item_id): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", item_id);
    match query::handlers::get_item(&registry, &item_id, Utc::now()).await {
        Some(item) => Json(item).into_response(),
        None => (
            axum::http::StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "존재하지 않는 상품입니다.",
                "code": "UNKNOWN_ITEM"
            })),
        )
            .into_response(),
    }
}

// endregion: --- Query Handlers

// region:    --- WebSocket Handler

/// WebSocket 업그레이드 처리
pub async fn handle_ws_upgrade(
    ws: WebSocketUpgrade,
    State((registry, broadcaster)): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, registry, broadcaster))
}

/// 개별 구독자 연결 처리
/// 연결 1개 = 구독자 1명 = 개인 알림 레인 1개
async fn handle_socket(
    socket: WebSocket,
    registry: Arc<AuctionRegistry>,
    broadcaster: Arc<Broadcaster>,
) {
    let conn_id = Uuid::new_v4();
    info!("{:<12} --> 구독자 연결: {}", "Socket", conn_id);

    let (mut sink, mut stream) = socket.split();
    let mut public_rx = broadcaster.subscribe();
    let mut direct_rx = broadcaster.register(conn_id);

    // 공개 브로드캐스트와 개인 알림을 하나의 소켓으로 합쳐 전달
    let send_task = tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                received = public_rx.recv() => match received {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            "{:<12} --> 느린 구독자, 이벤트 {}건 유실",
                            "Socket", skipped
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                received = direct_rx.recv() => match received {
                    Some(event) => event,
                    None => break,
                },
            };

            let payload = serde_json::to_string(&event).unwrap();
            if sink.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    // 인바운드 이벤트 처리
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(ClientEvent::BidSubmitted(cmd)) => {
                    let outcome = commands::handle_place_bid(cmd, &registry).await;
                    // 수락 이벤트는 배타 구간에서 이미 발행됨; 거절만 개인 통지
                    if let BidOutcome::Rejected { item_id, reason } = outcome {
                        info!(
                            "{:<12} --> 입찰 거절 id: {} 사유: {:?}",
                            "Socket", item_id, reason
                        );
                        broadcaster
                            .notify(conn_id, AuctionEvent::BidRejected { reason })
                            .await;
                    }
                }
                Err(e) => {
                    warn!("{:<12} --> 해석할 수 없는 메시지: {:?}", "Socket", e);
                    broadcaster
                        .notify(
                            conn_id,
                            AuctionEvent::BidRejected {
                                reason: RejectReason::InvalidBid,
                            },
                        )
                        .await;
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("{:<12} --> 소켓 오류: {:?}", "Socket", e);
                break;
            }
        }
    }

    // 연결 정리: 커밋된 상태는 유지되고 전달만 중단된다
    broadcaster.unregister(&conn_id);
    send_task.abort();
    info!("{:<12} --> 구독자 연결 종료: {}", "Socket", conn_id);
}

// endregion: --- WebSocket Handler
