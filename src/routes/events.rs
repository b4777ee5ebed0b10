use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use utoipa::IntoParams;

use crate::{
    auth::{require_role, verify_jwt, Role},
    errors::AuthError,
    services::events::DashboardEvent,
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(dashboard_events))
}

/// Browsers cannot set headers on a WebSocket handshake, so the token
/// travels in the query string.
#[derive(Debug, Deserialize, IntoParams)]
pub struct EventsQuery {
    pub token: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    params(EventsQuery),
    responses(
        (status = 101, description = "Switching to a WebSocket that streams dashboard events"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn dashboard_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, AuthError> {
    let token = query
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or(AuthError::MissingToken)?;
    let claims = verify_jwt(&token, &state.config.jwt_secret).map_err(|_| AuthError::InvalidToken)?;
    require_role(&claims, Role::Admin)?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let admin_id = claims.sub;
    Ok(ws.on_upgrade(move |socket| stream_events(socket, state, admin_id)))
}

async fn stream_events(socket: WebSocket, state: Arc<AppState>, admin_id: i64) {
    let mut events = state.events.subscribe();
    let (mut sender, mut receiver) = socket.split();

    info!("Dashboard socket connected for admin {}", admin_id);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let Some(frame) = encode_event(&event) else { continue };
                    if sender.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Dashboard socket for admin {} lagged, skipped {} events", admin_id, skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("Dashboard socket error for admin {}: {}", admin_id, e);
                    break;
                }
            },
        }
    }

    info!("Dashboard socket disconnected for admin {}", admin_id);
}

fn encode_event(event: &DashboardEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!("Failed to encode dashboard event {:?}: {}", event, e);
            None
        }
    }
}
