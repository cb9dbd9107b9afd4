//! Demo endpoints served by the binary.
//!
//! One open route, one per credential type, and two echo sockets behind the gate.

use axum::{
    Extension, Json,
    extract::{
        OriginalUri, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::Response,
};
use serde::Serialize;
use tracing::debug;

use super::state::AppState;
use crate::auth::{AuthenticatedClient, WsGate, WsRequirement, WsStatus};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "open health",
        status: "healthy",
        client_id: None,
    })
}

/// GET /access/health
pub async fn access_health_check(
    client: Option<Extension<AuthenticatedClient>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "access health that need access token",
        status: "healthy",
        client_id: client.map(|Extension(c)| c.client_id),
    })
}

/// GET /master/health
pub async fn master_health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "master health that need master token",
        status: "healthy",
        client_id: None,
    })
}

/// GET /ws - echo socket under the path policy
pub async fn ws_echo(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    WsGate::new(state.authorizer.clone(), WsRequirement::Policy)
        .upgrade(ws, uri.path(), &headers, echo)
        .await
}

/// GET /ws/master - echo socket that always needs the master token
pub async fn ws_master_echo(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    WsGate::new(state.authorizer.clone(), WsRequirement::Master)
        .upgrade(ws, uri.path(), &headers, echo)
        .await
}

async fn echo(mut socket: WebSocket, client: Option<AuthenticatedClient>) {
    let greeting = WsStatus::success("Connected: Connection Accepted");
    if socket.send(greeting.to_message()).await.is_err() {
        return;
    }

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let reply = format!("Received query: {}", text.as_str());
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    debug!(
        client_id = client.as_ref().map(|c| c.client_id.as_str()),
        "Echo socket closed"
    );
}
