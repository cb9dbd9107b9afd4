//! WebSocket authorization gate.
//!
//! The decision is made before the handshake, but a rejected client still gets
//! a completed handshake: many WebSocket clients cannot observe an HTTP 401 on
//! upgrade. The gate then sends a JSON rejection, closes with 1008 (policy
//! violation), and never invokes the handler.
//!
//! Once accepted, a connection is not re-validated.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::AuthError;
use super::interceptor::{AuthenticatedClient, Authorizer, Verdict, WsRequirement};

/// How long to wait for the client's close reply after sending ours
const CLOSE_REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Status message sent over the socket.
#[derive(Debug, Serialize)]
pub struct WsStatus {
    pub status: &'static str,
    pub detail: String,
}

impl WsStatus {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            status: "success",
            detail: detail.into(),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            status: "error",
            detail: detail.into(),
        }
    }

    pub fn to_message(&self) -> Message {
        let json = serde_json::to_string(self).unwrap_or_default();
        Message::Text(json.into())
    }
}

#[derive(Clone)]
pub struct WsGate {
    authorizer: Arc<Authorizer>,
    requirement: WsRequirement,
}

impl WsGate {
    pub fn new(authorizer: Arc<Authorizer>, requirement: WsRequirement) -> Self {
        Self {
            authorizer,
            requirement,
        }
    }

    /// Authorize the handshake, then hand the socket to `handler` or reject it.
    pub async fn upgrade<F, Fut>(
        &self,
        ws: WebSocketUpgrade,
        path: &str,
        headers: &HeaderMap,
        handler: F,
    ) -> Response
    where
        F: FnOnce(WebSocket, Option<AuthenticatedClient>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        match self
            .authorizer
            .authorize_ws(self.requirement, path, headers)
            .await
        {
            Verdict::Forwarded(client) => ws.on_upgrade(move |socket| handler(socket, client)),
            Verdict::Rejected(err) => {
                warn!(path, code = err.code.name(), "WebSocket rejected");
                ws.on_upgrade(move |socket| reject(socket, err))
            }
        }
    }
}

/// Send the rejection, close with 1008, then wait briefly for the close reply.
async fn reject(mut socket: WebSocket, err: AuthError) {
    let status = WsStatus::error(format!("Disconnected: {}", err.message));
    if socket.send(status.to_message()).await.is_err() {
        debug!("Client gone before rejection was sent");
        return;
    }

    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: err.code.name().into(),
    };
    if socket.send(Message::Close(Some(frame))).await.is_err() {
        return;
    }

    let _ = tokio::time::timeout(CLOSE_REPLY_TIMEOUT, async {
        while let Some(Ok(msg)) = socket.recv().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    })
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_shape() {
        let msg = WsStatus::error("Disconnected: Unauthorized Master Token").to_message();
        match msg {
            Message::Text(text) => {
                let v: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
                assert_eq!(v["status"], "error");
                assert_eq!(v["detail"], "Disconnected: Unauthorized Master Token");
            }
            other => panic!("unexpected message {:?}", other),
        }
    }
}
