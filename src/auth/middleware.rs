//! Authorization middleware for Axum.
//!
//! Runs the [`Authorizer`] on every HTTP request and short-circuits with a 401
//! before the handler when a check fails. The layer does not look at upgrade
//! headers: WebSocket routes are mounted outside it and authorized by their
//! [`WsGate`](super::websocket::WsGate), so a rejected client can read the
//! close reason.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use std::sync::Arc;

use super::error::AuthError;
use super::interceptor::{Authorizer, Verdict};

/// Layer with `axum::middleware::from_fn_with_state(authorizer, access_token_middleware)`.
///
/// Injects [`AuthenticatedClient`](super::AuthenticatedClient) into request
/// extensions when an access check passed.
pub async fn access_token_middleware(
    State(authorizer): State<Arc<Authorizer>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let path = request.uri().path().to_string();
    match authorizer.authorize(&path, request.headers()).await {
        Verdict::Forwarded(client) => {
            if let Some(client) = client {
                request.extensions_mut().insert(client);
            }
            Ok(next.run(request).await)
        }
        Verdict::Rejected(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedClient;
    use crate::config::AuthConfig;
    use crate::store::MemoryCredentialStore;
    use crate::token::TokenCodec;
    use axum::{
        Extension, Router, http::StatusCode, middleware::from_fn_with_state, routing::get,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let config = AuthConfig {
            master_token: Some("m".to_string()),
            cryptography_key: Some("k".to_string()),
            access_token_paths: vec!["/access".to_string()],
            ..Default::default()
        };
        let codec = Arc::new(TokenCodec::new(config.cryptography_key()));
        let authorizer = Arc::new(Authorizer::new(
            &config,
            codec,
            Arc::new(MemoryCredentialStore::new()),
        ));
        Router::new()
            .route(
                "/access/me",
                get(|client: Option<Extension<AuthenticatedClient>>| async move {
                    client.map(|Extension(c)| c.client_id).unwrap_or_default()
                }),
            )
            .route("/open", get(|| async { "ok" }))
            .layer(from_fn_with_state(authorizer, access_token_middleware))
    }

    #[tokio::test]
    async fn test_upgrade_header_does_not_bypass_checks() {
        let request = Request::builder()
            .uri("/access/me")
            .header("upgrade", "websocket")
            .header("connection", "upgrade")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_open_path_passes_through() {
        let request = Request::builder().uri("/open").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
