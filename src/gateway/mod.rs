pub mod handlers;
pub mod state;

use anyhow::Context;
use axum::{Router, middleware::from_fn_with_state, routing::get};
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::access_token_middleware;
use crate::config::GatewayConfig;
use crate::issuance;
use state::AppState;

/// Mount the issuance routes next to `app_routes` behind the authorization
/// middleware, then merge `ws_routes` outside it.
///
/// WebSocket routes are authorized by their [`WsGate`](crate::auth::WsGate) so a
/// rejected client still gets the close frame; every other route goes through
/// the middleware whatever headers it carries.
pub fn build_router(state: &AppState, app_routes: Router, ws_routes: Router) -> Router {
    let prefix = state.token_route_prefix.trim_end_matches('/');
    let token_routes = issuance::routes(state.tokens.clone());

    let router = if prefix.is_empty() {
        Router::new().merge(token_routes)
    } else {
        Router::new().nest(prefix, token_routes)
    };

    router
        .merge(app_routes)
        .layer(from_fn_with_state(
            state.authorizer.clone(),
            access_token_middleware,
        ))
        .merge(ws_routes)
}

/// Demo HTTP routes served by the binary.
pub fn demo_routes() -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/access/health", get(handlers::access_health_check))
        .route("/master/health", get(handlers::master_health_check))
}

/// Demo echo sockets, each behind its own gate.
pub fn demo_ws_routes(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(handlers::ws_echo))
        .route("/ws/master", get(handlers::ws_master_echo))
        .with_state(state)
}

/// Start HTTP Gateway server
pub async fn run_server(config: &GatewayConfig, app: Router) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Gateway listening on http://{}", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
