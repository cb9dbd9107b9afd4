//! Issuance and access checks backed by an external credential store stub.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
};
use dashmap::DashMap;
use serde_json::{Value, json};
use tower::ServiceExt;

use tokengate::config::AuthConfig;
use tokengate::gateway::{build_router, demo_routes, demo_ws_routes, state::AppState};

const MASTER: &str = "store-master";

type Db = Arc<DashMap<String, Value>>;

async fn get_token(
    State(db): State<Db>,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let client_id = q.get("client_id").cloned().unwrap_or_default();
    match db.get(&client_id) {
        Some(v) => (StatusCode::OK, Json(json!({ "data": v.value().clone() }))),
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "not found" }))),
    }
}

async fn post_token(
    State(db): State<Db>,
    Query(q): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> StatusCode {
    let client_id = q.get("client_id").cloned().unwrap_or_default();
    db.insert(client_id, body["data"].clone());
    StatusCode::OK
}

async fn spawn_store() -> (String, Db) {
    let db: Db = Arc::new(DashMap::new());
    let app = Router::new()
        .route("/api/token", get(get_token).post(post_token))
        .with_state(db.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/api", addr), db)
}

fn config_for(base: &str) -> AuthConfig {
    AuthConfig {
        master_token: Some(MASTER.to_string()),
        cryptography_key: Some("store-key".to_string()),
        database_api_path: Some(base.to_string()),
        access_token_paths: vec!["/access".to_string()],
        store_timeout_ms: 1000,
        ..Default::default()
    }
}

async fn get_json(app: &Router, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_issued_pair_is_written_to_store() {
    let (base, db) = spawn_store().await;
    let state = AppState::from_config(&config_for(&base)).unwrap();
    let app = build_router(&state, demo_routes(), demo_ws_routes(state.clone()));

    let (status, body) =
        get_json(&app, "/auth/token/new?client_id=svc", &[("master-token", MASTER)]).await;
    assert_eq!(status, StatusCode::OK);

    let stored = db.get("svc").unwrap().value().clone();
    assert_eq!(stored["access_token"], body["data"]["access_token"]);
    assert_eq!(stored["refresh_token"], body["data"]["refresh_token"]);

    let access = body["data"]["access_token"].as_str().unwrap();
    let (status, body) = get_json(&app, "/access/health", &[("access-token", access)]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["client_id"], "svc");
}

#[tokio::test]
async fn test_store_forgetting_client_rejects_access() {
    let (base, db) = spawn_store().await;
    let state = AppState::from_config(&config_for(&base)).unwrap();
    let app = build_router(&state, demo_routes(), demo_ws_routes(state.clone()));

    let pair = state.tokens.issue(Some("gone".to_string())).await.unwrap();
    db.remove("gone");

    let (status, body) =
        get_json(&app, "/access/health", &[("access-token", pair.access_token.as_str())]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid Client ID");
}

#[tokio::test]
async fn test_refresh_overwrites_stored_pair() {
    let (base, db) = spawn_store().await;
    let state = AppState::from_config(&config_for(&base)).unwrap();
    let app = build_router(&state, demo_routes(), demo_ws_routes(state.clone()));

    let pair = state.tokens.issue(Some("svc".to_string())).await.unwrap();
    db.insert(
        "svc".to_string(),
        json!({ "access_token": "stale", "refresh_token": "stale" }),
    );

    let uri = format!("/auth/token/refresh?refresh_token={}", pair.refresh_token);
    let (status, body) = get_json(&app, &uri, &[]).await;
    assert_eq!(status, StatusCode::OK);

    let stored = db.get("svc").unwrap().value().clone();
    assert_eq!(stored["access_token"], body["data"]["access_token"]);
    assert_eq!(stored["refresh_token"], body["data"]["refresh_token"]);
}

#[tokio::test]
async fn test_unreachable_store_fails_closed() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let state = AppState::from_config(&config_for(&format!("http://{}", addr))).unwrap();
    let app = build_router(&state, demo_routes(), demo_ws_routes(state.clone()));

    // Issuance still hands out the pair when the save fails
    let pair = state.tokens.issue(Some("svc".to_string())).await.unwrap();

    let (status, body) =
        get_json(&app, "/access/health", &[("access-token", pair.access_token.as_str())]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid Client ID");
}
