//! Issuance endpoints.
//!
//! - `GET <prefix>/token/new?client_id=<optional>` (master-protected by default)
//! - `GET <prefix>/token/refresh?refresh_token=<token>`

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::service::{IssueError, TokenPair, TokenService};
use crate::config::{TOKEN_NEW_ROUTE, TOKEN_REFRESH_ROUTE};

/// Response envelope of the issuance endpoints.
///
/// - status: `"success"` or `"error"`
/// - message: short description
/// - code: HTTP status, repeated in the body
/// - data: payload on success
#[derive(Debug, Serialize, Deserialize)]
pub struct StandardResponse<T> {
    pub status: String,
    pub message: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> StandardResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            code: StatusCode::OK.as_u16(),
            data: Some(data),
        }
    }

    pub fn error(code: StatusCode, message: impl Into<String>) -> StandardResponse<()> {
        StandardResponse {
            status: "error".to_string(),
            message: message.into(),
            code: code.as_u16(),
            data: None,
        }
    }
}

impl IntoResponse for IssueError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        (status, Json(StandardResponse::<()>::error(status, self.to_string()))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct NewTokenQuery {
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenQuery {
    pub refresh_token: Option<String>,
}

/// Routes relative to the issuance prefix, with their state applied.
pub fn routes(service: Arc<TokenService>) -> Router {
    Router::new()
        .route(TOKEN_NEW_ROUTE, get(new_token))
        .route(TOKEN_REFRESH_ROUTE, get(refresh_token))
        .with_state(service)
}

/// Issue a new token pair
///
/// GET /auth/token/new?client_id=<optional>
pub async fn new_token(
    State(service): State<Arc<TokenService>>,
    Query(query): Query<NewTokenQuery>,
) -> Result<Json<StandardResponse<TokenPair>>, IssueError> {
    let pair = service.issue(query.client_id).await?;
    Ok(Json(StandardResponse::success("Token generated", pair)))
}

/// Exchange a refresh token for a new pair
///
/// GET /auth/token/refresh?refresh_token=<token>
pub async fn refresh_token(
    State(service): State<Arc<TokenService>>,
    Query(query): Query<RefreshTokenQuery>,
) -> Result<Json<StandardResponse<TokenPair>>, IssueError> {
    let refresh_token = query
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or(IssueError::MissingRefreshToken)?;
    let pair = service.refresh(&refresh_token).await?;
    Ok(Json(StandardResponse::success("Token generated", pair)))
}
