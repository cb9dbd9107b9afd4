//! Request and connection authorization.
//!
//! ## Components
//! - `error`: rejection codes and the `{"detail": ...}` response
//! - `interceptor`: the decision core (`Authorizer`, `Verdict`)
//! - `middleware`: Axum HTTP middleware
//! - `websocket`: handshake gate for WebSocket routes

pub mod error;
pub mod interceptor;
pub mod middleware;
pub mod websocket;

pub use error::{AuthError, AuthErrorCode, AuthErrorResponse};
pub use interceptor::{
    ACCESS_TOKEN_HEADER, AuthenticatedClient, Authorizer, MASTER_TOKEN_HEADER, Verdict,
    WsRequirement,
};
pub use middleware::access_token_middleware;
pub use websocket::{WsGate, WsStatus};
