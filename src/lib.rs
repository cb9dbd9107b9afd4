//! tokengate - token issuance and request gating for Axum services
//!
//! Issues short-lived access tokens and long-lived refresh tokens, and gates
//! request paths behind a static master token, a per-client access token, or both.
//! The same decision runs for plain HTTP requests and WebSocket handshakes.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration and environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`token`] - signed token codec (HS256)
//! - [`store`] - credential store client (HTTP and in-memory)
//! - [`policy`] - path prefix policy
//! - [`auth`] - authorization decision, HTTP middleware, WebSocket gate
//! - [`issuance`] - token issuance service and endpoints
//! - [`gateway`] - router assembly and server

pub mod config;
pub mod logging;

pub mod auth;
pub mod gateway;
pub mod issuance;
pub mod policy;
pub mod store;
pub mod token;

// Convenient re-exports at crate root
pub use auth::{AuthError, AuthErrorCode, AuthenticatedClient, Authorizer, Verdict, WsGate};
pub use config::{AppConfig, AuthConfig};
pub use gateway::{build_router, state::AppState};
pub use issuance::{IssueError, TokenPair, TokenService};
pub use policy::{PathPolicy, PolicyMatcher};
pub use store::{CredentialStore, HttpCredentialStore, MemoryCredentialStore};
pub use token::{TokenClaims, TokenCodec, TokenError, TokenKind};
