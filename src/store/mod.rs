//! Credential store client.
//!
//! The canonical access/refresh pair for each client lives in an external
//! key-value service. Authorization only reads it; issuance is the sole writer.
//!
//! Every operation is a single attempt. Failures are logged and degrade to
//! `false` / `None`, which callers treat as "no valid credential" (fail closed).

pub mod error;
pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::StoreError;
pub use http::HttpCredentialStore;
pub use memory::MemoryCredentialStore;

/// Canonical token pair persisted for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
}

/// Keyed lookup of the canonical tokens, by client id.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Upsert the canonical pair. Returns `false` on any failure.
    async fn save(&self, client_id: &str, access_token: &str, refresh_token: &str) -> bool;

    /// `None` when the client is unknown or the store could not be reached.
    async fn load_access_token(&self, client_id: &str) -> Option<String>;

    /// `None` when the client is unknown or the store could not be reached.
    async fn load_refresh_token(&self, client_id: &str) -> Option<String>;
}
