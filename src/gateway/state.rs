use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::auth::Authorizer;
use crate::config::AuthConfig;
use crate::issuance::TokenService;
use crate::store::{CredentialStore, HttpCredentialStore, MemoryCredentialStore, StoreError};
use crate::token::TokenCodec;

/// Gateway shared state
///
/// Built once at startup from an immutable [`AuthConfig`]; every field is
/// read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Request/connection authorization
    pub authorizer: Arc<Authorizer>,
    /// Token minting and refresh
    pub tokens: Arc<TokenService>,
    /// Mount point of the issuance routes
    pub token_route_prefix: String,
}

impl AppState {
    /// Wire codec, authorizer and issuance service around an existing store.
    pub fn new(config: &AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        let codec = Arc::new(TokenCodec::new(config.cryptography_key()));

        if !config.access_token_paths.is_empty() && !codec.is_configured() {
            error!(
                "Access token paths are configured but CRYPTOGRAPHY_KEY is not set; \
                 every request to them will be rejected"
            );
        }
        if config.master_token().is_none() {
            warn!("MASTER_TOKEN is not set; master-protected paths reject every request");
        }

        let authorizer = Arc::new(Authorizer::new(config, codec.clone(), store.clone()));
        let tokens = Arc::new(TokenService::new(config, codec, store));

        Self {
            authorizer,
            tokens,
            token_route_prefix: config.token_route_prefix.clone(),
        }
    }

    /// Use the external credential store when `database_api_path` is set,
    /// otherwise keep credentials in memory.
    pub fn from_config(config: &AuthConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn CredentialStore> = match config.database_api_path() {
            Some(base) => {
                info!("Credential store: {}", base);
                Arc::new(HttpCredentialStore::new(
                    Some(base),
                    Duration::from_millis(config.store_timeout_ms),
                )?)
            }
            None => {
                warn!("Database API URL is not configured; credentials are kept in memory");
                Arc::new(MemoryCredentialStore::new())
            }
        };
        Ok(Self::new(config, store))
    }
}
