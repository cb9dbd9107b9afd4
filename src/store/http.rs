//! HTTP client for the external credential store.
//!
//! Wire contract:
//! - `POST <base>/token?client_id=X` with `{"data": {"access_token", "refresh_token"}}`, 200 on success
//! - `GET <base>/token?client_id=X` answers `{"data": {...}}` (or the flat pair), 404 when unknown

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::{CredentialStore, StoreError, TokenRecord};

#[derive(Serialize)]
struct SaveBody<'a> {
    data: SaveRecord<'a>,
}

#[derive(Serialize)]
struct SaveRecord<'a> {
    access_token: &'a str,
    refresh_token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct StoredTokens {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Accept both the enveloped and the flat response shape
#[derive(Deserialize)]
#[serde(untagged)]
enum LoadBody {
    Wrapped { data: StoredTokens },
    Flat(StoredTokens),
}

impl LoadBody {
    fn into_tokens(self) -> StoredTokens {
        match self {
            Self::Wrapped { data } => data,
            Self::Flat(tokens) => tokens,
        }
    }
}

pub struct HttpCredentialStore {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpCredentialStore {
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::Client)?;

        Ok(Self {
            client,
            base_url: base_url
                .filter(|u| !u.is_empty())
                .map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    fn token_url(&self) -> Result<String, StoreError> {
        let base = self.base_url.as_ref().ok_or(StoreError::NotConfigured)?;
        Ok(format!("{}/token", base))
    }

    async fn try_save(&self, client_id: &str, record: &TokenRecord) -> Result<(), StoreError> {
        let url = self.token_url()?;
        let body = SaveBody {
            data: SaveRecord {
                access_token: &record.access_token,
                refresh_token: &record.refresh_token,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("client_id", client_id)])
            .json(&body)
            .send()
            .await
            .map_err(|source| StoreError::Transport { url, source })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(StoreError::Status(status)),
        }
    }

    async fn try_load(&self, client_id: &str) -> Result<Option<StoredTokens>, StoreError> {
        let url = self.token_url()?;

        let response = self
            .client
            .get(&url)
            .query(&[("client_id", client_id)])
            .send()
            .await
            .map_err(|source| StoreError::Transport { url, source })?;

        if response.status() != StatusCode::OK {
            debug!(client_id, status = %response.status(), "No stored tokens for client");
            return Ok(None);
        }

        let body: LoadBody = response.json().await.map_err(StoreError::Body)?;
        Ok(Some(body.into_tokens()))
    }

    async fn load(&self, client_id: &str) -> Option<StoredTokens> {
        match self.try_load(client_id).await {
            Ok(tokens) => tokens,
            Err(StoreError::NotConfigured) => {
                error!("Database API URL is not configured.");
                None
            }
            Err(e) => {
                warn!(client_id, "Failed to load tokens: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl CredentialStore for HttpCredentialStore {
    async fn save(&self, client_id: &str, access_token: &str, refresh_token: &str) -> bool {
        let record = TokenRecord {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        };
        match self.try_save(client_id, &record).await {
            Ok(()) => true,
            Err(StoreError::NotConfigured) => {
                error!("Database API URL is not configured.");
                false
            }
            Err(e) => {
                warn!(client_id, "Failed to save tokens: {}", e);
                false
            }
        }
    }

    async fn load_access_token(&self, client_id: &str) -> Option<String> {
        self.load(client_id).await.and_then(|t| t.access_token)
    }

    async fn load_refresh_token(&self, client_id: &str) -> Option<String> {
        self.load(client_id).await.and_then(|t| t.refresh_token)
    }
}
