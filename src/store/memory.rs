//! In-process credential store.
//!
//! Used by tests and when no external store is configured. Concurrent writes to
//! the same client are last-write-wins, same as the external service.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{CredentialStore, TokenRecord};

#[derive(Default)]
pub struct MemoryCredentialStore {
    records: DashMap<String, TokenRecord>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, client_id: &str) -> Option<TokenRecord> {
        self.records.get(client_id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn save(&self, client_id: &str, access_token: &str, refresh_token: &str) -> bool {
        self.records.insert(
            client_id.to_string(),
            TokenRecord {
                access_token: access_token.to_string(),
                refresh_token: refresh_token.to_string(),
            },
        );
        true
    }

    async fn load_access_token(&self, client_id: &str) -> Option<String> {
        self.records
            .get(client_id)
            .map(|r| r.access_token.clone())
    }

    async fn load_refresh_token(&self, client_id: &str) -> Option<String> {
        self.records
            .get(client_id)
            .map(|r| r.refresh_token.clone())
    }
}
