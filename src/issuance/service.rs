//! Token issuance: mint, persist, and refresh access/refresh pairs.

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::AuthConfig;
use crate::store::CredentialStore;
use crate::token::{TokenClaims, TokenCodec, TokenError, TokenKind};

/// Freshly minted credentials for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub client_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("CRYPTOGRAPHY_KEY is not set")]
    MissingKey,

    #[error("Failed to sign token: {0}")]
    Signing(#[source] TokenError),

    #[error("Invalid refresh token")]
    InvalidRefreshToken(#[source] TokenError),

    #[error("Invalid refresh token: missing refresh_token")]
    MissingRefreshToken,

    #[error("Invalid refresh token: missing client_id")]
    MissingClientId,

    #[error("Invalid refresh token: not a refresh token")]
    WrongTokenType,
}

impl IssueError {
    /// Configuration problems are server errors; bad refresh tokens are the caller's.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::MissingKey | Self::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRefreshToken(_)
            | Self::MissingRefreshToken
            | Self::MissingClientId
            | Self::WrongTokenType => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

pub struct TokenService {
    codec: Arc<TokenCodec>,
    store: Arc<dyn CredentialStore>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    strict_token_type: bool,
}

impl TokenService {
    pub fn new(
        config: &AuthConfig,
        codec: Arc<TokenCodec>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            codec,
            store,
            access_ttl: ttl_days(config.access_token_ttl_days),
            refresh_ttl: ttl_days(config.refresh_token_ttl_days),
            strict_token_type: config.strict_token_type,
        }
    }

    /// Mint a pair for `client_id` (a random UUID when absent or empty) and
    /// persist it as the client's canonical record.
    pub async fn issue(&self, client_id: Option<String>) -> Result<TokenPair, IssueError> {
        if !self.codec.is_configured() {
            error!("CRYPTOGRAPHY_KEY is not set. Set it in the environment or config file.");
            return Err(IssueError::MissingKey);
        }

        let client_id = client_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let now = Utc::now();
        let access = TokenClaims::new(client_id.clone(), TokenKind::Access, now, self.access_ttl);
        let refresh = TokenClaims::new(client_id.clone(), TokenKind::Refresh, now, self.refresh_ttl);

        let access_token = self.sign(&access)?;
        let refresh_token = self.sign(&refresh)?;

        // The pair is returned even if persisting fails; it will not pass the access check
        if !self
            .store
            .save(&client_id, &access_token, &refresh_token)
            .await
        {
            warn!(client_id = %client_id, "Issued tokens could not be persisted");
        }

        info!(client_id = %client_id, "Token pair issued");
        Ok(TokenPair {
            client_id,
            access_token,
            refresh_token,
        })
    }

    /// Mint a new pair for the client named in a valid refresh token.
    ///
    /// The presented token is not compared with the stored one and the previous
    /// pair is not revoked; it is simply overwritten in the store.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, IssueError> {
        let claims = self.codec.decode(refresh_token).map_err(|e| {
            if e.is_configuration() {
                IssueError::MissingKey
            } else {
                error!("Failed to decode refresh token: {}", e);
                IssueError::InvalidRefreshToken(e)
            }
        })?;

        if self.strict_token_type && claims.kind != TokenKind::Refresh {
            return Err(IssueError::WrongTokenType);
        }

        let client_id = claims.client_id().ok_or(IssueError::MissingClientId)?;
        self.issue(Some(client_id.to_string())).await
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, IssueError> {
        self.codec.encode(claims).map_err(|e| match e {
            TokenError::MissingKey => IssueError::MissingKey,
            other => IssueError::Signing(other),
        })
    }
}

/// Out-of-range values saturate; `AuthConfig::validate` rejects them at load.
fn ttl_days(days: i64) -> Duration {
    Duration::try_days(days).unwrap_or(if days < 0 { Duration::MIN } else { Duration::MAX })
}
