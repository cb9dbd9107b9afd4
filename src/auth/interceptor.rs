//! Authorization decision core, shared by the HTTP middleware and the WebSocket gate.
//!
//! Decision flow for one request or connection:
//!
//! 1. Classify the path against the master and access prefix lists.
//! 2. Master check: `MASTER-TOKEN` header must equal the configured secret.
//! 3. Access check: `ACCESS-TOKEN` header is decoded, its client id looked up in
//!    the credential store, and the stored token compared to the presented one.
//! 4. Anything not rejected is forwarded.

use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::{debug, error, info, warn};

use super::error::{AuthError, AuthErrorCode};
use crate::config::AuthConfig;
use crate::policy::{PathPolicy, PolicyMatcher};
use crate::store::CredentialStore;
use crate::token::{TokenCodec, TokenKind};

pub const MASTER_TOKEN_HEADER: &str = "master-token";
pub const ACCESS_TOKEN_HEADER: &str = "access-token";

/// Client identity established by a passing access check.
///
/// Inserted into request extensions by the HTTP middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedClient {
    pub client_id: String,
}

/// Outcome of an authorization evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Pass to the handler; carries the client when an access check ran
    Forwarded(Option<AuthenticatedClient>),
    Rejected(AuthError),
}

impl Verdict {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Self::Forwarded(_))
    }

    pub fn into_result(self) -> Result<Option<AuthenticatedClient>, AuthError> {
        match self {
            Self::Forwarded(client) => Ok(client),
            Self::Rejected(err) => Err(err),
        }
    }
}

/// Which checks to run for a WebSocket endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WsRequirement {
    /// Same path policy as HTTP requests
    #[default]
    Policy,
    /// Access check only, whatever the path
    Access,
    /// Master check only, whatever the path
    Master,
}

pub struct Authorizer {
    policy: PolicyMatcher,
    master_token: Option<String>,
    codec: Arc<TokenCodec>,
    store: Arc<dyn CredentialStore>,
    strict_token_type: bool,
}

impl Authorizer {
    pub fn new(
        config: &AuthConfig,
        codec: Arc<TokenCodec>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            policy: PolicyMatcher::from_config(config),
            master_token: config.master_token().map(str::to_string),
            codec,
            store,
            strict_token_type: config.strict_token_type,
        }
    }

    pub fn policy(&self) -> &PolicyMatcher {
        &self.policy
    }

    /// Evaluate the path policy for `path` against the request headers.
    pub async fn authorize(&self, path: &str, headers: &HeaderMap) -> Verdict {
        info!("Request Path: {}", path);
        let policy = self.policy.classify(path);
        self.evaluate(path, policy, headers).await
    }

    /// Evaluate a WebSocket handshake with an explicit requirement.
    pub async fn authorize_ws(
        &self,
        requirement: WsRequirement,
        path: &str,
        headers: &HeaderMap,
    ) -> Verdict {
        info!("WebSocket Path: {}", path);
        let policy = match requirement {
            WsRequirement::Policy => self.policy.classify(path),
            WsRequirement::Access => PathPolicy {
                requires_master: false,
                requires_access: true,
            },
            WsRequirement::Master => PathPolicy {
                requires_master: true,
                requires_access: false,
            },
        };
        self.evaluate(path, policy, headers).await
    }

    async fn evaluate(&self, path: &str, policy: PathPolicy, headers: &HeaderMap) -> Verdict {
        if policy.requires_master {
            if let Err(err) = self.check_master(headers) {
                warn!(path, code = err.code.name(), "Request rejected");
                return Verdict::Rejected(err);
            }
        }

        if policy.requires_access {
            return match self.check_access(headers).await {
                Ok(client) => {
                    debug!(path, client_id = %client.client_id, "Access token accepted");
                    Verdict::Forwarded(Some(client))
                }
                Err(err) => {
                    warn!(path, code = err.code.name(), "Request rejected");
                    Verdict::Rejected(err)
                }
            };
        }

        Verdict::Forwarded(None)
    }

    /// Compare `MASTER-TOKEN` to the configured secret. Unconfigured secret rejects everything.
    pub fn check_master(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let presented = header_str(headers, MASTER_TOKEN_HEADER);
        match (presented, self.master_token.as_deref()) {
            (Some(presented), Some(expected)) if presented == expected => Ok(()),
            _ => Err(AuthError::from_code(AuthErrorCode::UnauthorizedMaster)),
        }
    }

    /// Validate `ACCESS-TOKEN` against the codec and the canonical stored token.
    pub async fn check_access(&self, headers: &HeaderMap) -> Result<AuthenticatedClient, AuthError> {
        let token = header_str(headers, ACCESS_TOKEN_HEADER)
            .ok_or_else(|| AuthError::from_code(AuthErrorCode::MissingAccessToken))?;

        let claims = self.codec.decode(token).map_err(|e| {
            if e.is_configuration() {
                error!("Access check failed closed: {}", e);
            }
            AuthError::with_cause(AuthErrorCode::InvalidAccessToken, &e)
        })?;

        if self.strict_token_type && claims.kind != TokenKind::Access {
            return Err(AuthError::from_code(AuthErrorCode::WrongTokenType));
        }

        let client_id = claims
            .client_id()
            .ok_or_else(|| AuthError::from_code(AuthErrorCode::InvalidAccessToken))?;

        let canonical = self
            .store
            .load_access_token(client_id)
            .await
            .ok_or_else(|| AuthError::from_code(AuthErrorCode::InvalidClientId))?;

        if canonical != token {
            return Err(AuthError::from_code(AuthErrorCode::UnauthorizedAccessToken));
        }

        Ok(AuthenticatedClient {
            client_id: client_id.to_string(),
        })
    }
}

/// Header value as text; non-UTF-8 values count as missing.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
