use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Path always guarded by the master token, relative to `token_route_prefix`.
pub const TOKEN_NEW_ROUTE: &str = "/token/new";
pub const TOKEN_REFRESH_ROUTE: &str = "/token/refresh";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid auth config: {0}")]
    Invalid(String),
}

/// Upper bound for token lifetimes, in days.
pub const MAX_TOKEN_TTL_DAYS: i64 = 36_500;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Process-wide authorization policy.
///
/// Loaded once at startup, then shared read-only behind an `Arc`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    /// Static secret expected in the `MASTER-TOKEN` header
    pub master_token: Option<String>,
    /// HMAC key used to sign and verify tokens
    pub cryptography_key: Option<String>,
    /// Base URL of the external credential store
    pub database_api_path: Option<String>,
    /// Path prefixes that require the master token
    pub master_token_paths: Vec<String>,
    /// Path prefixes that require a valid access token
    pub access_token_paths: Vec<String>,
    /// Mount point of the issuance routes
    pub token_route_prefix: String,
    pub access_token_ttl_days: i64,
    pub refresh_token_ttl_days: i64,
    /// Reject tokens whose `type` claim does not match the check being made
    pub strict_token_type: bool,
    /// Timeout for the single request made to the credential store
    pub store_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            master_token: None,
            cryptography_key: None,
            database_api_path: None,
            master_token_paths: Vec::new(),
            access_token_paths: Vec::new(),
            token_route_prefix: "/auth".to_string(),
            access_token_ttl_days: 30,
            refresh_token_ttl_days: 365,
            strict_token_type: false,
            store_timeout_ms: 5000,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let mut config: AppConfig = serde_yaml::from_str(&content)?;
        config.auth.apply_env();
        config.auth.validate()?;
        Ok(config)
    }
}

impl AuthConfig {
    /// Apply `CRYPTOGRAPHY_KEY`, `MASTER_TOKEN` and `DATABASE_API_PATH` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// The cryptography key from the environment wins over the file; the master
    /// token and database path from the environment only fill gaps.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(key) = lookup("CRYPTOGRAPHY_KEY") {
            self.cryptography_key = Some(key);
        }
        if non_empty(&self.master_token).is_none() {
            self.master_token = lookup("MASTER_TOKEN");
        }
        if non_empty(&self.database_api_path).is_none() {
            self.database_api_path = lookup("DATABASE_API_PATH");
        }
    }

    /// Reject token lifetimes outside `1..=MAX_TOKEN_TTL_DAYS`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, days) in [
            ("access_token_ttl_days", self.access_token_ttl_days),
            ("refresh_token_ttl_days", self.refresh_token_ttl_days),
        ] {
            if !(1..=MAX_TOKEN_TTL_DAYS).contains(&days) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_TOKEN_TTL_DAYS, days
                )));
            }
        }
        Ok(())
    }

    /// Master-protected prefixes, with the token minting route always first.
    pub fn effective_master_paths(&self) -> Vec<String> {
        let mint_route = self.token_new_path();
        let mut paths = vec![mint_route.clone()];
        paths.extend(
            self.master_token_paths
                .iter()
                .filter(|p| **p != mint_route)
                .cloned(),
        );
        paths
    }

    pub fn token_new_path(&self) -> String {
        format!("{}{}", self.token_route_prefix.trim_end_matches('/'), TOKEN_NEW_ROUTE)
    }

    pub fn master_token(&self) -> Option<&str> {
        non_empty(&self.master_token)
    }

    pub fn cryptography_key(&self) -> Option<&str> {
        non_empty(&self.cryptography_key)
    }

    pub fn database_api_path(&self) -> Option<&str> {
        non_empty(&self.database_api_path)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
