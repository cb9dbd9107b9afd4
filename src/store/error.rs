use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database API URL is not configured")]
    NotConfigured,

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Credential store answered {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed credential store response: {0}")]
    Body(#[source] reqwest::Error),
}
