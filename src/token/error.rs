use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    /// No cryptography key configured; fatal to the operation, never the client's fault
    #[error("cryptography key is not configured")]
    MissingKey,

    #[error("token expires before it is issued")]
    InvalidLifetime,

    /// Malformed, badly signed or expired token
    #[error("{0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

impl TokenError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingKey)
    }

    pub fn is_expired(&self) -> bool {
        matches!(
            self,
            Self::Invalid(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature)
        )
    }
}
