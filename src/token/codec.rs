//! HS256 signing and verification of [`TokenClaims`].

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::{claims::TokenClaims, error::TokenError};

/// Signs and verifies tokens with the process-wide cryptography key.
///
/// Built once at startup from configuration and never mutated. A codec without a
/// key is valid to construct: every call then fails with [`TokenError::MissingKey`],
/// so protected requests fail closed instead of the process refusing to start.
#[derive(Clone)]
pub struct TokenCodec {
    keys: Option<(EncodingKey, DecodingKey)>,
    header: Header,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: Option<&str>) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|s| {
            (
                EncodingKey::from_secret(s.as_bytes()),
                DecodingKey::from_secret(s.as_bytes()),
            )
        });

        // Expiry is checked against wall-clock time at decode, with no grace period
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            keys,
            header: Header::new(Algorithm::HS256),
            validation,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    pub fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let (encoding_key, _) = self.keys.as_ref().ok_or_else(|| {
            tracing::error!("CRYPTOGRAPHY_KEY is not set. Set it in the environment or config file.");
            TokenError::MissingKey
        })?;

        if claims.exp <= claims.iat {
            return Err(TokenError::InvalidLifetime);
        }

        Ok(encode(&self.header, claims, encoding_key)?)
    }

    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (_, decoding_key) = self.keys.as_ref().ok_or_else(|| {
            tracing::error!("CRYPTOGRAPHY_KEY is not set. Set it in the environment or config file.");
            TokenError::MissingKey
        })?;

        let token_data = decode::<TokenClaims>(token, decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;
    use chrono::{Duration, Utc};

    fn claims(client_id: &str, kind: TokenKind, lifetime: Duration) -> TokenClaims {
        TokenClaims::new(client_id, kind, Utc::now(), lifetime)
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = TokenCodec::new(Some("secret"));
        let original = claims("c1", TokenKind::Access, Duration::days(30));

        let token = codec.encode(&original).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let codec = TokenCodec::new(Some("secret"));
        let c = claims("c1", TokenKind::Refresh, Duration::days(365));
        assert_eq!(codec.encode(&c).unwrap(), codec.encode(&c).unwrap());
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        for codec in [TokenCodec::new(None), TokenCodec::new(Some(""))] {
            assert!(!codec.is_configured());

            let err = codec
                .encode(&claims("c1", TokenKind::Access, Duration::days(1)))
                .unwrap_err();
            assert!(err.is_configuration());

            let err = codec.decode("a.b.c").unwrap_err();
            assert!(err.is_configuration());
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new(Some("secret"));
        let issued = Utc::now() - Duration::days(2);
        let expired = TokenClaims::new("c1", TokenKind::Access, issued, Duration::days(1));

        let token = codec.encode(&expired).unwrap();
        let err = codec.decode(&token).unwrap_err();
        assert!(err.is_expired());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_expired_by_seconds_has_no_leeway() {
        let codec = TokenCodec::new(Some("secret"));
        let issued = Utc::now() - Duration::seconds(60);
        let expired = TokenClaims::new("c1", TokenKind::Access, issued, Duration::seconds(30));

        let token = codec.encode(&expired).unwrap();
        assert!(codec.decode(&token).unwrap_err().is_expired());
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        let codec = TokenCodec::new(Some("secret"));
        let c = claims("c1", TokenKind::Access, Duration::zero());
        assert!(matches!(
            codec.encode(&c).unwrap_err(),
            TokenError::InvalidLifetime
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signer = TokenCodec::new(Some("secret-a"));
        let verifier = TokenCodec::new(Some("secret-b"));
        let token = signer
            .encode(&claims("c1", TokenKind::Access, Duration::days(1)))
            .unwrap();

        let err = verifier.decode(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_swapped_payload_rejected() {
        let codec = TokenCodec::new(Some("secret"));
        let a = codec
            .encode(&claims("alice", TokenKind::Access, Duration::days(1)))
            .unwrap();
        let b = codec
            .encode(&claims("bob", TokenKind::Access, Duration::days(1)))
            .unwrap();

        // alice's header and payload with bob's signature
        let a_parts: Vec<&str> = a.split('.').collect();
        let b_parts: Vec<&str> = b.split('.').collect();
        let forged = format!("{}.{}.{}", a_parts[0], a_parts[1], b_parts[2]);

        assert!(codec.decode(&forged).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let codec = TokenCodec::new(Some("secret"));
        for token in ["", "not-a-token", "a.b", "a.b.c"] {
            let err = codec.decode(token).unwrap_err();
            assert!(matches!(err, TokenError::Invalid(_)), "token {:?}", token);
        }
    }
}
