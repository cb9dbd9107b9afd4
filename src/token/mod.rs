//! Signed token codec.
//!
//! Tokens are compact HS256 JWTs carrying [`TokenClaims`]. The codec owns the
//! process cryptography key; everything else only sees token strings and claims.
//!
//! ## Components
//! - `claims`: claim payload and token kind
//! - `codec`: signing and verification
//! - `error`: codec error type

pub mod claims;
pub mod codec;
pub mod error;

pub use claims::{TokenClaims, TokenKind};
pub use codec::TokenCodec;
pub use error::TokenError;
