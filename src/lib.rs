//! Build, sign, parse and validate compact JSON Web Tokens
//!
//! ```rust
//! use signedjwt::{AlgorithmType, ClaimSet, Token};
//! # fn main() -> signedjwt::Result<()> {
//!
//! let mut claims = ClaimSet::new();
//! claims.add("aud", "developers")?;
//!
//! let mut token = Token::new(AlgorithmType::HS256, claims, "TEST")?;
//! let compact = token.encode()?;
//!
//! let token = signedjwt::parse_and_validate(&compact, "TEST", Default::default())?;
//! assert_eq!(token.claims().get("aud").unwrap(), "developers");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::{Config, ConfigBuilder};

mod claims;
pub use claims::{ClaimSet, IntoJsonValue, JsonValue, RegisteredClaim};

pub mod crypto;
pub use crypto::algorithm::{AlgorithmType, TokenType};
pub use crypto::{SignStrategy, ValidateStrategy};

mod header;
pub use header::Header;

mod payload;
pub use payload::Payload;

mod token;
pub use token::{Signature, Token, TokenState};

mod signer;
pub use signer::Signer;

mod validator;
pub use validator::Validator;

mod pem;
pub mod raw;
mod serialization;

/// Decodes a compact token without verifying it
///
/// Fails on a malformed token, an invalid header or claims segment, or an `"alg"`
/// that isn't a registered JWS algorithm. Call [`Token::validate`] to check the
/// signature and expiry.
pub fn parse(token: impl Into<String>, key: impl Into<Vec<u8>>) -> Result<Token> {
    parse_with_config(token, key, Config::default())
}

/// Decodes a compact token without verifying it, using `config` for this and any
/// later validation
pub fn parse_with_config(
    token: impl Into<String>,
    key: impl Into<Vec<u8>>,
    config: Config,
) -> Result<Token> {
    let mut token = Token::from_raw(token, key);
    token.set_config(config);
    token.decode()?;
    Ok(token)
}

/// Decodes and validates a compact token
pub fn parse_and_validate(
    token: impl Into<String>,
    key: impl Into<Vec<u8>>,
    config: Config,
) -> Result<Token> {
    let mut token = parse_with_config(token, key, config)?;
    token.validate()?;
    Ok(token)
}
