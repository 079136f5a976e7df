use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A description of a failure plus the lower-level error that caused it, if any
#[derive(Debug)]
#[non_exhaustive]
pub struct ErrorDetails {
    desc: String,
    src: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ErrorDetails {
    pub fn new(desc: impl Into<String>) -> ErrorDetails {
        ErrorDetails {
            desc: desc.into(),
            src: None,
        }
    }

    pub fn map(
        desc: impl Into<String>,
        src: Box<dyn StdError + Send + Sync + 'static>,
    ) -> ErrorDetails {
        ErrorDetails {
            desc: desc.into(),
            src: Some(src),
        }
    }

    pub fn description(&self) -> &str {
        &self.desc
    }
}

impl From<String> for ErrorDetails {
    fn from(s: String) -> Self {
        ErrorDetails { desc: s, src: None }
    }
}

impl From<&str> for ErrorDetails {
    fn from(s: &str) -> Self {
        ErrorDetails::new(s)
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.desc)
    }
}

impl StdError for ErrorDetails {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.src {
            Some(s) => Some(s.as_ref()),
            None => None,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClaimError {
    /// A claim with this name is already in the set
    #[error("duplicate claim '{0}'")]
    Duplicate(String),

    #[error("claim '{0}' not found in claim set")]
    NotFound(String),

    /// The value handed to `add_serializable` has no JSON representation
    #[error("claim '{name}' is not representable as JSON: {details}")]
    NotJson {
        name: String,
        #[source]
        details: ErrorDetails,
    },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("invalid base64url segment: {0}")]
    Base64Invalid(#[source] ErrorDetails),

    /// Malformed JSON, non-UTF-8 bytes, or a JSON value that isn't an object
    #[error("invalid JSON object: {0}")]
    JsonInvalid(#[source] ErrorDetails),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgorithmError {
    #[error("unsupported algorithm '{0}'")]
    Unsupported(String),

    /// Recognized but without an implementation (JWE, reserved JWS algorithms)
    #[error("algorithm '{0}' is not implemented")]
    NotImplemented(String),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TokenError {
    /// Any of: wrong segment count, a token that can't be split into header.claims.signature
    #[error("malformed token: {0}")]
    Malformed(#[source] ErrorDetails),

    /// `decode` was called on a token that wasn't parsed from a compact string
    #[error("token has no raw compact string to decode")]
    MissingRaw,

    #[error("token header has no 'alg'")]
    MissingAlgorithm,

    #[error("invalid token header: {0}")]
    InvalidHeader(#[source] ErrorDetails),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignError {
    #[error("no signing function registered for algorithm '{0}'")]
    NoSignFunc(String),

    #[error("failed to parse key: {0}")]
    KeyParseFailure(#[source] ErrorDetails),

    #[error("a key is required to sign with '{0}'")]
    MissingKey(String),

    #[error("signing failed: {0}")]
    Crypto(#[source] ErrorDetails),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidateError {
    #[error("no validation function registered for algorithm '{0}'")]
    NoValidateFunc(String),

    #[error("token signature does not match")]
    SignatureMismatch,

    /// The token's "exp" claim, as given in the token
    #[error("token expired at {0}")]
    Expired(String),

    /// The token's `"alg"` isn't the one the configuration expects
    #[error("token algorithm '{found}' does not match the expected '{expected}'")]
    AlgorithmMismatch { expected: String, found: String },

    #[error("unsecured ('none') tokens are not accepted by this configuration")]
    UnsecuredNotAllowed,

    #[error("invalid 'exp' claim: {0}")]
    InvalidExpiration(#[source] ErrorDetails),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Sign(#[from] SignError),

    #[error(transparent)]
    Validate(#[from] ValidateError),
}
