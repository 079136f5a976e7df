use std::fmt;

use chrono::{DateTime, Utc};

use crate::claims::{ClaimSet, IntoJsonValue, JsonValue};
use crate::config::Config;
use crate::crypto::algorithm::{classify, is_well_formed, AlgorithmType, TokenType};
use crate::crypto::registry;
use crate::error::{AlgorithmError, Error, ErrorDetails, Result, SignError, TokenError, ValidateError};
use crate::header::Header;
use crate::payload::Payload;
use crate::raw::{split_token, TokenSlices};
use crate::serialization::{b64_decode, b64_encode};
use crate::signer::Signer;
use crate::validator::{check_algorithm, Validator};

/// The base64url encoded signature segment of a token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    encoded: String,
}

impl Signature {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Signature {
        Signature {
            encoded: b64_encode(bytes),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Empty before signing and for unsecured tokens
    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }

    /// The raw signature bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        b64_decode(&self.encoded)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// Where a token is in its lifecycle
///
/// Built tokens go `Constructed` → `Encoded`. Parsed tokens go `Parsed` → `Decoded`
/// → `Verified` or `Rejected`. A failed encode or decode leaves the token in
/// `EncodeFailed` / `DecodeFailed`; nothing is retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Constructed,
    Encoded,
    Parsed,
    Decoded,
    Verified,
    Rejected,
    EncodeFailed,
    DecodeFailed,
}

/// A JSON Web Token: header, claims, signature and the key used to sign or verify them
///
/// A token is either built with [`Token::new`] for encoding, or created from a compact
/// string with [`Token::from_raw`] (or [`parse`](crate::parse)) for decoding and validation.
/// Only parsed tokens carry the raw compact string.
#[derive(Clone)]
pub struct Token {
    pub(crate) header: Header,
    pub(crate) payload: Payload,
    pub(crate) signature: Signature,
    pub(crate) key: Vec<u8>,
    pub(crate) raw: Option<String>,
    pub(crate) algorithm: Option<AlgorithmType>,
    pub(crate) config: Config,
    pub(crate) state: TokenState,
}

impl Token {
    /// Builds a token to be encoded
    ///
    /// The algorithm is checked here rather than at encode time:
    /// * JWE algorithms and reserved JWS algorithms (`ES256`) fail with
    ///   `AlgorithmError::NotImplemented`
    /// * a `Custom` name that is empty, contains '.' or whitespace, or collides with a
    ///   registered JWS/JWE name fails with `AlgorithmError::Unsupported`
    ///
    /// `key` is the HMAC secret for HS256 or a PEM encoded RSA private key for RS256.
    /// It's ignored for `NONE`.
    pub fn new(algorithm: AlgorithmType, claims: ClaimSet, key: impl Into<Vec<u8>>) -> Result<Token> {
        match &algorithm {
            AlgorithmType::Custom(name) => {
                if !is_well_formed(name) || classify(name).is_some() {
                    return Err(AlgorithmError::Unsupported(name.to_owned()).into());
                }
            }
            _ => {
                algorithm.token_type()?;
                if !registry().supports(&algorithm) {
                    return Err(AlgorithmError::NotImplemented(algorithm.name().to_owned()).into());
                }
            }
        }

        Ok(Token {
            header: Header::new(&algorithm),
            payload: Payload::new(claims),
            signature: Signature::default(),
            key: key.into(),
            raw: None,
            algorithm: Some(algorithm),
            config: Config::default(),
            state: TokenState::Constructed,
        })
    }

    /// Wraps a compact token string for later [`decode`](Token::decode)
    ///
    /// `key` is the HMAC secret for HS256 or a PEM encoded RSA public key (or
    /// private key) for RS256.
    pub fn from_raw(raw: impl Into<String>, key: impl Into<Vec<u8>>) -> Token {
        Token {
            header: Header::default(),
            payload: Payload::default(),
            signature: Signature::default(),
            key: key.into(),
            raw: Some(raw.into()),
            algorithm: None,
            config: Config::default(),
            state: TokenState::Parsed,
        }
    }

    /// Serializes and signs the token with the registered strategy for its algorithm,
    /// returning the compact `header.payload.signature` string
    ///
    /// Custom algorithms have no registered strategy; sign those with a [`Signer`].
    /// A parsed token whose algorithm is a reserved JWS name (`ES256`) fails with
    /// `AlgorithmError::NotImplemented`.
    pub fn encode(&mut self) -> Result<String> {
        if self.state == TokenState::Parsed {
            self.decode()?;
        }
        let algorithm = match &self.algorithm {
            Some(algorithm) => algorithm.clone(),
            None => {
                self.state = TokenState::EncodeFailed;
                return Err(TokenError::MissingAlgorithm.into());
            }
        };
        tracing::debug!(alg = %algorithm, "encoding token");

        match registry().sign_strategy(&algorithm) {
            Some(strategy) => Signer::with_strategy(self, strategy).sign(),
            None => {
                self.state = TokenState::EncodeFailed;
                Err(missing_strategy(&algorithm, SignError::NoSignFunc))
            }
        }
    }

    /// Splits the raw compact string and decodes the header and claims
    ///
    /// Nothing is verified. The header must be a JSON object with a string `"alg"` and
    /// `"typ":"JWT"`; the `"alg"` must be a registered JWS algorithm, or any other
    /// well-formed non-JWE name if the token's [`Config`] allows custom algorithms.
    pub fn decode(&mut self) -> Result<()> {
        let raw = self.raw.as_deref().ok_or(TokenError::MissingRaw)?;
        tracing::trace!(len = raw.len(), "decoding token");

        match decode_parts(raw, &self.config) {
            Ok((header, payload, signature, algorithm)) => {
                tracing::debug!(alg = %algorithm, "decoded token");
                self.header = header;
                self.payload = payload;
                self.signature = signature;
                self.algorithm = Some(algorithm);
                self.state = TokenState::Decoded;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to decode token");
                self.state = TokenState::DecodeFailed;
                Err(e)
            }
        }
    }

    /// Checks the signature with the registered strategy for the token's algorithm,
    /// then the `"exp"` claim against the current time
    ///
    /// Decodes first if that hasn't happened yet. Returns `Ok(true)` or an error;
    /// custom algorithms have no registered strategy so need a [`Validator`].
    /// Reserved JWS algorithms (`ES256`) fail with `AlgorithmError::NotImplemented`.
    pub fn validate(&mut self) -> Result<bool> {
        self.validate_at(Utc::now())
    }

    /// Like [`validate`](Token::validate) but checks `"exp"` against `now`
    pub fn validate_at(&mut self, now: DateTime<Utc>) -> Result<bool> {
        if self.state == TokenState::Parsed {
            self.decode()?;
        }
        let algorithm = match &self.algorithm {
            Some(algorithm) => algorithm.clone(),
            None => {
                self.state = TokenState::Rejected;
                return Err(TokenError::MissingAlgorithm.into());
            }
        };

        match registry().validate_strategy(&algorithm) {
            Some(strategy) => Validator::with_strategy(self, strategy).validate_at(now),
            None => {
                tracing::debug!(alg = %algorithm, "no validation function");
                self.state = TokenState::Rejected;
                check_algorithm(self)?;
                Err(missing_strategy(&algorithm, ValidateError::NoValidateFunc))
            }
        }
    }

    /// The exact `header.payload` text a signature covers
    ///
    /// For decoded tokens this is the received text, even if it isn't how this
    /// crate would have serialized the same header and claims.
    pub fn signing_input(&self) -> Result<String> {
        Ok([self.header.current_base64()?, self.payload.current_base64()?].join("."))
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The compact string this token was parsed from
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Sets an extra header property, e.g. `"kid"`
    ///
    /// `"alg"` and `"typ"` are derived from the token's algorithm and can't be set.
    /// A parsed token becomes a built token: it no longer has a raw string. A value
    /// without a JSON form fails with `TokenError::InvalidHeader` and changes nothing.
    pub fn set_header(
        &mut self,
        name: impl Into<String>,
        value: impl IntoJsonValue,
    ) -> Result<Option<JsonValue>> {
        let name = name.into();
        if name == "alg" || name == "typ" {
            return Err(TokenError::InvalidHeader(ErrorDetails::new(format!(
                "'{name}' is derived from the algorithm"
            )))
            .into());
        }
        let previous = self.header.set(name, value)?;
        self.detach();
        Ok(previous)
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn claims(&self) -> &ClaimSet {
        self.payload.claims()
    }

    /// Mutable access to the claims; a parsed token becomes a built token
    pub fn claims_mut(&mut self) -> &mut ClaimSet {
        self.detach();
        self.payload.claims_mut()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The algorithm given to `new`, or resolved from the header by `decode`
    pub fn algorithm(&self) -> Option<&AlgorithmType> {
        self.algorithm.as_ref()
    }

    pub fn token_type(&self) -> Option<TokenType> {
        self.algorithm.as_ref().and_then(|alg| alg.token_type().ok())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn state(&self) -> TokenState {
        self.state
    }

    fn detach(&mut self) {
        if self.raw.take().is_some() {
            tracing::trace!("token modified after parsing, dropping raw string");
        }
        self.signature = Signature::default();
        self.state = TokenState::Constructed;
    }
}

// Leaves out the key
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("header", &self.header)
            .field("payload", &self.payload)
            .field("signature", &self.signature)
            .field("raw", &self.raw)
            .field("algorithm", &self.algorithm)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn decode_parts(raw: &str, config: &Config) -> Result<(Header, Payload, Signature, AlgorithmType)> {
    let TokenSlices {
        header,
        claims,
        signature,
        ..
    } = split_token(raw)?;

    let header = Header::from_base64(header)?;
    header.ensure_jwt()?;
    let algorithm = AlgorithmType::resolve(header.algorithm()?, config.allows_custom_algorithms())?;
    let payload = Payload::from_base64(claims)?;

    Ok((
        header,
        payload,
        Signature {
            encoded: signature.to_owned(),
        },
        algorithm,
    ))
}

// Built-in algorithms without a strategy are reserved names nobody implements yet;
// custom ones are expected to bring their own.
fn missing_strategy<E: Into<Error>>(algorithm: &AlgorithmType, no_strategy: fn(String) -> E) -> Error {
    let name = algorithm.name().to_owned();
    match algorithm {
        AlgorithmType::Custom(_) => no_strategy(name).into(),
        _ => AlgorithmError::NotImplemented(name).into(),
    }
}
