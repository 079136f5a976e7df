use std::fmt;
use std::str::FromStr;

use crate::error::{AlgorithmError, Error};

/// Identifies the algorithm used to secure a token
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
#[non_exhaustive]
pub enum AlgorithmType {
    /// HMAC using SHA-256
    HS256,

    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,

    /// ECDSA using P-256 and SHA-256 (reserved, not implemented)
    ES256,

    /// Unsecured JWT
    NONE,

    /// An algorithm implemented by the caller via [`Signer`](crate::Signer) and
    /// [`Validator`](crate::Validator); the name is written to the header as-is
    Custom(String),
}

/// Whether a token is signed or encrypted
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum TokenType {
    /// JSON Web Signature
    JWS,
    /// JSON Web Encryption
    JWE,
}

/// The JWS algorithms recognized when decoding, in lookup order
pub const JWS_ALGORITHMS: &[AlgorithmType] = &[
    AlgorithmType::HS256,
    AlgorithmType::RS256,
    AlgorithmType::ES256,
    AlgorithmType::NONE,
];

/// Key management algorithm names from [RFC 7518 §4.1](https://tools.ietf.org/html/rfc7518#section-4.1)
pub const JWE_ALGORITHMS: &[&str] = &[
    "RSA1_5",
    "RSA-OAEP",
    "RSA-OAEP-256",
    "A128KW",
    "A192KW",
    "A256KW",
    "dir",
    "ECDH-ES",
    "ECDH-ES+A128KW",
    "ECDH-ES+A192KW",
    "ECDH-ES+A256KW",
    "A128GCMKW",
    "A192GCMKW",
    "A256GCMKW",
    "PBES2-HS256+A128KW",
    "PBES2-HS384+A192KW",
    "PBES2-HS512+A256KW",
];

impl AlgorithmType {
    /// Returns the algorithm name as standardized in [RFC 7518](https://tools.ietf.org/html/rfc7518)
    pub fn name(&self) -> &str {
        match self {
            AlgorithmType::HS256 => "HS256",
            AlgorithmType::RS256 => "RS256",
            AlgorithmType::ES256 => "ES256",
            AlgorithmType::NONE => "none",
            AlgorithmType::Custom(name) => name,
        }
    }

    /// Custom algorithms route straight to caller-supplied strategies so they
    /// always classify as JWS.
    pub fn token_type(&self) -> Result<TokenType, AlgorithmError> {
        match self {
            AlgorithmType::Custom(_) => Ok(TokenType::JWS),
            _ => determine_token_type(self.name()),
        }
    }

    /// Resolves the `"alg"` name found in a token header
    ///
    /// Unknown names are only accepted as [`AlgorithmType::Custom`] when
    /// `allow_custom` is set, and never if they name a JWE algorithm.
    pub fn resolve(name: &str, allow_custom: bool) -> Result<AlgorithmType, AlgorithmError> {
        match determine_token_type(name) {
            Ok(_) => lookup_jws(name).ok_or_else(|| AlgorithmError::Unsupported(name.to_owned())),
            Err(AlgorithmError::Unsupported(_)) if allow_custom && is_well_formed(name) => {
                Ok(AlgorithmType::Custom(name.to_owned()))
            }
            Err(e) => Err(e),
        }
    }
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AlgorithmType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AlgorithmType::resolve(s, false)?)
    }
}

fn lookup_jws(name: &str) -> Option<AlgorithmType> {
    JWS_ALGORITHMS.iter().find(|alg| alg.name() == name).cloned()
}

/// Non-empty printable ASCII without the characters that delimit a compact token
pub(crate) fn is_well_formed(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_graphic() && b != b'.')
}

/// Classifies an algorithm name without judging whether it's implemented
pub fn classify(name: &str) -> Option<TokenType> {
    if lookup_jws(name).is_some() {
        Some(TokenType::JWS)
    } else if JWE_ALGORITHMS.contains(&name) {
        Some(TokenType::JWE)
    } else {
        None
    }
}

/// Determines whether `alg` names a supported JWS algorithm
///
/// JWE algorithm names are recognized but fail with `AlgorithmError::NotImplemented`;
/// anything else is `AlgorithmError::Unsupported`.
pub fn determine_token_type(alg: &str) -> Result<TokenType, AlgorithmError> {
    match classify(alg) {
        Some(TokenType::JWS) => Ok(TokenType::JWS),
        Some(TokenType::JWE) => Err(AlgorithmError::NotImplemented(format!(
            "{alg} (JSON Web Encryption)"
        ))),
        None => Err(AlgorithmError::Unsupported(alg.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        for alg in JWS_ALGORITHMS {
            assert_eq!(&AlgorithmType::from_str(alg.name()).unwrap(), alg);
        }
        assert_eq!(AlgorithmType::NONE.to_string(), "none");
        assert!(AlgorithmType::from_str("").is_err());
        assert!(AlgorithmType::from_str("hs256").is_err());
    }

    #[test]
    fn jws_algorithms_classify_as_jws() {
        assert_eq!(determine_token_type("HS256").unwrap(), TokenType::JWS);
        assert_eq!(determine_token_type("RS256").unwrap(), TokenType::JWS);
        assert_eq!(determine_token_type("ES256").unwrap(), TokenType::JWS);
        assert_eq!(determine_token_type("none").unwrap(), TokenType::JWS);
    }

    #[test]
    fn jwe_algorithms_are_not_implemented() {
        for name in JWE_ALGORITHMS {
            assert_eq!(classify(name), Some(TokenType::JWE));
            assert!(matches!(
                determine_token_type(name),
                Err(AlgorithmError::NotImplemented(_))
            ));
        }
    }

    #[test]
    fn unknown_algorithms_are_unsupported() {
        assert!(matches!(determine_token_type("HS384"), Err(AlgorithmError::Unsupported(_))));
        assert!(matches!(
            AlgorithmType::resolve("HS384", false),
            Err(AlgorithmError::Unsupported(_))
        ));
    }

    #[test]
    fn custom_resolution() {
        assert_eq!(
            AlgorithmType::resolve("X-HMAC", true).unwrap(),
            AlgorithmType::Custom("X-HMAC".to_owned())
        );
        assert_eq!(AlgorithmType::resolve("HS256", true).unwrap(), AlgorithmType::HS256);
        assert!(matches!(
            AlgorithmType::resolve("dir", true),
            Err(AlgorithmError::NotImplemented(_))
        ));
        assert!(AlgorithmType::resolve("", true).is_err());
        assert!(AlgorithmType::resolve("has space", true).is_err());
        assert_eq!(
            AlgorithmType::Custom("X-HMAC".to_owned()).token_type().unwrap(),
            TokenType::JWS
        );
    }
}
