use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::token::Token;

pub mod algorithm;
pub(crate) mod hmac;
pub(crate) mod none;
pub(crate) mod rsa;

use algorithm::AlgorithmType;

/// Computes the signature for a token
///
/// `signing_input` is the exact `header.payload` text the signature must cover.
/// The returned bytes are the raw signature; base64url encoding happens in the
/// [`Signer`](crate::Signer).
pub trait SignStrategy: Send + Sync {
    fn sign(&self, token: &Token, signing_input: &[u8]) -> Result<Vec<u8>>;
}

/// Checks the signature of a token parsed from a compact string
///
/// Returning `Ok(false)` rejects the token with a signature mismatch.
pub trait ValidateStrategy: Send + Sync {
    fn validate(&self, token: &Token) -> Result<bool>;
}

impl<F> SignStrategy for F
where
    F: Fn(&Token, &[u8]) -> Result<Vec<u8>> + Send + Sync,
{
    fn sign(&self, token: &Token, signing_input: &[u8]) -> Result<Vec<u8>> {
        self(token, signing_input)
    }
}

impl<F> ValidateStrategy for F
where
    F: Fn(&Token) -> Result<bool> + Send + Sync,
{
    fn validate(&self, token: &Token) -> Result<bool> {
        self(token)
    }
}

#[derive(Clone)]
struct Strategies {
    sign: Arc<dyn SignStrategy>,
    validate: Arc<dyn ValidateStrategy>,
}

/// The built-in algorithm implementations
///
/// Built once on first use and never modified afterwards, so it can be read from
/// any thread without locking.
pub struct Registry {
    strategies: HashMap<AlgorithmType, Strategies>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::builtin);

/// The process-wide registry of built-in algorithms
pub fn registry() -> &'static Registry {
    &REGISTRY
}

impl Registry {
    fn builtin() -> Registry {
        let mut strategies = HashMap::new();
        strategies.insert(
            AlgorithmType::HS256,
            Strategies {
                sign: Arc::new(hmac::Hs256),
                validate: Arc::new(hmac::Hs256),
            },
        );
        strategies.insert(
            AlgorithmType::RS256,
            Strategies {
                sign: Arc::new(rsa::Rs256),
                validate: Arc::new(rsa::Rs256),
            },
        );
        strategies.insert(
            AlgorithmType::NONE,
            Strategies {
                sign: Arc::new(none::Unsecured),
                validate: Arc::new(none::Unsecured),
            },
        );
        tracing::trace!(algorithms = strategies.len(), "built algorithm registry");
        Registry { strategies }
    }

    pub fn supports(&self, algorithm: &AlgorithmType) -> bool {
        self.strategies.contains_key(algorithm)
    }

    pub fn sign_strategy(&self, algorithm: &AlgorithmType) -> Option<Arc<dyn SignStrategy>> {
        self.strategies.get(algorithm).map(|s| s.sign.clone())
    }

    pub fn validate_strategy(&self, algorithm: &AlgorithmType) -> Option<Arc<dyn ValidateStrategy>> {
        self.strategies.get(algorithm).map(|s| s.validate.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_algorithms_are_registered() {
        for alg in [AlgorithmType::HS256, AlgorithmType::RS256, AlgorithmType::NONE] {
            assert!(registry().supports(&alg));
            assert!(registry().sign_strategy(&alg).is_some());
            assert!(registry().validate_strategy(&alg).is_some());
        }
    }

    #[test]
    fn reserved_and_custom_algorithms_are_not_registered() {
        assert!(!registry().supports(&AlgorithmType::ES256));
        assert!(registry().sign_strategy(&AlgorithmType::Custom("X".into())).is_none());
        assert!(registry().validate_strategy(&AlgorithmType::Custom("X".into())).is_none());
    }
}
