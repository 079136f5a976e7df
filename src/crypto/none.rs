use crate::crypto::{SignStrategy, ValidateStrategy};
use crate::error::{Result, ValidateError};
use crate::token::Token;

/// `"alg":"none"`: an empty signature, accepted only when the token's
/// configuration opts in with `allow_unsecured`
pub(crate) struct Unsecured;

impl SignStrategy for Unsecured {
    fn sign(&self, _token: &Token, _signing_input: &[u8]) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

impl ValidateStrategy for Unsecured {
    fn validate(&self, token: &Token) -> Result<bool> {
        if !token.config().allows_unsecured() {
            return Err(ValidateError::UnsecuredNotAllowed.into());
        }
        if !token.signature().is_empty() {
            return Err(ValidateError::SignatureMismatch.into());
        }
        tracing::warn!("accepting unsecured token");
        Ok(true)
    }
}
