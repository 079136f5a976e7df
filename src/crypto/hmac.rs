use ring::hmac;

use crate::crypto::{SignStrategy, ValidateStrategy};
use crate::error::{Result, SignError, TokenError, ValidateError};
use crate::serialization::b64_decode;
use crate::token::Token;

/// HMAC using SHA-256, keyed by the token's secret
pub(crate) struct Hs256;

fn hmac_key(secret: &[u8]) -> Result<hmac::Key> {
    if secret.is_empty() {
        return Err(SignError::MissingKey("HS256".to_owned()).into());
    }
    Ok(hmac::Key::new(hmac::HMAC_SHA256, secret))
}

fn hmac_sha256(secret: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    Ok(hmac::sign(&hmac_key(secret)?, message).as_ref().to_vec())
}

impl SignStrategy for Hs256 {
    fn sign(&self, token: &Token, signing_input: &[u8]) -> Result<Vec<u8>> {
        hmac_sha256(token.key(), signing_input)
    }
}

impl ValidateStrategy for Hs256 {
    // The received string must be exactly the segments we verify; nothing secret
    // is compared here. The tag itself goes through ring's constant time check.
    fn validate(&self, token: &Token) -> Result<bool> {
        let raw = token.raw().ok_or(TokenError::MissingRaw)?;
        let signing_input = token.signing_input()?;
        let signature = token.signature().as_str();
        if raw != format!("{signing_input}.{signature}") {
            return Err(ValidateError::SignatureMismatch.into());
        }

        let key = hmac_key(token.key())?;
        let tag = b64_decode(signature).map_err(|_| ValidateError::SignatureMismatch)?;
        hmac::verify(&key, signing_input.as_bytes(), &tag).map_err(|_| ValidateError::SignatureMismatch)?;
        Ok(true)
    }
}
