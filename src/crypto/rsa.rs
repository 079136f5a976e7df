use ring::{rand, signature};

use crate::crypto::{SignStrategy, ValidateStrategy};
use crate::error::{ErrorDetails, Result, SignError, ValidateError};
use crate::pem::decoder::PemEncodedKey;
use crate::serialization::b64_decode;
use crate::token::Token;

/// RSASSA-PKCS1-v1_5 using SHA-256
///
/// Signing needs a PEM encoded RSA private key. Validation takes a PEM encoded RSA
/// public key (PKCS#1, PKCS#8 or a certificate) and, for compatibility, will also
/// accept the private key and verify with its public half.
pub(crate) struct Rs256;

impl SignStrategy for Rs256 {
    fn sign(&self, token: &Token, signing_input: &[u8]) -> Result<Vec<u8>> {
        if token.key().is_empty() {
            return Err(SignError::MissingKey("RS256".to_owned()).into());
        }
        let key_pair = PemEncodedKey::new(token.key())?.rsa_key_pair()?;

        let mut signature = vec![0; key_pair.public().modulus_len()];
        let rng = rand::SystemRandom::new();
        key_pair
            .sign(&signature::RSA_PKCS1_SHA256, &rng, signing_input, &mut signature)
            .map_err(|e| {
                SignError::Crypto(ErrorDetails::map("Failed to sign JWT with RSA", Box::new(e)))
            })?;

        Ok(signature)
    }
}

impl ValidateStrategy for Rs256 {
    fn validate(&self, token: &Token) -> Result<bool> {
        let pem_key = PemEncodedKey::new(token.key())?;
        if pem_key.is_private() {
            tracing::debug!("verifying RS256 signature with the public half of a private key");
        }
        let public_key = pem_key.rsa_public_key()?;

        // A signature we can't even decode can't match
        let signature_bytes =
            b64_decode(token.signature().as_str()).map_err(|_| ValidateError::SignatureMismatch)?;
        let signing_input = token.signing_input()?;

        signature::UnparsedPublicKey::new(&signature::RSA_PKCS1_2048_8192_SHA256, public_key)
            .verify(signing_input.as_bytes(), &signature_bytes)
            .map_err(|_| ValidateError::SignatureMismatch)?;
        Ok(true)
    }
}
