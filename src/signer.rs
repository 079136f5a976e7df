use std::sync::Arc;

use crate::crypto::SignStrategy;
use crate::error::Result;
use crate::token::{Signature, Token, TokenState};

/// Drives the signing of a token with a given strategy
///
/// [`Token::encode`] uses this with the registered strategy for the token's
/// algorithm. Build one directly to sign with your own strategy, e.g. for a
/// [`Custom`](crate::AlgorithmType::Custom) algorithm:
///
/// ```rust
/// # use signedjwt::{AlgorithmType, ClaimSet, Result, Signer, Token};
/// # fn main() -> Result<()> {
/// let mut token = Token::new(AlgorithmType::Custom("X-DEMO".into()), ClaimSet::new(), "")?;
/// let sign = |_: &Token, _: &[u8]| -> Result<Vec<u8>> { Ok(b"signed".to_vec()) };
/// let compact = Signer::new(&mut token, sign).sign()?;
/// assert!(compact.ends_with(".c2lnbmVk"));
/// # Ok(())
/// # }
/// ```
pub struct Signer<'a> {
    token: &'a mut Token,
    strategy: Arc<dyn SignStrategy>,
}

impl<'a> Signer<'a> {
    pub fn new(token: &'a mut Token, strategy: impl SignStrategy + 'static) -> Signer<'a> {
        Signer::with_strategy(token, Arc::new(strategy))
    }

    pub(crate) fn with_strategy(token: &'a mut Token, strategy: Arc<dyn SignStrategy>) -> Signer<'a> {
        Signer { token, strategy }
    }

    /// Computes the signature and returns the compact `header.payload.signature` string
    ///
    /// The header and payload encodings are cached on the token, so signing an
    /// unmodified token again gives the same signing input.
    pub fn sign(self) -> Result<String> {
        let Signer { token, strategy } = self;
        match sign_token(token, strategy.as_ref()) {
            Ok(compact) => {
                token.state = TokenState::Encoded;
                Ok(compact)
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to encode token");
                token.state = TokenState::EncodeFailed;
                Err(e)
            }
        }
    }
}

fn sign_token(token: &mut Token, strategy: &dyn SignStrategy) -> Result<String> {
    let header = token.header.to_base64()?;
    let payload = token.payload.to_base64()?;
    let signing_input = format!("{header}.{payload}");
    tracing::trace!(header = header.len(), payload = payload.len(), "signing input ready");

    let signature = strategy.sign(token, signing_input.as_bytes())?;
    token.signature = Signature::from_bytes(&signature);

    Ok(format!("{}.{}", signing_input, token.signature))
}
