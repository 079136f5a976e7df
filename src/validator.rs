use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::claims::{ClaimSet, JsonValue, RegisteredClaim};
use crate::config::Config;
use crate::crypto::ValidateStrategy;
use crate::error::{ErrorDetails, Result, ValidateError};
use crate::token::{Token, TokenState};

/// Drives the validation of a token with a given strategy
///
/// The strategy checks the signature; the validator then checks `"exp"`. A strategy
/// answering `false` rejects the token with `ValidateError::SignatureMismatch`.
pub struct Validator<'a> {
    token: &'a mut Token,
    strategy: Arc<dyn ValidateStrategy>,
}

impl<'a> Validator<'a> {
    pub fn new(token: &'a mut Token, strategy: impl ValidateStrategy + 'static) -> Validator<'a> {
        Validator::with_strategy(token, Arc::new(strategy))
    }

    pub(crate) fn with_strategy(
        token: &'a mut Token,
        strategy: Arc<dyn ValidateStrategy>,
    ) -> Validator<'a> {
        Validator { token, strategy }
    }

    pub fn validate(self) -> Result<bool> {
        self.validate_at(Utc::now())
    }

    /// Validates with `now` as the current time
    pub fn validate_at(self, now: DateTime<Utc>) -> Result<bool> {
        let Validator { token, strategy } = self;
        if token.state == TokenState::Parsed {
            token.decode()?;
        }
        tracing::debug!(alg = ?token.algorithm(), "validating token");

        match check_token(token, strategy.as_ref(), now) {
            Ok(()) => {
                token.state = TokenState::Verified;
                Ok(true)
            }
            Err(e) => {
                tracing::debug!(error = %e, "token rejected");
                token.state = TokenState::Rejected;
                Err(e)
            }
        }
    }
}

fn check_token(token: &Token, strategy: &dyn ValidateStrategy, now: DateTime<Utc>) -> Result<()> {
    check_algorithm(token)?;
    if !strategy.validate(token)? {
        return Err(ValidateError::SignatureMismatch.into());
    }
    check_expiration(token.claims(), token.config(), now)
}

pub(crate) fn check_algorithm(token: &Token) -> Result<()> {
    if let (Some(expected), Some(found)) = (token.config().expected_algorithm(), token.algorithm()) {
        if expected != found {
            return Err(ValidateError::AlgorithmMismatch {
                expected: expected.name().to_owned(),
                found: found.name().to_owned(),
            }
            .into());
        }
    }
    Ok(())
}

/// `"exp"` may be an RFC 3339 timestamp or a NumericDate (seconds since the epoch).
/// A token is expired once `exp + leeway` is before `now`; at that instant it's still valid.
pub(crate) fn check_expiration(claims: &ClaimSet, config: &Config, now: DateTime<Utc>) -> Result<()> {
    if config.ignores_exp() {
        return Ok(());
    }
    let exp = match claims.get(RegisteredClaim::ExpirationTime) {
        Some(exp) => exp,
        None => return Ok(()),
    };

    let expires_at = expiration_time(exp)?;
    let deadline = expires_at
        .checked_add_signed(Duration::seconds(i64::from(config.leeway())))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    if deadline < now {
        let exp = match exp {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(ValidateError::Expired(exp).into());
    }
    Ok(())
}

fn expiration_time(exp: &JsonValue) -> Result<DateTime<Utc>> {
    match exp {
        JsonValue::String(timestamp) => DateTime::parse_from_rfc3339(timestamp)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                ValidateError::InvalidExpiration(ErrorDetails::map(
                    "'exp' is not an RFC 3339 timestamp",
                    Box::new(e),
                ))
                .into()
            }),
        JsonValue::Number(seconds) => {
            let seconds = match seconds.as_i64() {
                Some(seconds) => seconds,
                None => seconds.as_f64().unwrap_or(f64::MAX).floor() as i64,
            };
            DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
                ValidateError::InvalidExpiration(ErrorDetails::new("'exp' is out of range")).into()
            })
        }
        _ => Err(ValidateError::InvalidExpiration(ErrorDetails::new(
            "'exp' must be an RFC 3339 string or a NumericDate",
        ))
        .into()),
    }
}
