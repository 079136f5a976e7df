use crate::error::{ErrorDetails, Result, TokenError};
use crate::header::Header;
use crate::payload::Payload;

/// Takes the result of a str split and ensures we get exactly 3 parts
/// Errors if we don't
macro_rules! expect_three {
    ($iter:expr) => {{
        let mut i = $iter;
        match (i.next(), i.next(), i.next(), i.next()) {
            (Some(first), Some(second), Some(third), None) => (first, second, third),
            (_, _, None, _) => {
                return Err(TokenError::Malformed(ErrorDetails::new(
                    "Expected 3 period-separated segments, found fewer",
                ))
                .into())
            }
            _ => {
                return Err(TokenError::Malformed(ErrorDetails::new(
                    "Expected 3 period-separated segments, found more",
                ))
                .into())
            }
        }
    }};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSlices<'a> {
    /// The header and claims (including adjoining '.') but not the last '.' or signature
    pub message: &'a str,

    /// Just the trailing signature, no '.' (empty for unsecured tokens)
    pub signature: &'a str,

    /// Just the leading header, no '.'
    pub header: &'a str,

    /// Just the claims in between the header and signature, no '.'s
    pub claims: &'a str,
}

/// Splits a token that's in the form `"HEADER.CLAIMS.SIGNATURE"` into its constituent
/// parts without decoding anything.
///
/// For example:
/// ```rust
/// # use signedjwt::raw::{self, TokenSlices};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let token = "HEADER.CLAIMS.SIGNATURE";
/// let TokenSlices { message, signature, header, claims } = raw::split_token(token)?;
/// assert_eq!(message, "HEADER.CLAIMS");
/// assert_eq!(signature, "SIGNATURE");
/// assert_eq!(header, "HEADER");
/// assert_eq!(claims, "CLAIMS");
/// # Ok(())
/// # }
/// ```
///
/// The signature segment may be empty, but the separating periods may not be
/// omitted: `"HEADER.CLAIMS"` is malformed while `"HEADER.CLAIMS."` is not.
pub fn split_token(token: &str) -> Result<TokenSlices<'_>> {
    let (header, claims, signature) = expect_three!(token.split('.'));
    let message = &token[..header.len() + 1 + claims.len()];

    Ok(TokenSlices {
        message,
        signature,
        header,
        claims,
    })
}

/// Decodes just the header of a token, e.g. to pick a key by `"kid"` before parsing
///
/// Nothing is verified.
pub fn decode_header_only(token: impl AsRef<str>) -> Result<Header> {
    let TokenSlices { header, .. } = split_token(token.as_ref())?;
    Header::from_base64(header)
}

/// Decodes the header and claims of a token without verifying the signature or any claims
pub fn decode_only(token: impl AsRef<str>) -> Result<(Header, Payload)> {
    let TokenSlices { header, claims, .. } = split_token(token.as_ref())?;
    Ok((Header::from_base64(header)?, Payload::from_base64(claims)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn split_compact_token() {
        let slices = split_token("aaa.bbb.ccc").unwrap();
        assert_eq!(slices.header, "aaa");
        assert_eq!(slices.claims, "bbb");
        assert_eq!(slices.signature, "ccc");
        assert_eq!(slices.message, "aaa.bbb");
    }

    #[test]
    fn split_unsecured_token() {
        let slices = split_token("aaa.bbb.").unwrap();
        assert_eq!(slices.signature, "");
        assert_eq!(slices.message, "aaa.bbb");
    }

    #[test]
    fn wrong_segment_counts_are_malformed() {
        for token in ["", "aaa", "aaa.bbb", "aaa.bbb.ccc.ddd", "...."] {
            assert!(
                matches!(split_token(token), Err(Error::Token(TokenError::Malformed(_)))),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn decode_header_without_verifying() {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJhdWQiOiJkZXZlbG9wZXJzIn0.bogus";
        let header = decode_header_only(token).unwrap();
        assert_eq!(header.algorithm().unwrap(), "HS256");

        let (_, payload) = decode_only(token).unwrap();
        assert_eq!(payload.claims().get("aud").unwrap(), "developers");
    }
}
