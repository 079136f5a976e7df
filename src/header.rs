use serde_json::map::Map;

use crate::claims::{IntoJsonValue, JsonValue};
use crate::crypto::algorithm::AlgorithmType;
use crate::error::{ErrorDetails, Result, TokenError};
use crate::serialization::*;

pub const TOKEN_TYPE_JWT: &str = "JWT";

/// The JOSE header of a token
///
/// Once serialized with [`Header::to_base64`] the encoded form is cached and reused
/// until a property changes. A header decoded with [`Header::from_base64`] caches the
/// exact segment it was decoded from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    properties: Map<String, JsonValue>,
    encoded: Option<String>,
}

impl Header {
    /// A header with `"alg"` set to the algorithm's name and `"typ":"JWT"`
    pub fn new(algorithm: &AlgorithmType) -> Header {
        let mut properties = Map::new();
        properties.insert("alg".to_owned(), JsonValue::String(algorithm.name().to_owned()));
        properties.insert("typ".to_owned(), JsonValue::String(TOKEN_TYPE_JWT.to_owned()));
        Header {
            properties,
            encoded: None,
        }
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&JsonValue> {
        self.properties.get(name.as_ref())
    }

    /// Sets a property, returning any previous value
    ///
    /// Values without a JSON form fail with `TokenError::InvalidHeader` and leave
    /// the header unchanged.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl IntoJsonValue,
    ) -> Result<Option<JsonValue>> {
        let name = name.into();
        let value = value.into_json_value().ok_or_else(|| {
            TokenError::InvalidHeader(ErrorDetails::new(format!(
                "'{name}' has no JSON representation"
            )))
        })?;
        self.encoded = None;
        Ok(self.properties.insert(name, value))
    }

    pub fn remove(&mut self, name: impl AsRef<str>) -> Option<JsonValue> {
        let previous = self.properties.remove(name.as_ref());
        if previous.is_some() {
            self.encoded = None;
        }
        previous
    }

    pub fn properties(&self) -> &Map<String, JsonValue> {
        &self.properties
    }

    /// The `"alg"` name as written in the header
    pub fn algorithm(&self) -> Result<&str> {
        match self.properties.get("alg") {
            Some(JsonValue::String(alg)) => Ok(alg),
            Some(_) => Err(TokenError::InvalidHeader(ErrorDetails::new("non-string 'alg' found")).into()),
            None => Err(TokenError::MissingAlgorithm.into()),
        }
    }

    /// Checks the properties every token header must carry
    pub(crate) fn ensure_jwt(&self) -> Result<()> {
        self.algorithm()?;
        match self.properties.get("typ") {
            Some(JsonValue::String(typ)) if typ.eq_ignore_ascii_case(TOKEN_TYPE_JWT) => Ok(()),
            Some(_) => Err(TokenError::InvalidHeader(ErrorDetails::new("'typ' is not \"JWT\"")).into()),
            None => Err(TokenError::InvalidHeader(ErrorDetails::new("missing 'typ'")).into()),
        }
    }

    /// The cached base64url encoding, if there is one
    pub fn encoded(&self) -> Option<&str> {
        self.encoded.as_deref()
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        object_to_json(&self.properties)
    }

    pub fn to_base64(&mut self) -> Result<String> {
        if let Some(encoded) = &self.encoded {
            return Ok(encoded.clone());
        }
        let encoded = b64_encode(&self.to_json()?);
        self.encoded = Some(encoded.clone());
        Ok(encoded)
    }

    /// Like `to_base64` but leaves the cache untouched
    pub(crate) fn current_base64(&self) -> Result<String> {
        match &self.encoded {
            Some(encoded) => Ok(encoded.clone()),
            None => Ok(b64_encode(&self.to_json()?)),
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Header> {
        Ok(Header {
            properties: object_from_json(bytes)?,
            encoded: None,
        })
    }

    pub fn from_base64(encoded: &str) -> Result<Header> {
        let mut header = Header::from_json(&b64_decode(encoded)?)?;
        header.encoded = Some(encoded.to_owned());
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CodecError, Error};

    #[test]
    fn new_header_encoding() {
        let mut header = Header::new(&AlgorithmType::HS256);
        assert_eq!(header.to_json().unwrap(), br#"{"alg":"HS256","typ":"JWT"}"#);
        assert_eq!(header.to_base64().unwrap(), "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
        assert_eq!(header.encoded(), Some("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
    }

    #[test]
    fn setting_a_property_invalidates_cache() {
        let mut header = Header::new(&AlgorithmType::HS256);
        let before = header.to_base64().unwrap();

        header.set("kid", "key-1").unwrap();
        assert_eq!(header.encoded(), None);

        let after = header.to_base64().unwrap();
        assert_ne!(before, after);
        assert_eq!(Header::from_base64(&after).unwrap().get("kid").unwrap(), "key-1");

        // a value with no JSON form changes nothing
        assert!(matches!(
            header.set("x5t", f64::NAN),
            Err(Error::Token(TokenError::InvalidHeader(_)))
        ));
        assert!(header.get("x5t").is_none());
        assert_eq!(header.encoded(), None);

        // removing something that isn't there leaves the cache alone
        header.remove("cty");
        assert_eq!(header.encoded(), Some(after.as_str()));
    }

    #[test]
    fn decoding_keeps_the_received_segment() {
        // {"typ":"JWT","alg":"HS256"}, keys not in sorted order
        let segment = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9";
        let mut header = Header::from_base64(segment).unwrap();
        assert_eq!(header.algorithm().unwrap(), "HS256");
        assert_eq!(header.to_base64().unwrap(), segment);
        header.ensure_jwt().unwrap();
    }

    #[test]
    fn header_must_be_an_object() {
        // "HS256"
        assert!(matches!(
            Header::from_base64("IkhTMjU2Ig"),
            Err(Error::Codec(CodecError::JsonInvalid(_)))
        ));
        assert!(matches!(
            Header::from_base64("%%%"),
            Err(Error::Codec(CodecError::Base64Invalid(_)))
        ));
    }

    #[test]
    fn header_must_carry_alg_and_typ() {
        let header = Header::from_json(br#"{"typ":"JWT"}"#).unwrap();
        assert!(matches!(header.ensure_jwt(), Err(Error::Token(TokenError::MissingAlgorithm))));

        let header = Header::from_json(br#"{"alg":7,"typ":"JWT"}"#).unwrap();
        assert!(matches!(header.ensure_jwt(), Err(Error::Token(TokenError::InvalidHeader(_)))));

        let header = Header::from_json(br#"{"alg":"HS256"}"#).unwrap();
        assert!(matches!(header.ensure_jwt(), Err(Error::Token(TokenError::InvalidHeader(_)))));

        let header = Header::from_json(br#"{"alg":"HS256","typ":"JOSE"}"#).unwrap();
        assert!(matches!(header.ensure_jwt(), Err(Error::Token(TokenError::InvalidHeader(_)))));
    }
}
