use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::map::Map;

use crate::claims::JsonValue;
use crate::error::{CodecError, ErrorDetails, Result};

pub(crate) fn b64_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

pub(crate) fn b64_decode(input: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(input).map_err(|e| {
        CodecError::Base64Invalid(ErrorDetails::map("base64 decode failure", Box::new(e))).into()
    })
}

/// Serializes a JSON object to its compact byte form
pub(crate) fn object_to_json(object: &Map<String, JsonValue>) -> Result<Vec<u8>> {
    serde_json::to_vec(object).map_err(|e| {
        CodecError::JsonInvalid(ErrorDetails::map("json serialize failure", Box::new(e))).into()
    })
}

/// Parses bytes that must hold a single JSON object
pub(crate) fn object_from_json(bytes: &[u8]) -> Result<Map<String, JsonValue>> {
    let s = std::str::from_utf8(bytes).map_err(|e| {
        CodecError::JsonInvalid(ErrorDetails::map("utf8 decode failure", Box::new(e)))
    })?;
    let value: JsonValue = serde_json::from_str(s).map_err(|e| {
        CodecError::JsonInvalid(ErrorDetails::map("json parse failure", Box::new(e)))
    })?;
    match value {
        JsonValue::Object(object) => Ok(object),
        _ => Err(CodecError::JsonInvalid(ErrorDetails::new("expected a JSON object")).into()),
    }
}
