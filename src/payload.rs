use crate::claims::ClaimSet;
use crate::error::Result;
use crate::serialization::*;

/// A token's payload: its claim set plus a cache of the claim set's encoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    claims: ClaimSet,
    encoded: Option<String>,
}

impl Payload {
    pub fn new(claims: ClaimSet) -> Payload {
        Payload {
            claims,
            encoded: None,
        }
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    /// Mutable access to the claims; drops the cached encoding
    pub fn claims_mut(&mut self) -> &mut ClaimSet {
        self.encoded = None;
        &mut self.claims
    }

    pub fn into_claims(self) -> ClaimSet {
        self.claims
    }

    pub fn encoded(&self) -> Option<&str> {
        self.encoded.as_deref()
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        object_to_json(self.claims.as_map())
    }

    pub fn to_base64(&mut self) -> Result<String> {
        if let Some(encoded) = &self.encoded {
            return Ok(encoded.clone());
        }
        let encoded = b64_encode(&self.to_json()?);
        self.encoded = Some(encoded.clone());
        Ok(encoded)
    }

    pub(crate) fn current_base64(&self) -> Result<String> {
        match &self.encoded {
            Some(encoded) => Ok(encoded.clone()),
            None => Ok(b64_encode(&self.to_json()?)),
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Payload> {
        Ok(Payload::new(ClaimSet::from(object_from_json(bytes)?)))
    }

    pub fn from_base64(encoded: &str) -> Result<Payload> {
        let mut payload = Payload::from_json(&b64_decode(encoded)?)?;
        payload.encoded = Some(encoded.to_owned());
        Ok(payload)
    }
}
