use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::map::{Iter, Map};

use crate::error::{ClaimError, ErrorDetails, Result};

/// Any JSON-legal value: null, boolean, number, string, array or object
pub type JsonValue = serde_json::Value;

/// Conversion into a [`JsonValue`] for values handed to [`ClaimSet::add`] and
/// [`Header::set`](crate::Header::set)
///
/// Returns `None` for values without a JSON form. NaN and infinite floats are
/// rejected instead of becoming `null`.
pub trait IntoJsonValue {
    fn into_json_value(self) -> Option<JsonValue>;
}

macro_rules! impl_into_json_value {
    ($($t:ty),*) => {$(
        impl IntoJsonValue for $t {
            fn into_json_value(self) -> Option<JsonValue> {
                Some(JsonValue::from(self))
            }
        }
    )*};
}

impl_into_json_value!(
    JsonValue, String, &str, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize,
    serde_json::Number, Map<String, JsonValue>
);

impl IntoJsonValue for &String {
    fn into_json_value(self) -> Option<JsonValue> {
        Some(JsonValue::String(self.clone()))
    }
}

impl IntoJsonValue for f64 {
    fn into_json_value(self) -> Option<JsonValue> {
        serde_json::Number::from_f64(self).map(JsonValue::Number)
    }
}

impl IntoJsonValue for f32 {
    fn into_json_value(self) -> Option<JsonValue> {
        f64::from(self).into_json_value()
    }
}

impl<T: IntoJsonValue> IntoJsonValue for Vec<T> {
    fn into_json_value(self) -> Option<JsonValue> {
        self.into_iter()
            .map(IntoJsonValue::into_json_value)
            .collect::<Option<Vec<_>>>()
            .map(JsonValue::Array)
    }
}

/// Claim names registered by [RFC 7519 §4.1](https://tools.ietf.org/html/rfc7519#section-4.1)
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum RegisteredClaim {
    Issuer,
    Subject,
    Audience,
    ExpirationTime,
    NotBefore,
    IssuedAt,
    JwtId,
}

impl RegisteredClaim {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegisteredClaim::Issuer => "iss",
            RegisteredClaim::Subject => "sub",
            RegisteredClaim::Audience => "aud",
            RegisteredClaim::ExpirationTime => "exp",
            RegisteredClaim::NotBefore => "nbf",
            RegisteredClaim::IssuedAt => "iat",
            RegisteredClaim::JwtId => "jti",
        }
    }
}

impl AsRef<str> for RegisteredClaim {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<RegisteredClaim> for String {
    fn from(claim: RegisteredClaim) -> Self {
        claim.as_str().to_owned()
    }
}

impl fmt::Display for RegisteredClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The set of claims carried in a token's payload
///
/// Claim names are unique: `add` never overwrites an existing claim and `remove`
/// only succeeds for a claim that's present. Every value is a [`JsonValue`], so
/// a claim set is always serializable as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet {
    claims: Map<String, JsonValue>,
}

impl ClaimSet {
    pub fn new() -> ClaimSet {
        ClaimSet { claims: Map::new() }
    }

    /// Adds a claim, failing with `ClaimError::Duplicate` if the name is already taken
    /// or `ClaimError::NotJson` if the value has no JSON form
    ///
    /// ```rust
    /// # use signedjwt::{ClaimSet, RegisteredClaim};
    /// let mut claims = ClaimSet::new();
    /// claims.add(RegisteredClaim::Audience, "developers").unwrap();
    /// claims.add("admin", true).unwrap();
    /// assert!(claims.add("aud", "everyone").is_err());
    /// assert!(claims.add("ratio", f64::NAN).is_err());
    /// ```
    pub fn add(&mut self, name: impl Into<String>, value: impl IntoJsonValue) -> Result<()> {
        let name = name.into();
        if self.claims.contains_key(&name) {
            return Err(ClaimError::Duplicate(name).into());
        }
        let value = match value.into_json_value() {
            Some(value) => value,
            None => {
                return Err(ClaimError::NotJson {
                    name,
                    details: ErrorDetails::new("value has no JSON representation"),
                }
                .into())
            }
        };
        self.claims.insert(name, value);
        Ok(())
    }

    /// Adds a claim from any serializable value
    ///
    /// The value is converted to a [`JsonValue`] up front so anything without a JSON
    /// representation (such as a map with non-string keys) is rejected here rather
    /// than when the token is encoded.
    pub fn add_serializable<T: Serialize + ?Sized>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<()> {
        let name = name.into();
        let value = serde_json::to_value(value).map_err(|e| ClaimError::NotJson {
            name: name.clone(),
            details: ErrorDetails::map("json serialize failure", Box::new(e)),
        })?;
        self.add(name, value)
    }

    /// Removes a claim, failing with `ClaimError::NotFound` if it isn't present
    pub fn remove(&mut self, name: impl AsRef<str>) -> Result<JsonValue> {
        let name = name.as_ref();
        self.claims
            .remove(name)
            .ok_or_else(|| ClaimError::NotFound(name.to_owned()).into())
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&JsonValue> {
        self.claims.get(name.as_ref())
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.claims.contains_key(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        self.claims.iter()
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.claims
    }
}

impl From<Map<String, JsonValue>> for ClaimSet {
    fn from(claims: Map<String, JsonValue>) -> Self {
        ClaimSet { claims }
    }
}

impl From<ClaimSet> for Map<String, JsonValue> {
    fn from(claims: ClaimSet) -> Self {
        claims.claims
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = (&'a String, &'a JsonValue);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn duplicate_claim_keeps_first_value() {
        let mut claims = ClaimSet::new();
        claims.add("aud", "x").unwrap();
        match claims.add("aud", "y") {
            Err(Error::Claim(ClaimError::Duplicate(name))) => assert_eq!(name, "aud"),
            other => panic!("expected duplicate claim error, got {other:?}"),
        }
        assert_eq!(claims.get("aud"), Some(&json!("x")));
        assert_eq!(claims.len(), 1);
    }

    #[test]
    fn remove_missing_claim() {
        let mut claims = ClaimSet::new();
        assert!(matches!(
            claims.remove("sub"),
            Err(Error::Claim(ClaimError::NotFound(_)))
        ));

        claims.add(RegisteredClaim::Subject, "b@b.com").unwrap();
        assert_eq!(claims.remove(RegisteredClaim::Subject).unwrap(), json!("b@b.com"));
        assert!(claims.is_empty());
    }

    #[test]
    fn registered_claim_names() {
        assert_eq!(RegisteredClaim::Issuer.as_str(), "iss");
        assert_eq!(RegisteredClaim::Subject.as_str(), "sub");
        assert_eq!(RegisteredClaim::Audience.as_str(), "aud");
        assert_eq!(RegisteredClaim::ExpirationTime.as_str(), "exp");
        assert_eq!(RegisteredClaim::NotBefore.as_str(), "nbf");
        assert_eq!(RegisteredClaim::IssuedAt.as_str(), "iat");
        assert_eq!(RegisteredClaim::JwtId.as_str(), "jti");
    }

    #[test]
    fn serializable_values_become_json() {
        let mut claims = ClaimSet::new();
        claims.add_serializable("roles", &["admin", "dev"]).unwrap();
        assert_eq!(claims.get("roles"), Some(&json!(["admin", "dev"])));
    }

    #[test]
    fn non_json_values_are_rejected() {
        let mut weird: HashMap<(u8, u8), &str> = HashMap::new();
        weird.insert((1, 2), "tuple keys have no JSON form");

        let mut claims = ClaimSet::new();
        assert!(matches!(
            claims.add_serializable("weird", &weird),
            Err(Error::Claim(ClaimError::NotJson { .. }))
        ));
        assert!(!claims.contains("weird"));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let mut claims = ClaimSet::new();
        claims.add("ratio", 0.5).unwrap();

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                claims.add("score", value),
                Err(Error::Claim(ClaimError::NotJson { .. }))
            ));
        }
        assert!(matches!(
            claims.add("scores", vec![1.0, f64::NAN]),
            Err(Error::Claim(ClaimError::NotJson { .. }))
        ));
        assert!(matches!(
            claims.add("ratio32", f32::NAN),
            Err(Error::Claim(ClaimError::NotJson { .. }))
        ));

        assert_eq!(claims.len(), 1);
        assert_eq!(claims.get("ratio"), Some(&json!(0.5)));
        assert!(!claims.contains("score"));
    }
}
