use chrono::{DateTime, Duration, Utc};

use signedjwt::ClaimSet;

#[allow(dead_code)]
pub const REFERENCE_TIME: &str = "2019-11-29T19:50:15Z";

#[allow(dead_code)]
pub fn reference_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(REFERENCE_TIME)
        .expect("valid reference time")
        .with_timezone(&Utc)
}

/// An RFC 3339 timestamp `seconds` from now
#[allow(dead_code)]
pub fn rfc3339_from_now(seconds: i64) -> String {
    (Utc::now() + Duration::seconds(seconds)).to_rfc3339()
}

#[allow(dead_code)]
pub fn claims(entries: &[(&str, serde_json::Value)]) -> ClaimSet {
    let mut claims = ClaimSet::new();
    for (name, value) in entries {
        claims.add(*name, value.clone()).expect("unique claim names");
    }
    claims
}

/// Replaces the character at `index` with a different base64url character
#[allow(dead_code)]
pub fn flip_char(s: &str, index: usize) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}
