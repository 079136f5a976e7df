use tokio_test::*;

use serde_json::json;

use signedjwt as jwt;
use jwt::{AlgorithmType, Config, Token, TokenState};

mod common;
use common::claims;

const NONE_HEADER: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";

fn unsecured() -> Config {
    Config::create().allow_unsecured().build()
}

#[test]
fn jwt_name() {
    assert_eq!(AlgorithmType::NONE.name(), "none");
    assert_eq!("none".parse::<AlgorithmType>().unwrap(), AlgorithmType::NONE);
}

#[test]
fn encode_none() {
    let mut token = Token::new(
        AlgorithmType::NONE,
        claims(&[("aud", json!("developers"))]),
        "",
    )
    .unwrap();
    let compact = token.encode().unwrap();
    assert_eq!(compact, format!("{NONE_HEADER}.eyJhdWQiOiJkZXZlbG9wZXJzIn0."));
    assert!(token.signature().is_empty());
}

#[test]
fn round_trip_with_opt_in() {
    let mut token = Token::new(
        AlgorithmType::NONE,
        claims(&[("aud", json!("developers"))]),
        "",
    )
    .unwrap();
    let compact = token.encode().unwrap();

    let mut token = jwt::parse_with_config(compact, "", unsecured()).unwrap();
    assert_eq!(token.algorithm(), Some(&AlgorithmType::NONE));
    assert!(assert_ok!(token.validate()));
    assert_eq!(token.state(), TokenState::Verified);
    assert_eq!(token.claims().get("aud").unwrap(), "developers");
}

#[test]
#[should_panic(expected = "UnsecuredNotAllowed")]
fn rejected_by_default() {
    let compact = format!("{NONE_HEADER}.eyJhdWQiOiJkZXZlbG9wZXJzIn0.");
    let _token = jwt::parse_and_validate(compact, "", Config::default()).unwrap();
}

#[test]
#[should_panic(expected = "SignatureMismatch")]
fn none_with_non_empty_signature() {
    let compact = format!("{NONE_HEADER}.eyJhdWQiOiJkZXZlbG9wZXJzIn0.c0zGLzKEFWj0VxWuufTXiRMk5tlI5MbGDAYhzaxIYjo");
    let _token = jwt::parse_and_validate(compact, "", unsecured()).unwrap();
}

#[test]
fn downgrade_to_none() {
    // An HS256 token with its header swapped for one claiming "alg":"none"
    let compact = format!(
        "{NONE_HEADER}.eyJhdWQiOiJkZXZlbG9wZXJzIn0.4kNVyvKLfe6fuioUgM3rbWZ2PRQXRwYcC0c6cCQclGo"
    );
    assert_err!(jwt::parse_and_validate(compact.clone(), "TEST", Config::default()));
    assert_err!(jwt::parse_and_validate(compact.clone(), "TEST", unsecured()));

    let stripped = format!("{NONE_HEADER}.eyJhdWQiOiJkZXZlbG9wZXJzIn0.");
    let config = Config::create()
        .allow_unsecured()
        .algorithm(AlgorithmType::HS256)
        .build();
    assert_err!(jwt::parse_and_validate(stripped, "TEST", config));
}
