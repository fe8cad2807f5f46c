// libs/auth-cell/tests/handlers_test.rs
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};

use auth_cell::handlers::{validate_token, verify_token};
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Authorization",
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn validate_accepts_a_good_token() {
    let config = TestConfig::default();
    let user = TestUser::professional("pro@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

    let response = validate_token(State(config.to_arc()), bearer_headers(&token))
        .await
        .unwrap();

    assert!(response.0.valid);
    assert_eq!(response.0.user_id, user.id);
    assert_eq!(response.0.role.as_deref(), Some("professional"));
}

#[tokio::test]
async fn validate_rejects_an_expired_token() {
    let config = TestConfig::default();
    let user = TestUser::default();
    let token = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);

    let result = validate_token(State(config.to_arc()), bearer_headers(&token)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn validate_rejects_missing_header() {
    let config = TestConfig::default();

    let result = validate_token(State(config.to_arc()), HeaderMap::new()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn verify_reports_invalid_tokens_without_erroring() {
    let config = TestConfig::default();
    let user = TestUser::default();
    let token = JwtTestUtils::create_invalid_signature_token(&user);

    let response = verify_token(State(config.to_arc()), bearer_headers(&token))
        .await
        .unwrap();

    assert_eq!(response.0["valid"], false);
}

#[tokio::test]
async fn verify_confirms_valid_tokens() {
    let config = TestConfig::default();
    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

    let response = verify_token(State(config.to_arc()), bearer_headers(&token))
        .await
        .unwrap();

    assert_eq!(response.0["valid"], true);
}
