//! Integration tests for the OAuth token grants.
//!
//! The grants are pointed at a mock token endpoint through
//! [`OAuthEndpoints::new`].

use allegro_api::auth::oauth::{OAuthEndpoints, OAuthError};
use allegro_api::auth::TokenResponse;
use allegro_api::{ClientSecret, EndpointUrl};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("client-id:client-secret")
const BASIC: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

fn endpoints(server: &MockServer) -> OAuthEndpoints {
    OAuthEndpoints::new(
        &EndpointUrl::new(format!("{}/auth/oauth/authorize", server.uri())).unwrap(),
        &EndpointUrl::new(format!("{}/auth/oauth/token", server.uri())).unwrap(),
    )
}

fn secret() -> ClientSecret {
    ClientSecret::new("client-secret").unwrap()
}

fn token_body() -> serde_json::Value {
    json!({
        "access_token": "eyJhbGciOiJSUzI1NiJ9.access",
        "token_type": "bearer",
        "refresh_token": "eyJhbGciOiJSUzI1NiJ9.refresh",
        "expires_in": 43199,
        "scope": "allegro:api:sale:offers:read",
        "jti": "b3b0a0b9"
    })
}

#[tokio::test]
async fn test_generate_token_posts_authorization_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/oauth/token"))
        .and(query_param("grant_type", "authorization_code"))
        .and(query_param("code", "auth-code"))
        .and(query_param("redirect_uri", "https://shop.example.com/callback"))
        .and(header("Authorization", BASIC))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let response = endpoints(&server)
        .generate_token(
            "auth-code",
            "client-id",
            &secret(),
            "https://shop.example.com/callback",
        )
        .await
        .unwrap();

    let token = TokenResponse::from_response(&response).unwrap();
    assert_eq!(token.access_token, "eyJhbGciOiJSUzI1NiJ9.access");
    assert_eq!(token.expires_in, Some(43199));
}

#[tokio::test]
async fn test_generate_token_for_application_uses_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/oauth/token"))
        .and(query_param("grant_type", "client_credentials"))
        .and(header("Authorization", BASIC))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "app-token",
            "token_type": "bearer",
            "expires_in": 43199
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = endpoints(&server)
        .generate_token_for_application("client-id", &secret())
        .await
        .unwrap();

    let token = TokenResponse::from_response(&response).unwrap();
    assert_eq!(token.access_token, "app-token");
    assert!(token.refresh_token.is_none());
}

#[tokio::test]
async fn test_refresh_token_posts_refresh_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/oauth/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(query_param("refresh_token", "old-refresh"))
        .and(query_param("redirect_uri", "https://shop.example.com/callback"))
        .and(header("Authorization", BASIC))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let response = endpoints(&server)
        .refresh_token(
            "old-refresh",
            "client-id",
            &secret(),
            "https://shop.example.com/callback",
        )
        .await
        .unwrap();

    assert!(response.is_ok());
}

#[tokio::test]
async fn test_rejected_code_raises_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .mount(&server)
        .await;

    let error = endpoints(&server)
        .generate_token("expired", "client-id", &secret(), "https://shop.example.com/callback")
        .await
        .unwrap_err();

    let remote = error.remote().expect("expected a remote error document");
    assert_eq!(remote.code, 400);
    assert!(remote.message.contains("invalid_grant"));
}

#[tokio::test]
async fn test_query_values_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("code", "a b&c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    endpoints(&server)
        .generate_token("a b&c", "client-id", &secret(), "https://x.example.com/?q=1")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.contains("code=a%20b%26c"));
    assert!(query.contains("redirect_uri=https%3A%2F%2Fx.example.com%2F%3Fq%3D1"));
}

#[tokio::test]
async fn test_unreadable_token_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let response = endpoints(&server)
        .generate_token_for_application("client-id", &secret())
        .await
        .unwrap();

    assert!(matches!(
        TokenResponse::from_response(&response),
        Err(OAuthError::InvalidTokenResponse { .. })
    ));
}

#[test]
fn test_auth_link_points_at_authorize_endpoint() {
    let endpoints = OAuthEndpoints::sandbox();
    let link = endpoints.auth_link("client-id", "https://shop.example.com/callback");

    assert!(link.starts_with("https://allegro.pl.allegrosandbox.pl/auth/oauth/authorize?"));
    assert!(link.contains("response_type=code"));
    assert!(link.contains("client_id=client-id"));
}
