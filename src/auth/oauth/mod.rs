//! OAuth 2.0 helpers for the Allegro REST API.
//!
//! Three grants are supported, all sent to the token endpoint with the
//! parameters in the query string and the client credentials in a `Basic`
//! authorization header:
//!
//! - [`generate_token`]: authorization code grant, after the user followed
//!   the link from [`auth_link`]
//! - [`generate_token_for_application`]: client credentials grant
//! - [`refresh_token`]: refresh token grant
//!
//! The free functions target production. Use [`OAuthEndpoints`] for the
//! sandbox or a custom host.
//!
//! # Example
//!
//! ```rust,ignore
//! use allegro_api::auth::oauth::{auth_link, generate_token};
//! use allegro_api::auth::TokenResponse;
//! use allegro_api::RestApiClient;
//!
//! // Redirect the user here
//! let link = auth_link("client-id", "https://shop.example.com/allegro/callback");
//!
//! // On callback, exchange the `code` query parameter
//! let response = generate_token(&code, "client-id", "client-secret", "https://shop.example.com/allegro/callback").await?;
//! let token = TokenResponse::from_response(&response)?;
//!
//! let client = RestApiClient::new(Some(token.access_token), false);
//! ```

mod endpoints;
mod error;

pub use endpoints::{basic_authorization, OAuthEndpoints};
pub use error::OAuthError;

use crate::clients::RestResponse;
use crate::config::ClientSecret;

/// Builds the production authorization link.
///
/// ```rust
/// use allegro_api::auth::oauth::auth_link;
///
/// assert_eq!(
///     auth_link("abc", "https://localhost/cb"),
///     "https://allegro.pl/auth/oauth/authorize?response_type=code&client_id=abc&redirect_uri=https%3A%2F%2Flocalhost%2Fcb"
/// );
/// ```
#[must_use]
pub fn auth_link(client_id: &str, redirect_uri: &str) -> String {
    OAuthEndpoints::production().auth_link(client_id, redirect_uri)
}

/// Exchanges an authorization code for a token on production.
///
/// # Errors
///
/// - [`OAuthError::Config`] if `client_secret` is empty
/// - [`OAuthError::Request`] on transport failure or an error document
pub async fn generate_token(
    code: &str,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
) -> Result<RestResponse, OAuthError> {
    let client_secret = ClientSecret::new(client_secret)?;
    OAuthEndpoints::production()
        .generate_token(code, client_id, &client_secret, redirect_uri)
        .await
}

/// Obtains an application token on production.
///
/// # Errors
///
/// Same as [`generate_token`].
pub async fn generate_token_for_application(
    client_id: &str,
    client_secret: &str,
) -> Result<RestResponse, OAuthError> {
    let client_secret = ClientSecret::new(client_secret)?;
    OAuthEndpoints::production()
        .generate_token_for_application(client_id, &client_secret)
        .await
}

/// Refreshes a token on production.
///
/// # Errors
///
/// Same as [`generate_token`].
pub async fn refresh_token(
    refresh_token: &str,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
) -> Result<RestResponse, OAuthError> {
    let client_secret = ClientSecret::new(client_secret)?;
    OAuthEndpoints::production()
        .refresh_token(refresh_token, client_id, &client_secret, redirect_uri)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[tokio::test]
    async fn test_empty_secret_is_rejected_before_sending() {
        let result = generate_token_for_application("client-id", "").await;
        assert!(matches!(
            result,
            Err(OAuthError::Config(ConfigError::EmptyClientSecret))
        ));
    }
}
