//! Authorization link and token grants against a pair of OAuth endpoints.

use base64::prelude::*;

use crate::auth::oauth::OAuthError;
use crate::clients::{HttpMethod, RestApiClient, RestRequest, RestResponse};
use crate::config::{ClientSecret, EndpointUrl, Environment, AUTH_URL};

const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";
const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";
const REFRESH_TOKEN_GRANT: &str = "refresh_token";

/// The authorize and token URLs of an OAuth server.
///
/// # Example
///
/// ```rust
/// use allegro_api::auth::oauth::OAuthEndpoints;
///
/// let endpoints = OAuthEndpoints::sandbox();
/// assert_eq!(endpoints.token_url(), "https://allegro.pl.allegrosandbox.pl/auth/oauth/token");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthEndpoints {
    authorize_url: String,
    token_url: String,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self::production()
    }
}

impl OAuthEndpoints {
    /// Endpoints below an explicit pair of URLs, e.g. a local mock server.
    #[must_use]
    pub fn new(authorize_url: &EndpointUrl, token_url: &EndpointUrl) -> Self {
        Self {
            authorize_url: authorize_url.as_ref().to_string(),
            token_url: token_url.as_ref().to_string(),
        }
    }

    /// The production endpoints below [`AUTH_URL`].
    #[must_use]
    pub fn production() -> Self {
        Self::below(AUTH_URL)
    }

    /// The sandbox endpoints.
    #[must_use]
    pub fn sandbox() -> Self {
        Self::for_environment(Environment::Sandbox)
    }

    /// The endpoints of `environment`.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        Self::below(environment.auth_url())
    }

    fn below(base: &str) -> Self {
        Self {
            authorize_url: format!("{base}/authorize"),
            token_url: format!("{base}/token"),
        }
    }

    /// Returns the authorize URL.
    #[must_use]
    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    /// Returns the token URL.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Builds the link the user opens to grant access.
    #[must_use]
    pub fn auth_link(&self, client_id: &str, redirect_uri: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}",
            self.authorize_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri)
        )
    }

    /// Exchanges an authorization code for a token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Request`] on transport failure or when the
    /// endpoint answers with an error document.
    pub async fn generate_token(
        &self,
        code: &str,
        client_id: &str,
        client_secret: &ClientSecret,
        redirect_uri: &str,
    ) -> Result<RestResponse, OAuthError> {
        self.request_token(
            HttpMethod::Post,
            &[
                ("grant_type", AUTHORIZATION_CODE_GRANT),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ],
            client_id,
            client_secret,
        )
        .await
    }

    /// Obtains an application token with the client credentials grant.
    ///
    /// # Errors
    ///
    /// Same as [`generate_token`](Self::generate_token).
    pub async fn generate_token_for_application(
        &self,
        client_id: &str,
        client_secret: &ClientSecret,
    ) -> Result<RestResponse, OAuthError> {
        self.request_token(
            HttpMethod::Get,
            &[("grant_type", CLIENT_CREDENTIALS_GRANT)],
            client_id,
            client_secret,
        )
        .await
    }

    /// Exchanges a refresh token for a new token.
    ///
    /// # Errors
    ///
    /// Same as [`generate_token`](Self::generate_token).
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
        client_id: &str,
        client_secret: &ClientSecret,
        redirect_uri: &str,
    ) -> Result<RestResponse, OAuthError> {
        self.request_token(
            HttpMethod::Post,
            &[
                ("grant_type", REFRESH_TOKEN_GRANT),
                ("refresh_token", refresh_token),
                ("redirect_uri", redirect_uri),
            ],
            client_id,
            client_secret,
        )
        .await
    }

    async fn request_token(
        &self,
        method: HttpMethod,
        query: &[(&str, &str)],
        client_id: &str,
        client_secret: &ClientSecret,
    ) -> Result<RestResponse, OAuthError> {
        let query = query
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}?{query}", self.token_url);

        tracing::debug!(method = %method, token_url = %self.token_url, "Requesting OAuth token");

        let request = RestRequest::builder(method, url)
            .header("Authorization", basic_authorization(client_id, client_secret))
            .build();

        Ok(RestApiClient::new(None, false).send_request(request).await?)
    }
}

/// Builds the `Basic` authorization value for a client id and secret.
///
/// ```rust
/// use allegro_api::auth::oauth::basic_authorization;
/// use allegro_api::ClientSecret;
///
/// let secret = ClientSecret::new("secret").unwrap();
/// assert_eq!(basic_authorization("id", &secret), "Basic aWQ6c2VjcmV0");
/// ```
#[must_use]
pub fn basic_authorization(client_id: &str, client_secret: &ClientSecret) -> String {
    let credentials = format!("{client_id}:{}", client_secret.as_ref());
    format!("Basic {}", BASE64_STANDARD.encode(credentials))
}
