//! REST client implementation for the Allegro REST API.
//!
//! This module provides the [`RestApiClient`] type. Verb methods funnel into
//! [`RestApiClient::send_request`], which resolves the URL, composes
//! headers, encodes the body and normalizes the JSON response.

use std::collections::HashMap;

use uuid::Uuid;

use crate::clients::errors::{RemoteApiError, RestApiError};
use crate::clients::http_client::{user_agent, HttpClient};
use crate::clients::http_request::{HttpMethod, RequestBody, RestRequest};
use crate::clients::http_response::{
    is_error_document, mentions_error_field, response_code, DecodedBody, RestResponse,
};
use crate::config::Environment;

/// Media type of REST request and response bodies.
pub const MEDIA_TYPE: &str = "application/vnd.allegro.public.v1+json";

/// Value of the default `Accept-Language` header.
pub const ACCEPT_LANGUAGE: &str = "pl-PL";

/// REST API client for Allegro.
///
/// Holds an optional bearer token and the environment that selects the base
/// URL. Each call issues exactly one HTTP request.
///
/// # Thread Safety
///
/// `RestApiClient` is `Send + Sync`. Changing the token requires `&mut self`.
///
/// # Example
///
/// ```rust,ignore
/// use allegro_api::RestApiClient;
///
/// let client = RestApiClient::new(Some("access-token".to_string()), false);
///
/// let response = client.get("/sale/user-ratings?user.id=12345", None).await?;
/// println!("Ratings: {:?}", response.get("ratings"));
///
/// let body = serde_json::json!({"name": "My offer"});
/// let response = client.post("/sale/product-offers", body, None).await?;
/// ```
#[derive(Debug)]
pub struct RestApiClient {
    http_client: HttpClient,
    token: Option<String>,
    environment: Environment,
    user_agent: String,
}

// Verify RestApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestApiClient>();
};

impl RestApiClient {
    /// Creates a new REST client.
    ///
    /// `token` may be `None` while a token is being acquired. `sandbox`
    /// selects the sandbox base URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use allegro_api::RestApiClient;
    ///
    /// let client = RestApiClient::new(None, true);
    /// assert_eq!(client.base_url(), "https://api.allegro.pl.allegrosandbox.pl");
    /// ```
    #[must_use]
    pub fn new(token: Option<String>, sandbox: bool) -> Self {
        Self::with_environment(token, Environment::from_sandbox(sandbox))
    }

    /// Creates a new REST client for an explicit [`Environment`].
    #[must_use]
    pub fn with_environment(token: Option<String>, environment: Environment) -> Self {
        Self {
            http_client: HttpClient::new(),
            token,
            environment,
            user_agent: user_agent(None),
        }
    }

    /// Replaces the `User-Agent` with one carrying the given prefix.
    #[must_use]
    pub fn with_user_agent_prefix(mut self, prefix: &str) -> Self {
        self.user_agent = user_agent(Some(prefix));
        self
    }

    /// Replaces the underlying HTTP transport.
    #[must_use]
    pub fn with_http_client(mut self, http_client: HttpClient) -> Self {
        self.http_client = http_client;
        self
    }

    /// Returns the bearer token, if set.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replaces the bearer token, e.g. after a refresh.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Returns the environment this client talks to.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns `true` when the sandbox is used.
    #[must_use]
    pub const fn is_sandbox(&self) -> bool {
        self.environment.is_sandbox()
    }

    /// Returns the base URL for relative resources.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        self.environment.rest_url()
    }

    /// Generates a random UUID v4, as required for command and offer ids.
    #[must_use]
    pub fn uuid() -> Uuid {
        Uuid::new_v4()
    }

    /// Resolves a resource against the base URL.
    ///
    /// Absolute URLs are returned unchanged; paths are joined to the base
    /// URL with exactly one slash.
    ///
    /// ```rust
    /// use allegro_api::RestApiClient;
    ///
    /// let client = RestApiClient::new(None, false);
    /// assert_eq!(client.resolve_url("/sale/offers"), "https://api.allegro.pl/sale/offers");
    /// assert_eq!(client.resolve_url("https://other.example.com/x"), "https://other.example.com/x");
    /// ```
    #[must_use]
    pub fn resolve_url(&self, resource: &str) -> String {
        resolve_url(self.base_url(), resource)
    }

    /// Returns the headers sent with every request before caller overrides.
    #[must_use]
    pub fn default_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        if let Some(token) = &self.token {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        headers.insert("Content-Type".to_string(), MEDIA_TYPE.to_string());
        headers.insert("Accept".to_string(), MEDIA_TYPE.to_string());
        headers.insert("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string());
        headers
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`send_request`](Self::send_request).
    pub async fn get(
        &self,
        resource: &str,
        headers: Option<HashMap<String, String>>,
    ) -> Result<RestResponse, RestApiError> {
        self.make_request(HttpMethod::Get, resource, None, headers)
            .await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`send_request`](Self::send_request).
    pub async fn post(
        &self,
        resource: &str,
        body: serde_json::Value,
        headers: Option<HashMap<String, String>>,
    ) -> Result<RestResponse, RestApiError> {
        self.make_request(
            HttpMethod::Post,
            resource,
            Some(RequestBody::Json(body)),
            headers,
        )
        .await
    }

    /// Sends a POST request with a body that is not JSON-encoded.
    ///
    /// Pair it with a `Content-Type` header describing the body.
    ///
    /// # Errors
    ///
    /// See [`send_request`](Self::send_request).
    pub async fn post_raw(
        &self,
        resource: &str,
        body: impl Into<String>,
        headers: Option<HashMap<String, String>>,
    ) -> Result<RestResponse, RestApiError> {
        self.make_request(
            HttpMethod::Post,
            resource,
            Some(RequestBody::Raw(body.into())),
            headers,
        )
        .await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`send_request`](Self::send_request).
    pub async fn put(
        &self,
        resource: &str,
        body: serde_json::Value,
        headers: Option<HashMap<String, String>>,
    ) -> Result<RestResponse, RestApiError> {
        self.make_request(
            HttpMethod::Put,
            resource,
            Some(RequestBody::Json(body)),
            headers,
        )
        .await
    }

    /// Sends a PUT request with a body that is not JSON-encoded.
    ///
    /// # Errors
    ///
    /// See [`send_request`](Self::send_request).
    pub async fn put_raw(
        &self,
        resource: &str,
        body: impl Into<String>,
        headers: Option<HashMap<String, String>>,
    ) -> Result<RestResponse, RestApiError> {
        self.make_request(
            HttpMethod::Put,
            resource,
            Some(RequestBody::Raw(body.into())),
            headers,
        )
        .await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`send_request`](Self::send_request).
    pub async fn delete(
        &self,
        resource: &str,
        headers: Option<HashMap<String, String>>,
    ) -> Result<RestResponse, RestApiError> {
        self.make_request(HttpMethod::Delete, resource, None, headers)
            .await
    }

    async fn make_request(
        &self,
        method: HttpMethod,
        resource: &str,
        body: Option<RequestBody>,
        headers: Option<HashMap<String, String>>,
    ) -> Result<RestResponse, RestApiError> {
        let request = RestRequest::builder(method, resource)
            .body(body)
            .headers(headers.unwrap_or_default())
            .build();

        self.send_request(request).await
    }

    /// Sends a request and normalizes the response.
    ///
    /// Non-2xx statuses are not errors by themselves: the body decides. A
    /// body with an `errors` or `error_description` field becomes
    /// [`RestApiError::Remote`]; a bare array is wrapped under `array`; an
    /// empty or non-JSON body becomes `{}`.
    ///
    /// # Errors
    ///
    /// - [`RestApiError::Remote`] when the body is an error document
    /// - [`RestApiError::Network`] on transport failure
    /// - [`RestApiError::Serialize`] if a JSON body cannot be encoded
    pub async fn send_request(&self, request: RestRequest) -> Result<RestResponse, RestApiError> {
        let url = self.resolve_url(&request.resource);
        let request_headers = merge_headers(&self.default_headers(), &request.headers);
        let body = request.body.as_ref().map(RequestBody::encode).transpose()?;

        tracing::debug!(method = %request.method, url = %url, "Sending REST request");

        let raw = self
            .http_client
            .send(request.method, &url, &request_headers, body)
            .await?;
        let response_headers = raw.header_lines();

        let body = match DecodedBody::decode(&raw.body) {
            DecodedBody::Object(body) if is_error_document(&body) => {
                let body = serde_json::Value::Object(body);
                let dump = serde_json::to_string_pretty(&body).unwrap_or_default();
                return Err(RemoteApiError {
                    code: response_code(&response_headers),
                    message: format!("An error has occurred: {dump}"),
                    body: Some(body),
                }
                .into());
            }
            DecodedBody::Malformed if mentions_error_field(&raw.body) => {
                return Err(RemoteApiError {
                    code: response_code(&response_headers),
                    message: format!("An error has occurred: {}", raw.body),
                    body: None,
                }
                .into());
            }
            DecodedBody::Object(body) => body,
            DecodedBody::NotAnObject | DecodedBody::Malformed => serde_json::Map::new(),
        };

        Ok(RestResponse {
            status: raw.status,
            body,
            request_headers,
            response_headers,
        })
    }
}

/// Joins `resource` to `base_url` unless it is already an absolute URL.
#[must_use]
pub fn resolve_url(base_url: &str, resource: &str) -> String {
    if is_absolute_url(resource) {
        return resource.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        resource.trim_start_matches('/')
    )
}

fn is_absolute_url(resource: &str) -> bool {
    resource.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic())
    })
}

/// Overlays `overrides` on `defaults`.
///
/// Keys are compared case-insensitively; on collision the override wins and
/// its spelling of the key is kept.
///
/// ```rust
/// use allegro_api::clients::merge_headers;
/// use std::collections::HashMap;
///
/// let defaults = HashMap::from([("A".to_string(), "1".to_string()), ("B".to_string(), "2".to_string())]);
/// let overrides = HashMap::from([("B".to_string(), "3".to_string()), ("C".to_string(), "4".to_string())]);
///
/// let merged = merge_headers(&defaults, &overrides);
/// assert_eq!(merged.len(), 3);
/// assert_eq!(merged["A"], "1");
/// assert_eq!(merged["B"], "3");
/// assert_eq!(merged["C"], "4");
/// ```
#[must_use]
pub fn merge_headers(
    defaults: &HashMap<String, String>,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut headers = defaults.clone();
    for (key, value) in overrides {
        headers.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
        headers.insert(key.clone(), value.clone());
    }
    headers
}
