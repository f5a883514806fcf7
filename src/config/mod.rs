//! Configuration types for the Allegro API client.
//!
//! # Overview
//!
//! - [`WebApiConfig`]: immutable settings for the SOAP WebAPI client
//! - [`WebApiConfigBuilder`]: builder for [`WebApiConfig`]
//! - [`ApiKey`]: validated WebAPI key with masked debug output
//! - [`ClientSecret`]: validated OAuth client secret with masked debug output
//! - [`EndpointUrl`]: validated absolute URL for endpoint overrides
//! - [`Environment`]: production or sandbox, with the fixed host URLs
//!
//! # Example
//!
//! ```rust
//! use allegro_api::{ApiKey, Environment, WebApiConfig};
//!
//! let config = WebApiConfig::builder()
//!     .api_key(ApiKey::new("my-webapi-key").unwrap())
//!     .environment(Environment::Sandbox)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.country(), 1);
//! ```

mod environment;
mod newtypes;

pub use environment::{
    Environment, AUTH_SANDBOX_URL, AUTH_URL, HOME_COUNTRY, REST_SANDBOX_URL, REST_URL,
    WEBAPI_NAMESPACE, WEBAPI_SANDBOX_NAMESPACE, WEBAPI_SANDBOX_SERVICE_URL, WEBAPI_SANDBOX_URL,
    WEBAPI_SERVICE_URL, WEBAPI_URL,
};
pub use newtypes::{ApiKey, ClientSecret, EndpointUrl};

use crate::error::ConfigError;

/// Element name that the WebAPI uses for members of every array type.
pub const DEFAULT_SEQUENCE_ELEMENT: &str = "item";

/// Configuration for [`WebApiClient`](crate::clients::webapi::WebApiClient).
///
/// # Thread Safety
///
/// `WebApiConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct WebApiConfig {
    api_key: ApiKey,
    country: i64,
    environment: Environment,
    endpoint: Option<EndpointUrl>,
    sequence_elements: Vec<String>,
    user_agent_prefix: Option<String>,
}

impl WebApiConfig {
    /// Creates a new builder for constructing a `WebApiConfig`.
    #[must_use]
    pub fn builder() -> WebApiConfigBuilder {
        WebApiConfigBuilder::new()
    }

    /// Returns the WebAPI key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the country code sent with every action.
    #[must_use]
    pub const fn country(&self) -> i64 {
        self.country
    }

    /// Returns the configured environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the explicit endpoint override, if any.
    #[must_use]
    pub const fn endpoint(&self) -> Option<&EndpointUrl> {
        self.endpoint.as_ref()
    }

    /// Returns the WSDL URL the client connects to.
    ///
    /// This is the endpoint override when set, otherwise the fixed URL of the
    /// configured environment.
    #[must_use]
    pub fn wsdl_url(&self) -> &str {
        self.endpoint
            .as_ref()
            .map_or_else(|| self.environment.webapi_url(), |url| url.as_ref())
    }

    /// Returns the element names that always decode as sequences.
    #[must_use]
    pub fn sequence_elements(&self) -> &[String] {
        &self.sequence_elements
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify WebApiConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebApiConfig>();
};

/// Builder for [`WebApiConfig`].
///
/// `api_key` is required.
///
/// # Defaults
///
/// - `country`: [`HOME_COUNTRY`]
/// - `environment`: [`Environment::Production`]
/// - `endpoint`: `None`
/// - `sequence_elements`: `["item"]`
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct WebApiConfigBuilder {
    api_key: Option<ApiKey>,
    country: Option<i64>,
    environment: Option<Environment>,
    endpoint: Option<EndpointUrl>,
    sequence_elements: Option<Vec<String>>,
    user_agent_prefix: Option<String>,
}

impl WebApiConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the WebAPI key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the country code.
    #[must_use]
    pub const fn country(mut self, country: i64) -> Self {
        self.country = Some(country);
        self
    }

    /// Sets the environment.
    #[must_use]
    pub const fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Shorthand for `environment(Environment::from_sandbox(sandbox))`.
    #[must_use]
    pub const fn sandbox(self, sandbox: bool) -> Self {
        self.environment(Environment::from_sandbox(sandbox))
    }

    /// Overrides the WSDL URL, e.g. to go through a proxy.
    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointUrl) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Replaces the element names that always decode as sequences.
    #[must_use]
    pub fn sequence_elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sequence_elements = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the user agent prefix for SOAP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`WebApiConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` is not set.
    pub fn build(self) -> Result<WebApiConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        Ok(WebApiConfig {
            api_key,
            country: self.country.unwrap_or(HOME_COUNTRY),
            environment: self.environment.unwrap_or_default(),
            endpoint: self.endpoint,
            sequence_elements: self
                .sequence_elements
                .unwrap_or_else(|| vec![DEFAULT_SEQUENCE_ELEMENT.to_string()]),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ApiKey {
        ApiKey::new("webapi-key").unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = WebApiConfigBuilder::new().country(56).build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = WebApiConfig::builder().api_key(key()).build().unwrap();

        assert_eq!(config.country(), HOME_COUNTRY);
        assert_eq!(config.environment(), Environment::Production);
        assert!(config.endpoint().is_none());
        assert_eq!(config.sequence_elements(), ["item".to_string()]);
        assert!(config.user_agent_prefix().is_none());
        assert_eq!(config.wsdl_url(), WEBAPI_URL);
    }

    #[test]
    fn test_sandbox_selects_sandbox_wsdl() {
        let config = WebApiConfig::builder()
            .api_key(key())
            .sandbox(true)
            .build()
            .unwrap();

        assert_eq!(config.wsdl_url(), WEBAPI_SANDBOX_URL);
    }

    #[test]
    fn test_endpoint_override_wins_over_environment() {
        let endpoint = EndpointUrl::new("http://127.0.0.1:4000/service.php?wsdl").unwrap();
        let config = WebApiConfig::builder()
            .api_key(key())
            .sandbox(true)
            .endpoint(endpoint)
            .build()
            .unwrap();

        assert_eq!(config.wsdl_url(), "http://127.0.0.1:4000/service.php?wsdl");
    }

    #[test]
    fn test_custom_sequence_elements() {
        let config = WebApiConfig::builder()
            .api_key(key())
            .sequence_elements(["item", "row"])
            .build()
            .unwrap();

        assert_eq!(config.sequence_elements().len(), 2);
    }

    #[test]
    fn test_config_debug_masks_key() {
        let config = WebApiConfig::builder().api_key(key()).build().unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("WebApiConfig"));
        assert!(!debug.contains("webapi-key"));
    }
}
