//! Validated newtype wrappers for configuration values.
//!
//! Invalid values are rejected on construction with a [`ConfigError`].

use crate::error::ConfigError;
use std::fmt;

/// A validated Allegro WebAPI key.
///
/// The key is sent with every WebAPI action, so its `Debug` output is masked
/// to keep it out of logs.
///
/// # Example
///
/// ```rust
/// use allegro_api::ApiKey;
///
/// let key = ApiKey::new("my-webapi-key").unwrap();
/// assert_eq!(key.as_ref(), "my-webapi-key");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated WebAPI key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated OAuth client secret.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ClientSecret(*****)`.
///
/// ```rust
/// use allegro_api::ClientSecret;
///
/// let secret = ClientSecret::new("s3cret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A validated absolute endpoint URL.
///
/// Used to point a client at a proxy or a local test server instead of the
/// fixed Allegro hosts.
///
/// # Example
///
/// ```rust
/// use allegro_api::EndpointUrl;
///
/// let url = EndpointUrl::new("http://127.0.0.1:8080/service.php?wsdl").unwrap();
/// assert_eq!(url.without_query(), "http://127.0.0.1:8080/service.php");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointUrl {
    url: String,
}

impl EndpointUrl {
    /// Creates a new validated endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidUrl { url });
        }

        let host_start = scheme_end + 3;
        let host_end = url[host_start..]
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidUrl { url });
        }

        Ok(Self { url })
    }

    /// Returns the URL with any query string or fragment removed.
    ///
    /// SOAP requests are posted to the service URL, not to `?wsdl`.
    #[must_use]
    pub fn without_query(&self) -> &str {
        self.url
            .find(['?', '#'])
            .map_or(self.url.as_str(), |i| &self.url[..i])
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty() {
        assert_eq!(ApiKey::new(""), Err(ConfigError::EmptyApiKey));
        assert_eq!(ApiKey::new("   "), Err(ConfigError::EmptyApiKey));
    }

    #[test]
    fn test_api_key_debug_is_masked() {
        let key = ApiKey::new("super-secret-key").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret-key"));
    }

    #[test]
    fn test_client_secret_rejects_empty() {
        assert_eq!(ClientSecret::new(""), Err(ConfigError::EmptyClientSecret));
    }

    #[test]
    fn test_endpoint_url_requires_scheme() {
        assert!(matches!(
            EndpointUrl::new("webapi.allegro.pl/service.php"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_endpoint_url_requires_host() {
        assert!(matches!(
            EndpointUrl::new("https:///service.php"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_endpoint_url_without_query() {
        let url = EndpointUrl::new("https://webapi.allegro.pl/service.php?wsdl").unwrap();
        assert_eq!(url.without_query(), "https://webapi.allegro.pl/service.php");
        assert_eq!(url.as_ref(), "https://webapi.allegro.pl/service.php?wsdl");
    }

    #[test]
    fn test_endpoint_url_without_query_is_identity_when_absent() {
        let url = EndpointUrl::new("http://localhost:9000").unwrap();
        assert_eq!(url.without_query(), "http://localhost:9000");
    }
}
