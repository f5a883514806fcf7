//! Allegro deployment environments.
//!
//! This module provides the [`Environment`] enum selecting between the
//! production platform and the sandbox, together with the fixed host URLs of
//! each API surface.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// REST API base URL for production.
pub const REST_URL: &str = "https://api.allegro.pl";

/// REST API base URL for the sandbox.
pub const REST_SANDBOX_URL: &str = "https://api.allegro.pl.allegrosandbox.pl";

/// WebAPI WSDL URL for production.
pub const WEBAPI_URL: &str = "https://webapi.allegro.pl/service.php?wsdl";

/// WebAPI WSDL URL for the sandbox.
pub const WEBAPI_SANDBOX_URL: &str = "https://webapi.allegro.pl.webapisandbox.pl/service.php?wsdl";

/// WebAPI service URL for production. SOAP requests are posted here.
pub const WEBAPI_SERVICE_URL: &str = "https://webapi.allegro.pl/service.php";

/// WebAPI service URL for the sandbox.
pub const WEBAPI_SANDBOX_SERVICE_URL: &str = "https://webapi.allegro.pl.webapisandbox.pl/service.php";

/// Target namespace of the production WSDL.
pub const WEBAPI_NAMESPACE: &str = "https://webapi.allegro.pl/service.php";

/// Target namespace of the sandbox WSDL.
pub const WEBAPI_SANDBOX_NAMESPACE: &str = "urn:SandboxWebApi";

/// OAuth base URL for production.
pub const AUTH_URL: &str = "https://allegro.pl/auth/oauth";

/// OAuth base URL for the sandbox.
pub const AUTH_SANDBOX_URL: &str = "https://allegro.pl.allegrosandbox.pl/auth/oauth";

/// Country code used when none is configured (Poland).
pub const HOME_COUNTRY: i64 = 1;

/// The Allegro deployment a client talks to.
///
/// # Example
///
/// ```rust
/// use allegro_api::Environment;
///
/// let env = Environment::from_sandbox(true);
/// assert_eq!(env, Environment::Sandbox);
/// assert_eq!(env.rest_url(), "https://api.allegro.pl.allegrosandbox.pl");
///
/// let env: Environment = "production".parse().unwrap();
/// assert!(!env.is_sandbox());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The live platform.
    #[default]
    Production,
    /// The non-production sandbox with its own hosts and data.
    Sandbox,
}

impl Environment {
    /// Maps the legacy `sandbox` flag onto an environment.
    #[must_use]
    pub const fn from_sandbox(sandbox: bool) -> Self {
        if sandbox {
            Self::Sandbox
        } else {
            Self::Production
        }
    }

    /// Returns `true` for [`Environment::Sandbox`].
    #[must_use]
    pub const fn is_sandbox(self) -> bool {
        matches!(self, Self::Sandbox)
    }

    /// Returns the REST API base URL.
    #[must_use]
    pub const fn rest_url(self) -> &'static str {
        match self {
            Self::Production => REST_URL,
            Self::Sandbox => REST_SANDBOX_URL,
        }
    }

    /// Returns the WebAPI WSDL URL.
    #[must_use]
    pub const fn webapi_url(self) -> &'static str {
        match self {
            Self::Production => WEBAPI_URL,
            Self::Sandbox => WEBAPI_SANDBOX_URL,
        }
    }

    /// Returns the WebAPI service URL, the WSDL URL without `?wsdl`.
    #[must_use]
    pub const fn webapi_service_url(self) -> &'static str {
        match self {
            Self::Production => WEBAPI_SERVICE_URL,
            Self::Sandbox => WEBAPI_SANDBOX_SERVICE_URL,
        }
    }

    /// Returns the namespace of WebAPI request elements.
    ///
    /// This follows the environment only. An endpoint override does not
    /// change it.
    #[must_use]
    pub const fn webapi_namespace(self) -> &'static str {
        match self {
            Self::Production => WEBAPI_NAMESPACE,
            Self::Sandbox => WEBAPI_SANDBOX_NAMESPACE,
        }
    }

    /// Returns the OAuth base URL (authorize and token endpoints live below it).
    #[must_use]
    pub const fn auth_url(self) -> &'static str {
        match self {
            Self::Production => AUTH_URL,
            Self::Sandbox => AUTH_SANDBOX_URL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Sandbox => f.write_str("sandbox"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            _ => Err(ConfigError::InvalidEnvironment {
                name: s.to_string(),
            }),
        }
    }
}
