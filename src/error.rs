//! Error types for the Allegro API client.
//!
//! This module contains configuration and validation errors shared by both
//! API surfaces. Transport-specific errors live next to their clients:
//! [`RestApiError`](crate::clients::RestApiError) for the REST API and
//! [`WebApiError`](crate::clients::webapi::WebApiError) for the SOAP WebAPI.
//!
//! # Example
//!
//! ```rust
//! use allegro_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// WebAPI key cannot be empty.
    #[error("WebAPI key cannot be empty. Please provide the key issued for your Allegro account.")]
    EmptyApiKey,

    /// OAuth client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide the secret of your registered application.")]
    EmptyClientSecret,

    /// An endpoint URL is invalid.
    #[error("Invalid URL '{url}'. Please provide an absolute URL with scheme (e.g., 'https://webapi.allegro.pl/service.php').")]
    InvalidUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Environment name is not recognised.
    #[error("Invalid environment '{name}'. Expected 'production' or 'sandbox'.")]
    InvalidEnvironment {
        /// The name that was provided.
        name: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
