//! Error types for the SOAP WebAPI client.

use thiserror::Error;

use crate::error::ConfigError;

/// A SOAP fault returned by the WebAPI.
///
/// # Example
///
/// ```rust
/// use allegro_api::clients::webapi::SoapFault;
///
/// let fault = SoapFault {
///     code: "ERR_INVALID_COUNTRY".to_string(),
///     message: "Invalid country".to_string(),
/// };
/// assert_eq!(fault.to_string(), "SOAP fault ERR_INVALID_COUNTRY: Invalid country");
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("SOAP fault {code}: {message}")]
pub struct SoapFault {
    /// The `faultcode` element.
    pub code: String,
    /// The `faultstring` element.
    pub message: String,
}

/// Errors returned by [`WebApiClient`](super::WebApiClient) and
/// [`SoapTransport`](super::SoapTransport) implementations.
#[derive(Debug, Error)]
pub enum WebApiError {
    /// No version record exists for the configured country.
    #[error("Invalid country code {country}: the WebAPI returned no version record for it")]
    InvalidParameter {
        /// The configured country code.
        country: i64,
    },

    /// Action parameters have the wrong shape.
    #[error("Invalid arguments for action '{action}': {reason}")]
    InvalidArgument {
        /// The action as invoked by the caller.
        action: String,
        /// What is wrong with the arguments.
        reason: String,
    },

    /// The service answered with a SOAP fault.
    #[error(transparent)]
    Fault(#[from] SoapFault),

    /// The request envelope could not be written.
    #[error("Failed to encode SOAP request: {reason}")]
    Encode {
        /// Why encoding failed.
        reason: String,
    },

    /// The response could not be decoded as a SOAP envelope.
    #[error("Invalid SOAP response: {reason}")]
    InvalidResponse {
        /// Why decoding failed.
        reason: String,
    },

    /// A non-2xx status without a SOAP fault in the body.
    #[error("Unexpected HTTP status {status} from WebAPI")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// Network, TLS or request construction error.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// Verify WebApiError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebApiError>();
};
