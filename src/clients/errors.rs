//! Error types for the REST API client.
//!
//! - [`RemoteApiError`]: the API answered with an error document
//! - [`RestApiError`]: unified error type for REST and OAuth operations
//!
//! # Example
//!
//! ```rust,ignore
//! use allegro_api::clients::{RestApiClient, RestApiError};
//!
//! match client.get("/sale/offers", None).await {
//!     Ok(response) => println!("Offers: {:?}", response.body),
//!     Err(RestApiError::Remote(e)) => {
//!         println!("API error {}: {}", e.code, e.message);
//!     }
//!     Err(RestApiError::Network(e)) => println!("Network error: {e}"),
//!     Err(RestApiError::Serialize(e)) => println!("Bad request body: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when the response body carries an `errors` or
/// `error_description` field.
///
/// Raised regardless of the HTTP status code.
///
/// # Example
///
/// ```rust
/// use allegro_api::clients::RemoteApiError;
///
/// let error = RemoteApiError {
///     code: 401,
///     message: "An error has occurred: {\"error\": \"invalid_token\"}".to_string(),
///     body: None,
/// };
///
/// assert!(error.to_string().contains("invalid_token"));
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RemoteApiError {
    /// HTTP status code parsed from the status line, or 0 if unavailable.
    pub code: u16,
    /// Human-readable dump of the full response.
    pub message: String,
    /// The decoded response object. `None` when the body was not valid JSON.
    pub body: Option<serde_json::Value>,
}

/// Unified error type for REST API and OAuth operations.
#[derive(Debug, Error)]
pub enum RestApiError {
    /// The remote service returned an error document.
    #[error(transparent)]
    Remote(#[from] RemoteApiError),

    /// Network, TLS or request construction error from the HTTP transport.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Serialize(#[from] serde_json::Error),
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestApiError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_displays_message() {
        let error = RemoteApiError {
            code: 422,
            message: "An error has occurred: {\"errors\": []}".to_string(),
            body: Some(serde_json::json!({"errors": []})),
        };
        assert_eq!(error.to_string(), "An error has occurred: {\"errors\": []}");
        assert_eq!(error.code, 422);
    }

    #[test]
    fn test_rest_error_wraps_remote_error_transparently() {
        let error: RestApiError = RemoteApiError {
            code: 404,
            message: "not found".to_string(),
            body: None,
        }
        .into();

        assert!(matches!(error, RestApiError::Remote(ref e) if e.code == 404));
        assert_eq!(error.to_string(), "not found");
    }

    #[test]
    fn test_serialize_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: RestApiError = json_error.into();
        assert!(error.to_string().contains("encode request body"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let remote: &dyn std::error::Error = &RemoteApiError {
            code: 400,
            message: "test".to_string(),
            body: None,
        };
        let _ = remote;
    }
}
