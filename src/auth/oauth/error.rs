//! OAuth-specific error types.

use thiserror::Error;

use crate::clients::RestApiError;
use crate::error::ConfigError;

/// Errors that can occur during OAuth operations.
///
/// # Example
///
/// ```rust
/// use allegro_api::auth::oauth::OAuthError;
/// use allegro_api::ConfigError;
///
/// let error: OAuthError = ConfigError::EmptyClientSecret.into();
/// assert!(error.to_string().contains("Client secret"));
/// ```
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Client credentials failed validation before any request was sent.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The token endpoint call failed or returned an error document.
    #[error(transparent)]
    Request(#[from] RestApiError),

    /// The token endpoint answered with a body that is not a token.
    #[error("Invalid token response: {reason}")]
    InvalidTokenResponse {
        /// Why the body could not be read as a token.
        reason: String,
    },
}

impl OAuthError {
    /// Returns the remote error document, if the endpoint sent one.
    #[must_use]
    pub const fn remote(&self) -> Option<&crate::clients::RemoteApiError> {
        match self {
            Self::Request(RestApiError::Remote(remote)) => Some(remote),
            _ => None,
        }
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::RemoteApiError;

    #[test]
    fn test_remote_extracts_error_document() {
        let error: OAuthError = RestApiError::from(RemoteApiError {
            code: 401,
            message: "An error has occurred".to_string(),
            body: None,
        })
        .into();

        assert_eq!(error.remote().map(|remote| remote.code), Some(401));
    }

    #[test]
    fn test_config_error_has_no_remote() {
        let error: OAuthError = ConfigError::EmptyClientSecret.into();
        assert!(error.remote().is_none());
    }
}
