//! Typed view over an OAuth token response.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::oauth::OAuthError;
use crate::clients::RestResponse;

/// The fields Allegro returns from the token endpoint.
///
/// `Debug` masks both tokens.
///
/// # Example
///
/// ```rust
/// use allegro_api::auth::TokenResponse;
/// use chrono::{TimeZone, Utc};
///
/// let token: TokenResponse = serde_json::from_str(
///     r#"{"access_token": "eyJ...", "token_type": "bearer", "expires_in": 43199}"#,
/// )
/// .unwrap();
///
/// let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(
///     token.expires_at(issued_at),
///     Some(Utc.with_ymd_and_hms(2024, 1, 1, 11, 59, 59).unwrap())
/// );
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for REST calls.
    pub access_token: String,
    /// Usually `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Absent for the client credentials grant.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
    /// Token identifier.
    #[serde(default)]
    pub jti: Option<String>,
}

impl TokenResponse {
    /// Reads a token from the body of a token endpoint response.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidTokenResponse`] if the body has no
    /// `access_token` or a field has the wrong type.
    pub fn from_response(response: &RestResponse) -> Result<Self, OAuthError> {
        serde_json::from_value(serde_json::Value::Object(response.body.clone())).map_err(|e| {
            OAuthError::InvalidTokenResponse {
                reason: e.to_string(),
            }
        })
    }

    /// Returns when the token expires if it was issued at `issued_at`.
    #[must_use]
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.expires_in?).ok()?;
        issued_at.checked_add_signed(TimeDelta::try_seconds(seconds)?)
    }

    /// Returns `true` if the token issued at `issued_at` has expired by `now`.
    ///
    /// Tokens without `expires_in` never expire.
    #[must_use]
    pub fn is_expired(&self, issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.expires_at(issued_at).is_some_and(|expires_at| now >= expires_at)
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"*****")
            .field("token_type", &self.token_type)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("jti", &self.jti)
            .finish()
    }
}
