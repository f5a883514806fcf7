//! SOAP WebAPI client implementation.

use base64::prelude::*;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use super::action::action_name;
use super::errors::WebApiError;
use super::transport::{HttpSoapTransport, SoapTransport};
use crate::config::{ApiKey, Environment, WebApiConfig};

const STATUS_ACTION: &str = "doQueryAllSysStatus";
const LOGIN_ACTION: &str = "doLogin";
const LOGIN_ENC_ACTION: &str = "doLoginEnc";
const SESSION_FIELD: &str = "sessionHandlePart";

/// Client for the Allegro SOAP WebAPI.
///
/// Construction performs one `doQueryAllSysStatus` call and stores the
/// version key for the configured country. Any other action is invoked with
/// [`call`](Self::call) by name.
///
/// # Thread Safety
///
/// `WebApiClient` is `Send + Sync` when its transport is. The session is
/// updated through `&mut self`.
///
/// # Example
///
/// ```rust,ignore
/// use allegro_api::WebApiClient;
/// use serde_json::json;
///
/// let mut client = WebApiClient::new("webapi-key", 1, false).await?;
/// let params = client.login_params("user", "pass");
/// client.login(params).await?;
///
/// let my_data = client
///     .call("getMyData", Some(json!({ "sessionHandle": client.session() })))
///     .await?;
/// ```
#[derive(Debug)]
pub struct WebApiClient<T: SoapTransport = HttpSoapTransport> {
    config: WebApiConfig,
    transport: T,
    session: Option<String>,
    version_key: String,
}

// Verify WebApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebApiClient>();
};

impl WebApiClient<HttpSoapTransport> {
    /// Connects to the production or sandbox WebAPI.
    ///
    /// # Errors
    ///
    /// - [`WebApiError::Config`] if `api_key` is empty
    /// - [`WebApiError::InvalidParameter`] if no version record exists for
    ///   `country`
    /// - any error raised by the status query itself
    pub async fn new(api_key: &str, country: i64, sandbox: bool) -> Result<Self, WebApiError> {
        let config = WebApiConfig::builder()
            .api_key(ApiKey::new(api_key)?)
            .country(country)
            .environment(Environment::from_sandbox(sandbox))
            .build()?;
        Self::from_config(config).await
    }

    /// Connects using an explicit configuration.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub async fn from_config(config: WebApiConfig) -> Result<Self, WebApiError> {
        let transport = HttpSoapTransport::from_config(&config);
        Self::with_transport(config, transport).await
    }
}

impl<T: SoapTransport> WebApiClient<T> {
    /// Connects through a custom transport.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::InvalidParameter`] if the status query has no
    /// record for the configured country, or the transport's error.
    pub async fn with_transport(config: WebApiConfig, transport: T) -> Result<Self, WebApiError> {
        let params = json!({
            "countryId": config.country(),
            "webapiKey": config.api_key().as_ref(),
        });
        let status = transport.call(STATUS_ACTION, &params).await?;
        let version_key = find_version_key(&status, config.country())
            .ok_or(WebApiError::InvalidParameter {
                country: config.country(),
            })?;

        tracing::debug!(country = config.country(), "WebAPI version key stored");

        Ok(Self {
            config,
            transport,
            session: None,
            version_key,
        })
    }

    /// Invokes a WebAPI action by name.
    ///
    /// `name` is resolved with [`action_name`], so `getMyData` and
    /// `doGetMyData` reach the same action. The result is returned as decoded,
    /// without local schema validation.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::InvalidArgument`] if `params` is present but not
    /// an object. No request is sent in that case.
    pub async fn call(&self, name: &str, params: Option<Value>) -> Result<Value, WebApiError> {
        let params = match params {
            None => Value::Object(serde_json::Map::new()),
            Some(params @ Value::Object(_)) => params,
            Some(_) => {
                return Err(WebApiError::InvalidArgument {
                    action: name.to_string(),
                    reason: "parameters must be an object".to_string(),
                })
            }
        };

        let action = action_name(name);
        tracing::debug!(action = %action, "Dispatching WebAPI action");
        self.transport.call(&action, &params).await
    }

    /// Calls `doLogin` and stores the returned session handle.
    ///
    /// # Errors
    ///
    /// Returns the transport's error, or
    /// [`WebApiError::InvalidResponse`] if the response has no
    /// `sessionHandlePart`.
    pub async fn login(&mut self, params: Value) -> Result<Value, WebApiError> {
        self.login_with(LOGIN_ACTION, params).await
    }

    /// Calls `doLoginEnc` and stores the returned session handle.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn login_enc(&mut self, params: Value) -> Result<Value, WebApiError> {
        self.login_with(LOGIN_ENC_ACTION, params).await
    }

    /// Alias for [`login`](Self::login).
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn do_login(&mut self, params: Value) -> Result<Value, WebApiError> {
        self.login(params).await
    }

    /// Alias for [`login_enc`](Self::login_enc).
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn do_login_enc(&mut self, params: Value) -> Result<Value, WebApiError> {
        self.login_enc(params).await
    }

    async fn login_with(&mut self, action: &str, params: Value) -> Result<Value, WebApiError> {
        let response = self.call(action, Some(params)).await?;
        let session = match response.get(SESSION_FIELD) {
            Some(Value::String(session)) => session.clone(),
            Some(Value::Number(session)) => session.to_string(),
            _ => {
                return Err(WebApiError::InvalidResponse {
                    reason: format!("{action} response has no {SESSION_FIELD}"),
                })
            }
        };

        tracing::debug!(action, "WebAPI session stored");
        self.session = Some(session);
        Ok(response)
    }

    /// Builds `doLogin` parameters for this client's key, country and version.
    #[must_use]
    pub fn login_params(&self, user_login: &str, user_password: &str) -> Value {
        json!({
            "userLogin": user_login,
            "userPassword": user_password,
            "countryCode": self.country(),
            "webapiKey": self.api_key(),
            "localVersion": self.version_key,
        })
    }

    /// Builds `doLoginEnc` parameters from a password hashed with
    /// [`hash_password`].
    #[must_use]
    pub fn login_enc_params(&self, user_login: &str, user_hash_password: &str) -> Value {
        json!({
            "userLogin": user_login,
            "userHashPassword": user_hash_password,
            "countryCode": self.country(),
            "webapiKey": self.api_key(),
            "localVersion": self.version_key,
        })
    }

    /// Returns the WebAPI key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.config.api_key().as_ref()
    }

    /// Returns the country code.
    #[must_use]
    pub const fn country(&self) -> i64 {
        self.config.country()
    }

    /// Returns the version key fetched at construction.
    #[must_use]
    pub fn version_key(&self) -> &str {
        &self.version_key
    }

    /// Returns the current session handle, if logged in.
    #[must_use]
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Replaces the session handle, e.g. with one restored from storage.
    pub fn set_session(&mut self, session: Option<String>) {
        self.session = session;
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &WebApiConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

/// Returns base64(SHA-256(password)), the form `doLoginEnc` expects.
///
/// # Example
///
/// ```rust
/// use allegro_api::clients::webapi::hash_password;
///
/// assert_eq!(
///     hash_password("password"),
///     "XohImNooBHFR0OVvjcYpJ3NgPQ1qq73WKhHvch0VQtg="
/// );
/// ```
#[must_use]
pub fn hash_password(password: &str) -> String {
    BASE64_STANDARD.encode(Sha256::digest(password.as_bytes()))
}

/// Scans `sysCountryStatus` for the record of `country` and returns its
/// `verKey`.
///
/// Accepts `item` as an array or a single object, and country ids and keys
/// as numbers or numeric strings.
fn find_version_key(status: &Value, country: i64) -> Option<String> {
    let records = status.get("sysCountryStatus")?;
    let records = records.get("item").unwrap_or(records);
    let records: Vec<&Value> = match records {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    records
        .into_iter()
        .find(|record| record.get("countryId").and_then(as_i64) == Some(country))
        .and_then(|record| match record.get("verKey")? {
            Value::String(key) => Some(key.clone()),
            Value::Number(key) => Some(key.to_string()),
            _ => None,
        })
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_version_key_in_sequence() {
        let status = json!({
            "sysCountryStatus": {"item": [
                {"countryId": "1", "verKey": "1505"},
                {"countryId": "56", "verKey": "42"}
            ]}
        });
        assert_eq!(find_version_key(&status, 56), Some("42".to_string()));
        assert_eq!(find_version_key(&status, 1), Some("1505".to_string()));
    }

    #[test]
    fn test_find_version_key_in_single_record() {
        let status = json!({"sysCountryStatus": {"item": {"countryId": 1, "verKey": 1505}}});
        assert_eq!(find_version_key(&status, 1), Some("1505".to_string()));
    }

    #[test]
    fn test_find_version_key_missing_country() {
        let status = json!({"sysCountryStatus": {"item": [{"countryId": "1", "verKey": "1"}]}});
        assert_eq!(find_version_key(&status, 999), None);
        assert_eq!(find_version_key(&json!({}), 1), None);
    }

    #[test]
    fn test_hash_password() {
        assert_eq!(
            hash_password(""),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }
}
