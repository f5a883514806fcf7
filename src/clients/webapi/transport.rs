//! SOAP transports for the WebAPI client.

use std::collections::HashMap;
use std::future::Future;

use serde_json::Value;

use super::envelope::{decode_envelope, encode_envelope};
use super::errors::WebApiError;
use crate::clients::http_client::{user_agent, HttpClient};
use crate::clients::http_request::HttpMethod;
use crate::config::{EndpointUrl, WebApiConfig};

/// Invokes a named SOAP action with a structured parameter object.
///
/// [`WebApiClient`](super::WebApiClient) talks to the service only through
/// this trait, so tests can swap in a recording implementation.
pub trait SoapTransport: Send + Sync {
    /// Invokes `action` with `params` and returns the decoded result.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::Fault`] when the service returns a SOAP fault,
    /// and other variants for transport or decoding failures.
    fn call(
        &self,
        action: &str,
        params: &Value,
    ) -> impl Future<Output = Result<Value, WebApiError>> + Send;
}

/// [`SoapTransport`] over HTTP POST.
///
/// Requests are posted to the configured endpoint without its query string,
/// or to the environment's service URL. The request namespace always comes
/// from the environment.
#[derive(Clone, Debug)]
pub struct HttpSoapTransport {
    http_client: HttpClient,
    endpoint: String,
    namespace: String,
    sequence_elements: Vec<String>,
    user_agent: String,
}

// Verify HttpSoapTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpSoapTransport>();
};

impl HttpSoapTransport {
    /// Creates a transport for the endpoint described by `config`.
    #[must_use]
    pub fn from_config(config: &WebApiConfig) -> Self {
        let environment = config.environment();
        let endpoint = config
            .endpoint()
            .map_or(environment.webapi_service_url(), EndpointUrl::without_query);
        Self {
            http_client: HttpClient::new(),
            endpoint: endpoint.to_string(),
            namespace: environment.webapi_namespace().to_string(),
            sequence_elements: config.sequence_elements().to_vec(),
            user_agent: user_agent(config.user_agent_prefix()),
        }
    }

    /// Overrides the request namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Replaces the underlying HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http_client: HttpClient) -> Self {
        self.http_client = http_client;
        self
    }

    /// Returns the URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the request namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn headers(&self, action: &str) -> HashMap<String, String> {
        HashMap::from([
            (
                "Content-Type".to_string(),
                "text/xml; charset=utf-8".to_string(),
            ),
            ("SOAPAction".to_string(), format!("\"#{action}\"")),
            ("User-Agent".to_string(), self.user_agent.clone()),
        ])
    }
}

impl SoapTransport for HttpSoapTransport {
    async fn call(&self, action: &str, params: &Value) -> Result<Value, WebApiError> {
        let envelope = encode_envelope(&self.namespace, action, params)?;

        tracing::debug!(action, endpoint = %self.endpoint, "Sending WebAPI request");

        let raw = self
            .http_client
            .send(
                HttpMethod::Post,
                &self.endpoint,
                &self.headers(action),
                Some(envelope),
            )
            .await?;

        match decode_envelope(&raw.body, &self.sequence_elements) {
            Err(WebApiError::InvalidResponse { .. }) if !(200..300).contains(&raw.status) => {
                Err(WebApiError::UnexpectedStatus {
                    status: raw.status,
                    body: raw.body,
                })
            }
            result => result,
        }
    }
}
