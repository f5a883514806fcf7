//! HTTP request types for the REST API.
//!
//! This module provides the [`RestRequest`] type and its builder.

use std::collections::HashMap;
use std::fmt;

/// HTTP methods used by the REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The body of a REST request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Serialized with `serde_json` before sending.
    Json(serde_json::Value),
    /// Sent verbatim, e.g. a form-encoded body with a matching
    /// `Content-Type` header.
    Raw(String),
}

impl RequestBody {
    /// Encodes the body for the wire.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if a JSON body cannot be serialized.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Json(value) => serde_json::to_string(value),
            Self::Raw(raw) => Ok(raw.clone()),
        }
    }
}

/// A request to the REST API.
///
/// `resource` is either a path relative to the client's base URL or an
/// absolute URL used verbatim.
///
/// # Example
///
/// ```rust
/// use allegro_api::clients::{HttpMethod, RequestBody, RestRequest};
/// use serde_json::json;
///
/// let request = RestRequest::builder(HttpMethod::Post, "/sale/offers")
///     .json(json!({"name": "Offer"}))
///     .header("Accept-Language", "en-US")
///     .build();
///
/// assert_eq!(request.method, HttpMethod::Post);
/// assert!(matches!(request.body, Some(RequestBody::Json(_))));
/// ```
#[derive(Clone, Debug)]
pub struct RestRequest {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// Resource path or absolute URL.
    pub resource: String,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// Headers overlaid on the client's defaults.
    pub headers: HashMap<String, String>,
}

impl RestRequest {
    /// Creates a new builder for constructing a `RestRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, resource: impl Into<String>) -> RestRequestBuilder {
        RestRequestBuilder::new(method, resource)
    }
}

/// Builder for [`RestRequest`].
#[derive(Debug)]
pub struct RestRequestBuilder {
    method: HttpMethod,
    resource: String,
    body: Option<RequestBody>,
    headers: HashMap<String, String>,
}

impl RestRequestBuilder {
    fn new(method: HttpMethod, resource: impl Into<String>) -> Self {
        Self {
            method,
            resource: resource.into(),
            body: None,
            headers: HashMap::new(),
        }
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(RequestBody::Json(body.into()));
        self
    }

    /// Sets a raw body that is sent without encoding.
    #[must_use]
    pub fn raw(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Raw(body.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: Option<RequestBody>) -> Self {
        self.body = body;
        self
    }

    /// Adds all headers from the map, replacing earlier values of the same key.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Builds the [`RestRequest`].
    #[must_use]
    pub fn build(self) -> RestRequest {
        RestRequest {
            method: self.method,
            resource: self.resource,
            body: self.body,
            headers: self.headers,
        }
    }
}
