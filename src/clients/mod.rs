//! HTTP and SOAP client types for the Allegro APIs.
//!
//! # Overview
//!
//! - [`HttpClient`]: the async transport shared by both clients
//! - [`RestRequest`] and [`RestRequestBuilder`]: a REST call to be sent
//! - [`RestResponse`]: the object-shaped decoded body plus diagnostics
//! - [`rest::RestApiClient`]: bearer-token REST client
//! - [`webapi::WebApiClient`]: SOAP WebAPI client with dynamic dispatch
//! - [`RemoteApiError`]: an error document returned by the REST API
//!
//! # Example
//!
//! ```rust,ignore
//! use allegro_api::clients::{HttpMethod, RestApiClient, RestRequest};
//! use serde_json::json;
//!
//! let client = RestApiClient::new(Some(token), true);
//! let request = RestRequest::builder(HttpMethod::Put, "/sale/offer-modification-commands/{id}")
//!     .json(json!({ "offerCriteria": [] }))
//!     .build();
//!
//! let response = client.send_request(request).await?;
//! ```

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;
pub mod webapi;

pub use errors::{RemoteApiError, RestApiError};
pub use http_client::{user_agent, HttpClient, RawResponse, SDK_VERSION};
pub use http_request::{HttpMethod, RequestBody, RestRequest, RestRequestBuilder};
pub use http_response::{
    response_code, RestResponse, ARRAY_FIELD, REQUEST_HEADERS_FIELD, RESPONSE_HEADERS_FIELD,
};

pub use rest::{merge_headers, resolve_url, RestApiClient};
pub use webapi::{SoapTransport, WebApiClient, WebApiError};
