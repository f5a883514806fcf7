//! SOAP WebAPI client for Allegro.
//!
//! # Overview
//!
//! - [`WebApiClient`]: version-key lookup at construction, dynamic action
//!   dispatch through [`WebApiClient::call`], and session-storing logins
//! - [`SoapTransport`]: the seam between the client and the wire
//! - [`HttpSoapTransport`]: document/literal SOAP 1.1 over reqwest
//! - [`action_name`]: `getSession` → `doGetSession` resolution
//!
//! # Example
//!
//! ```rust,ignore
//! use allegro_api::WebApiClient;
//! use serde_json::json;
//!
//! let client = WebApiClient::new("webapi-key", 1, true).await?;
//! let categories = client
//!     .call("getCatsData", Some(json!({
//!         "countryId": client.country(),
//!         "localVersion": client.version_key(),
//!         "webapiKey": client.api_key(),
//!     })))
//!     .await?;
//! ```

mod action;
mod client;
mod envelope;
mod errors;
mod transport;

pub use action::{action_name, request_element, ACTION_PREFIX};
pub use client::{hash_password, WebApiClient};
pub use envelope::{decode_envelope, encode_envelope, SOAP_ENV_NS};
pub use errors::{SoapFault, WebApiError};
pub use transport::{HttpSoapTransport, SoapTransport};
