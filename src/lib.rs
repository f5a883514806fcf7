//! # Allegro API
//!
//! Async clients for the two Allegro API surfaces:
//!
//! - the SOAP **WebAPI**, through [`WebApiClient`], which fetches the
//!   version key for a country at construction and dispatches any action by
//!   name
//! - the **REST API**, through [`RestApiClient`], with the OAuth 2.0 grants
//!   in [`auth::oauth`]
//!
//! ## WebAPI
//!
//! ```rust,ignore
//! use allegro_api::WebApiClient;
//! use serde_json::json;
//!
//! let mut client = WebApiClient::new("webapi-key", 1, false).await?;
//!
//! let params = client.login_params("login", "password");
//! client.login(params).await?;
//!
//! // `getMyData` is sent as `doGetMyData`
//! let my_data = client
//!     .call("getMyData", Some(json!({ "sessionHandle": client.session() })))
//!     .await?;
//! ```
//!
//! ## REST API
//!
//! ```rust,ignore
//! use allegro_api::auth::oauth::{auth_link, generate_token};
//! use allegro_api::auth::TokenResponse;
//! use allegro_api::RestApiClient;
//!
//! let link = auth_link("client-id", "https://shop.example.com/callback");
//! // ... the user grants access and Allegro redirects back with `code` ...
//!
//! let response = generate_token(&code, "client-id", "client-secret", "https://shop.example.com/callback").await?;
//! let token = TokenResponse::from_response(&response)?;
//!
//! let client = RestApiClient::new(Some(token.access_token), false);
//! let categories = client.get("/sale/categories", None).await?;
//! ```
//!
//! ## Logging
//!
//! Requests are reported with [`tracing`] at `debug` level. Tokens, keys and
//! passwords are never logged. The crate installs no subscriber.

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

pub use auth::oauth::{auth_link, generate_token, generate_token_for_application, refresh_token};
pub use auth::TokenResponse;
pub use clients::{
    RemoteApiError, RestApiClient, RestApiError, RestResponse, WebApiClient, WebApiError,
};
pub use config::{
    ApiKey, ClientSecret, EndpointUrl, Environment, WebApiConfig, WebApiConfigBuilder,
};
pub use error::ConfigError;
