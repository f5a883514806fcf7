//! REST API client for Allegro.
//!
//! # Overview
//!
//! - [`RestApiClient`]: `get()`, `post()`, `put()`, `delete()` and the
//!   generic `send_request()`
//! - [`merge_headers`]: default/caller header composition
//! - [`resolve_url`]: relative path or absolute URL resolution
//!
//! # Example
//!
//! ```rust,ignore
//! use allegro_api::RestApiClient;
//!
//! let client = RestApiClient::new(Some(tokens.access_token), false);
//! let response = client.get("/sale/categories", None).await?;
//! ```
//!
//! # Response Normalization
//!
//! - A bare JSON array `[1, 2]` is returned as `{"array": [1, 2]}`
//! - An `errors` or `error_description` field raises
//!   [`RestApiError::Remote`](crate::clients::RestApiError::Remote),
//!   whatever the status code
//! - Empty or non-JSON bodies are returned as `{}`

mod client;

pub use client::{merge_headers, resolve_url, RestApiClient, ACCEPT_LANGUAGE, MEDIA_TYPE};
