//! Authentication for the Allegro REST API.
//!
//! - [`oauth`]: authorization link and the three token grants
//! - [`TokenResponse`]: typed access to a token endpoint response
//!
//! The SOAP WebAPI authenticates with its own login actions, see
//! [`WebApiClient::login`](crate::clients::webapi::WebApiClient::login).

pub mod oauth;
mod token;

pub use token::TokenResponse;
