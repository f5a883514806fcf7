//! Low-level HTTP transport shared by the REST and SOAP clients.
//!
//! [`HttpClient`] sends one request and hands back the status line, the
//! header lines and the body text as a [`RawResponse`]. Non-2xx statuses are
//! returned like any other response so callers can inspect the body.

use std::collections::HashMap;

use crate::clients::http_request::HttpMethod;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the `User-Agent` sent by both clients.
#[must_use]
pub fn user_agent(prefix: Option<&str>) -> String {
    let prefix = prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    format!("{prefix}Allegro API Library v{SDK_VERSION} | Rust {rust_version}")
}

/// A response as received from the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The status line, e.g. `HTTP/1.1 200 OK`.
    pub status_line: String,
    /// Header lines in `Name: value` form.
    pub headers: Vec<String>,
    /// The body as text.
    pub body: String,
}

impl RawResponse {
    /// Returns the status line followed by the header lines.
    #[must_use]
    pub fn header_lines(&self) -> Vec<String> {
        std::iter::once(self.status_line.clone())
            .chain(self.headers.iter().cloned())
            .collect()
    }
}

/// Thin wrapper around [`reqwest::Client`].
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and cheap to clone.
#[derive(Clone, Debug, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client with reqwest's default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing reqwest client, e.g. one configured with a proxy.
    #[must_use]
    pub const fn from_reqwest(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Sends a single request.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] on connection, TLS or header errors, or
    /// when the body cannot be read.
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<String>,
    ) -> Result<RawResponse, reqwest::Error> {
        let mut req_builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = body {
            req_builder = req_builder.body(body);
        }

        let res = req_builder.send().await?;

        let status = res.status();
        let status_line = format!(
            "{:?} {} {}",
            res.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string();
        let headers = Self::header_lines(res.headers());
        let body = res.text().await?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_line,
            headers,
            body,
        })
    }

    fn header_lines(headers: &reqwest::header::HeaderMap) -> Vec<String> {
        headers
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}: {}",
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes())
                )
            })
            .collect()
    }
}
