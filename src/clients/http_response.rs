//! HTTP response types for the REST API.
//!
//! This module provides the [`RestResponse`] type returned by every REST
//! call, the [`response_code`] status line parser, and the body
//! normalization rules applied to decoded JSON.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Field under which a top-level JSON array is wrapped.
pub const ARRAY_FIELD: &str = "array";

/// Field carrying the composed request headers in [`RestResponse::into_value`].
pub const REQUEST_HEADERS_FIELD: &str = "request_headers";

/// Field carrying the raw response header lines in [`RestResponse::into_value`].
pub const RESPONSE_HEADERS_FIELD: &str = "response_headers";

/// A normalized response from the REST API.
///
/// `body` is always an object: bare arrays are wrapped under `array`, and
/// empty or non-JSON bodies become `{}`.
///
/// # Example
///
/// ```rust
/// use allegro_api::clients::RestResponse;
/// use serde_json::json;
///
/// let response = RestResponse {
///     status: 200,
///     body: json!({"id": "42"}).as_object().unwrap().clone(),
///     request_headers: Default::default(),
///     response_headers: vec!["HTTP/1.1 200 OK".to_string()],
/// };
///
/// assert_eq!(response.get("id"), Some(&json!("42")));
/// let value = response.into_value();
/// assert!(value.get("response_headers").is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RestResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The decoded, object-shaped body.
    pub body: Map<String, Value>,
    /// The fully composed request headers that were sent.
    pub request_headers: HashMap<String, String>,
    /// Raw response header lines, starting with the status line.
    pub response_headers: Vec<String>,
}

impl RestResponse {
    /// Returns a field of the decoded body.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns the values of a response header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Vec<&str> {
        self.response_headers
            .iter()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .filter(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
            .collect()
    }

    /// Converts the response into a single object with `request_headers`
    /// and `response_headers` attached next to the body fields.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut body = self.body;
        let request_headers = self
            .request_headers
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        body.insert(
            REQUEST_HEADERS_FIELD.to_string(),
            Value::Object(request_headers),
        );
        body.insert(
            RESPONSE_HEADERS_FIELD.to_string(),
            Value::Array(
                self.response_headers
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ),
        );
        Value::Object(body)
    }
}

/// Returns the status code from the first header line matching
/// `HTTP/<version> <code>`, or 0 if none matches.
///
/// # Example
///
/// ```rust
/// use allegro_api::clients::response_code;
///
/// assert_eq!(response_code(&["HTTP/1.1 404 Not Found"]), 404);
/// assert_eq!(response_code(&["Content-Type: text/plain"]), 0);
/// ```
#[must_use]
pub fn response_code<S: AsRef<str>>(headers: &[S]) -> u16 {
    headers
        .iter()
        .find_map(|line| parse_status_line(line.as_ref()))
        .unwrap_or(0)
}

fn parse_status_line(line: &str) -> Option<u16> {
    let start = line.find("HTTP/")?;
    let rest = &line[start + "HTTP/".len()..];

    let version_len = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    if version_len == 0 {
        return None;
    }

    let rest = &rest[version_len..];
    let code_part = rest.trim_start();
    if code_part.len() == rest.len() {
        return None;
    }

    let digits_len = code_part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(code_part.len());
    code_part[..digits_len].parse().ok()
}

/// Outcome of decoding a raw response body.
#[derive(Debug, PartialEq)]
pub(crate) enum DecodedBody {
    /// A JSON object, or a JSON array wrapped under [`ARRAY_FIELD`].
    Object(Map<String, Value>),
    /// Valid JSON that is neither an object nor an array, or an empty body.
    NotAnObject,
    /// Text that is not valid JSON.
    Malformed,
}

impl DecodedBody {
    pub(crate) fn decode(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::NotAnObject;
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Self::Object(map),
            Ok(Value::Array(items)) => {
                let mut map = Map::new();
                map.insert(ARRAY_FIELD.to_string(), Value::Array(items));
                Self::Object(map)
            }
            Ok(_) => Self::NotAnObject,
            Err(_) => Self::Malformed,
        }
    }
}

/// Returns `true` if the object carries a non-null `errors` or
/// `error_description` field.
pub(crate) fn is_error_document(body: &Map<String, Value>) -> bool {
    ["errors", "error_description"]
        .iter()
        .any(|key| body.get(*key).is_some_and(|value| !value.is_null()))
}

/// Returns `true` if undecodable text still names an error field.
pub(crate) fn mentions_error_field(text: &str) -> bool {
    text.contains("\"errors\"") || text.contains("\"error_description\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_response_code_parses_first_status_line() {
        let headers = [
            "HTTP/1.1 301 Moved Permanently",
            "Location: https://api.allegro.pl/x",
            "HTTP/1.1 200 OK",
        ];
        assert_eq!(response_code(&headers), 301);
    }

    #[test]
    fn test_response_code_skips_non_status_lines() {
        let headers = ["Server: nginx", "HTTP/2 422 Unprocessable Entity"];
        assert_eq!(response_code(&headers), 422);
    }

    #[test]
    fn test_response_code_is_zero_when_unparseable() {
        let empty: [&str; 0] = [];
        assert_eq!(response_code(&empty), 0);
        assert_eq!(response_code(&["HTTP/ 200"]), 0);
        assert_eq!(response_code(&["HTTP/1.1OK"]), 0);
    }

    #[test]
    fn test_decode_wraps_bare_array() {
        assert_eq!(
            DecodedBody::decode("[1,2,3]"),
            DecodedBody::Object(object(json!({"array": [1, 2, 3]})))
        );
    }

    #[test]
    fn test_decode_object() {
        assert_eq!(
            DecodedBody::decode(r#"{"id":"1"}"#),
            DecodedBody::Object(object(json!({"id": "1"})))
        );
    }

    #[test]
    fn test_decode_empty_and_scalar_bodies() {
        assert_eq!(DecodedBody::decode(""), DecodedBody::NotAnObject);
        assert_eq!(DecodedBody::decode("  \n"), DecodedBody::NotAnObject);
        assert_eq!(DecodedBody::decode("42"), DecodedBody::NotAnObject);
        assert_eq!(DecodedBody::decode("null"), DecodedBody::NotAnObject);
    }

    #[test]
    fn test_decode_malformed() {
        assert_eq!(DecodedBody::decode("<html>"), DecodedBody::Malformed);
    }

    #[test]
    fn test_is_error_document() {
        assert!(is_error_document(&object(json!({"errors": []}))));
        assert!(is_error_document(&object(
            json!({"error": "invalid_grant", "error_description": "Bad code"})
        )));
        assert!(!is_error_document(&object(json!({"errors": null}))));
        assert!(!is_error_document(&object(json!({"error": "x"}))));
    }

    #[test]
    fn test_mentions_error_field() {
        assert!(mentions_error_field(r#"{"errors": [ broken"#));
        assert!(!mentions_error_field("errors happened"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = RestResponse {
            status: 200,
            body: Map::new(),
            request_headers: HashMap::new(),
            response_headers: vec![
                "HTTP/1.1 200 OK".to_string(),
                "Content-Type: application/json".to_string(),
            ],
        };
        assert_eq!(response.header("content-type"), vec!["application/json"]);
        assert!(response.is_ok());
    }

    #[test]
    fn test_into_value_attaches_header_fields() {
        let mut request_headers = HashMap::new();
        request_headers.insert("Accept".to_string(), "application/json".to_string());

        let value = RestResponse {
            status: 204,
            body: Map::new(),
            request_headers,
            response_headers: vec!["HTTP/1.1 204 No Content".to_string()],
        }
        .into_value();

        assert_eq!(
            value,
            json!({
                "request_headers": {"Accept": "application/json"},
                "response_headers": ["HTTP/1.1 204 No Content"]
            })
        );
    }
}
