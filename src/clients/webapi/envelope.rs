//! SOAP 1.1 envelope encoding and decoding.
//!
//! Requests are document/literal: the action's parameter object becomes the
//! children of a `{Action}Request` element in the service namespace.
//! Responses are decoded into [`serde_json::Value`]:
//!
//! - namespace prefixes are dropped
//! - leaf elements become strings, `xsi:nil="true"` becomes `null`
//! - repeated siblings become arrays
//! - elements named in `sequence_elements` always become arrays, even when a
//!   single one is present

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

use super::action::request_element;
use super::errors::{SoapFault, WebApiError};
use crate::config::DEFAULT_SEQUENCE_ELEMENT;

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Builds the request envelope for `action`.
///
/// # Errors
///
/// Returns [`WebApiError::InvalidArgument`] if `params` is neither an object
/// nor `null`, and [`WebApiError::Encode`] if writing fails.
///
/// # Example
///
/// ```rust
/// use allegro_api::clients::webapi::encode_envelope;
/// use serde_json::json;
///
/// let xml = encode_envelope(
///     "https://webapi.allegro.pl/service.php",
///     "doQueryAllSysStatus",
///     &json!({"countryId": 1, "webapiKey": "key"}),
/// )
/// .unwrap();
///
/// assert!(xml.contains("<DoQueryAllSysStatusRequest"));
/// assert!(xml.contains("<countryId>1</countryId>"));
/// ```
pub fn encode_envelope(namespace: &str, action: &str, params: &Value) -> Result<String, WebApiError> {
    let empty = Map::new();
    let fields = match params {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(WebApiError::InvalidArgument {
                action: action.to_string(),
                reason: "parameters must be an object".to_string(),
            })
        }
    };

    let element = request_element(action);
    let mut writer = Writer::new(Vec::new());

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write(
        &mut writer,
        Event::Start(
            BytesStart::new("SOAP-ENV:Envelope").with_attributes([("xmlns:SOAP-ENV", SOAP_ENV_NS)]),
        ),
    )?;
    write(&mut writer, Event::Start(BytesStart::new("SOAP-ENV:Body")))?;
    write(
        &mut writer,
        Event::Start(BytesStart::new(element.as_str()).with_attributes([("xmlns", namespace)])),
    )?;
    for (name, value) in fields {
        write_value(&mut writer, name, value)?;
    }
    write(&mut writer, Event::End(BytesEnd::new(element.as_str())))?;
    write(&mut writer, Event::End(BytesEnd::new("SOAP-ENV:Body")))?;
    write(&mut writer, Event::End(BytesEnd::new("SOAP-ENV:Envelope")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| WebApiError::Encode {
        reason: e.to_string(),
    })
}

fn write_value(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), WebApiError> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            for item in items {
                write_value(writer, DEFAULT_SEQUENCE_ELEMENT, item)?;
            }
            write(writer, Event::End(BytesEnd::new(name)))
        }
        Value::Object(map) => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            for (key, item) in map {
                write_value(writer, key, item)?;
            }
            write(writer, Event::End(BytesEnd::new(name)))
        }
        Value::String(text) => write_leaf(writer, name, text),
        Value::Bool(flag) => write_leaf(writer, name, if *flag { "true" } else { "false" }),
        Value::Number(number) => write_leaf(writer, name, &number.to_string()),
    }
}

fn write_leaf(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), WebApiError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), WebApiError> {
    writer.write_event(event).map_err(|e| WebApiError::Encode {
        reason: e.to_string(),
    })
}

/// An XML element with namespace prefixes removed.
#[derive(Debug, Default)]
struct Node {
    name: String,
    text: String,
    nil: bool,
    children: Vec<Node>,
}

impl Node {
    fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    fn into_value(self, sequence_elements: &[String]) -> Value {
        if self.nil {
            return Value::Null;
        }
        if self.children.is_empty() {
            return Value::String(self.text);
        }

        let mut grouped: Vec<(String, Vec<Value>)> = Vec::new();
        for child in self.children {
            let name = child.name.clone();
            let value = child.into_value(sequence_elements);
            match grouped.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, values)) => values.push(value),
                None => grouped.push((name, vec![value])),
            }
        }

        let object = grouped
            .into_iter()
            .map(|(name, mut values)| {
                let always_sequence = sequence_elements.iter().any(|s| *s == name);
                let value = if values.len() == 1 && !always_sequence {
                    values.remove(0)
                } else {
                    Value::Array(values)
                };
                (name, value)
            })
            .collect();
        Value::Object(object)
    }
}

/// Decodes a response envelope into the result of the action.
///
/// The result is the first element inside `Body`, converted to an object.
///
/// # Errors
///
/// - [`WebApiError::Fault`] when the body holds a SOAP fault
/// - [`WebApiError::InvalidResponse`] when the text is not a SOAP envelope
///
/// # Example
///
/// ```rust
/// use allegro_api::clients::webapi::decode_envelope;
/// use serde_json::json;
///
/// let xml = r#"<?xml version="1.0"?>
/// <SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
///   <SOAP-ENV:Body>
///     <ns1:doGetItemsInfoResponse xmlns:ns1="urn:x">
///       <arrayItemListInfo><item><itemId>1</itemId></item></arrayItemListInfo>
///     </ns1:doGetItemsInfoResponse>
///   </SOAP-ENV:Body>
/// </SOAP-ENV:Envelope>"#;
///
/// let value = decode_envelope(xml, &["item".to_string()]).unwrap();
/// assert_eq!(value, json!({"arrayItemListInfo": {"item": [{"itemId": "1"}]}}));
/// ```
pub fn decode_envelope(xml: &str, sequence_elements: &[String]) -> Result<Value, WebApiError> {
    let root = parse_tree(xml)?;
    if root.name != "Envelope" {
        return Err(invalid(format!(
            "expected an Envelope root element, found '{}'",
            root.name
        )));
    }

    let body = root
        .children
        .into_iter()
        .find(|child| child.name == "Body")
        .ok_or_else(|| invalid("envelope has no Body".to_string()))?;

    let Some(result) = body.children.into_iter().next() else {
        return Ok(Value::Object(Map::new()));
    };

    if result.name == "Fault" {
        return Err(fault_from(&result).into());
    }

    if result.children.is_empty() && !result.nil && result.text.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    Ok(result.into_value(sequence_elements))
}

fn fault_from(node: &Node) -> SoapFault {
    let text = |name: &str| node.child(name).map(|child| child.text.clone());
    SoapFault {
        code: text("faultcode").unwrap_or_default(),
        message: text("faultstring").unwrap_or_else(|| "Unknown error".to_string()),
    }
}

fn parse_tree(xml: &str) -> Result<Node, WebApiError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(open_node(&start)?),
            Ok(Event::Empty(start)) => {
                let node = open_node(&start)?;
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(|e| invalid(e.to_string()))?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| invalid("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(invalid(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(invalid("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| invalid("empty document".to_string()))
}

fn open_node(start: &BytesStart<'_>) -> Result<Node, WebApiError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut nil = false;
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| invalid(e.to_string()))?;
        if attribute.key.local_name().as_ref() == b"nil" {
            let value = attribute
                .unescape_value()
                .map_err(|e| invalid(e.to_string()))?;
            nil = value == "true" || value == "1";
        }
    }
    Ok(Node {
        name,
        nil,
        ..Node::default()
    })
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

fn invalid(reason: String) -> WebApiError {
    WebApiError::InvalidResponse { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> Vec<String> {
        vec!["item".to_string()]
    }

    fn envelope(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="https://webapi.allegro.pl/service.php" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <SOAP-ENV:Body>{body}</SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#
        )
    }

    #[test]
    fn test_encode_nested_params() {
        let xml = encode_envelope(
            "urn:test",
            "doGetItemsInfo",
            &json!({
                "sessionHandle": "abc",
                "itemsIdArray": [1, 2],
                "filter": {"getDesc": true, "comment": null}
            }),
        )
        .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<DoGetItemsInfoRequest xmlns="urn:test">"#));
        assert!(xml.contains("<sessionHandle>abc</sessionHandle>"));
        assert!(xml.contains("<itemsIdArray><item>1</item><item>2</item></itemsIdArray>"));
        assert!(xml.contains("<filter><getDesc>true</getDesc></filter>"));
        assert!(!xml.contains("comment"));
    }

    #[test]
    fn test_encode_escapes_text() {
        let xml = encode_envelope("urn:test", "doLogin", &json!({"userLogin": "a&b<c>"})).unwrap();
        assert!(xml.contains("<userLogin>a&amp;b&lt;c&gt;</userLogin>"));
    }

    #[test]
    fn test_encode_rejects_non_object() {
        let result = encode_envelope("urn:test", "doLogin", &json!([1]));
        assert!(matches!(result, Err(WebApiError::InvalidArgument { .. })));
    }

    #[test]
    fn test_encode_null_params_as_empty_request() {
        let xml = encode_envelope("urn:test", "doGetSellRatingReasons", &Value::Null).unwrap();
        assert!(xml.contains(r#"<DoGetSellRatingReasonsRequest xmlns="urn:test"></DoGetSellRatingReasonsRequest>"#));
    }

    #[test]
    fn test_decode_single_item_is_a_sequence() {
        let xml = envelope(
            r"<ns1:doQueryAllSysStatusResponse>
                <sysCountryStatus>
                  <item><countryId>1</countryId><verKey>1505</verKey></item>
                </sysCountryStatus>
              </ns1:doQueryAllSysStatusResponse>",
        );

        let value = decode_envelope(&xml, &items()).unwrap();
        assert_eq!(
            value,
            json!({"sysCountryStatus": {"item": [{"countryId": "1", "verKey": "1505"}]}})
        );
    }

    #[test]
    fn test_decode_repeated_siblings_are_a_sequence() {
        let xml = envelope(
            r"<ns1:resp><row>a</row><row>b</row><single>c</single></ns1:resp>",
        );

        let value = decode_envelope(&xml, &items()).unwrap();
        assert_eq!(value, json!({"row": ["a", "b"], "single": "c"}));
    }

    #[test]
    fn test_decode_without_sequence_names_keeps_single_item_scalar() {
        let xml = envelope(r"<ns1:resp><list><item>x</item></list></ns1:resp>");

        let value = decode_envelope(&xml, &[]).unwrap();
        assert_eq!(value, json!({"list": {"item": "x"}}));
    }

    #[test]
    fn test_decode_nil_and_empty_elements() {
        let xml = envelope(
            r#"<ns1:resp><a xsi:nil="true"/><b/><c></c></ns1:resp>"#,
        );

        let value = decode_envelope(&xml, &items()).unwrap();
        assert_eq!(value, json!({"a": null, "b": "", "c": ""}));
    }

    #[test]
    fn test_decode_unescapes_text_and_cdata() {
        let xml = envelope(
            r"<ns1:resp><t>a &amp; b</t><d><![CDATA[<b>bold</b>]]></d></ns1:resp>",
        );

        let value = decode_envelope(&xml, &items()).unwrap();
        assert_eq!(value, json!({"t": "a & b", "d": "<b>bold</b>"}));
    }

    #[test]
    fn test_decode_empty_response_element() {
        let xml = envelope("<ns1:doLogoutResponse/>");
        assert_eq!(decode_envelope(&xml, &items()).unwrap(), json!({}));
    }

    #[test]
    fn test_decode_fault() {
        let xml = envelope(
            r"<SOAP-ENV:Fault>
                <faultcode>ERR_WEBAPI_KEY</faultcode>
                <faultstring>Niepoprawny klucz WebAPI</faultstring>
              </SOAP-ENV:Fault>",
        );

        let error = decode_envelope(&xml, &items()).unwrap_err();
        match error {
            WebApiError::Fault(fault) => {
                assert_eq!(fault.code, "ERR_WEBAPI_KEY");
                assert_eq!(fault.message, "Niepoprawny klucz WebAPI");
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_non_envelope() {
        assert!(matches!(
            decode_envelope("<html><body>502</body></html>", &items()),
            Err(WebApiError::InvalidResponse { .. })
        ));
        assert!(matches!(
            decode_envelope("not xml at all", &items()),
            Err(WebApiError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_document() {
        let xml = r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/"><SOAP-ENV:Body>"#;
        assert!(matches!(
            decode_envelope(xml, &items()),
            Err(WebApiError::InvalidResponse { .. })
        ));
    }

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_an_encode_error() {
        let mut writer = Writer::new(ClosedSink);
        let error = write(&mut writer, Event::Start(BytesStart::new("doLoginRequest"))).unwrap_err();

        match error {
            WebApiError::Encode { reason } => assert!(reason.contains("sink closed")),
            other => panic!("expected encode error, got {other:?}"),
        }
    }
}
