// Gateway event types
// The normalized request/response records exchanged with the hosting gateway

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::PayloadFormat;

/// Inbound event as produced by the gateway
///
/// Both REST-style (`httpMethod`) and HTTP-API-style
/// (`requestContext.http.method`) shapes deserialize into this record;
/// fields the handler does not read are ignored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,
    /// Request path (payload format 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Request path (payload format 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_path: Option<String>,
    /// Usually a JSON-encoded string; direct invocations may pass the document itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl GatewayEvent {
    /// Build the event the given payload format would deliver for a request
    pub fn from_request(
        format: PayloadFormat,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Self {
        let body = body.filter(|b| !b.is_empty()).map(Value::String);
        match format {
            PayloadFormat::V1 => Self {
                http_method: Some(method.to_string()),
                request_context: Some(RequestContext {
                    http: None,
                    http_method: Some(method.to_string()),
                }),
                path: Some(path.to_string()),
                raw_path: None,
                body,
            },
            PayloadFormat::V2 => Self {
                http_method: None,
                request_context: Some(RequestContext {
                    http: Some(HttpDescription {
                        method: Some(method.to_string()),
                        path: Some(path.to_string()),
                    }),
                    http_method: None,
                }),
                path: None,
                raw_path: Some(path.to_string()),
                body,
            },
        }
    }

    /// Resolve the HTTP method
    ///
    /// Checked in order: `httpMethod`, `requestContext.http.method`,
    /// `requestContext.httpMethod`. The first non-empty value wins.
    pub fn method(&self) -> Option<&str> {
        let context = self.request_context.as_ref();
        let nested = context
            .and_then(|c| c.http.as_ref())
            .and_then(|h| h.method.as_deref());
        let legacy = context.and_then(|c| c.http_method.as_deref());

        [self.http_method.as_deref(), nested, legacy]
            .into_iter()
            .flatten()
            .find(|m| !m.is_empty())
    }
}

/// Outbound response handed back to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GatewayEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_method_top_level() {
        let event = parse(r#"{"httpMethod": "PUT", "body": "{}"}"#);
        assert_eq!(event.method(), Some("PUT"));
    }

    #[test]
    fn test_method_http_api_shape() {
        let event = parse(r#"{"requestContext": {"http": {"method": "OPTIONS", "path": "/"}}}"#);
        assert_eq!(event.method(), Some("OPTIONS"));
    }

    #[test]
    fn test_method_legacy_context() {
        let event = parse(r#"{"requestContext": {"httpMethod": "GET"}}"#);
        assert_eq!(event.method(), Some("GET"));
    }

    #[test]
    fn test_method_fallback_order() {
        let event = parse(
            r#"{"httpMethod": "PUT", "requestContext": {"http": {"method": "GET"}, "httpMethod": "DELETE"}}"#,
        );
        assert_eq!(event.method(), Some("PUT"));

        let event = parse(
            r#"{"requestContext": {"http": {"method": "GET"}, "httpMethod": "DELETE"}}"#,
        );
        assert_eq!(event.method(), Some("GET"));
    }

    #[test]
    fn test_method_skips_empty_values() {
        let event = parse(
            r#"{"httpMethod": "", "requestContext": {"http": {"method": ""}, "httpMethod": "PUT"}}"#,
        );
        assert_eq!(event.method(), Some("PUT"));

        let event = parse(r#"{"httpMethod": null, "requestContext": {"http": {}}}"#);
        assert_eq!(event.method(), None);
    }

    #[test]
    fn test_method_missing() {
        assert_eq!(parse("{}").method(), None);
    }

    #[test]
    fn test_body_variants() {
        let event = parse(r#"{"body": "{\"a\": 1}"}"#);
        assert_eq!(event.body, Some(Value::String(r#"{"a": 1}"#.to_string())));

        let event = parse(r#"{"body": {"a": 1}}"#);
        assert_eq!(event.body, Some(serde_json::json!({"a": 1})));

        let event = parse(r#"{"body": null}"#);
        assert_eq!(event.body, None);
    }

    #[test]
    fn test_from_request_v1() {
        let event = GatewayEvent::from_request(PayloadFormat::V1, "PUT", "/admin", Some("{}".into()));
        assert_eq!(event.http_method.as_deref(), Some("PUT"));
        assert_eq!(event.path.as_deref(), Some("/admin"));
        assert_eq!(event.method(), Some("PUT"));
        assert_eq!(event.body, Some(Value::String("{}".into())));
    }

    #[test]
    fn test_from_request_v2() {
        let event = GatewayEvent::from_request(PayloadFormat::V2, "PUT", "/admin", Some(String::new()));
        assert!(event.http_method.is_none());
        assert_eq!(event.raw_path.as_deref(), Some("/admin"));
        assert_eq!(event.method(), Some("PUT"));
        assert!(event.body.is_none());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["requestContext"]["http"]["method"], "PUT");
    }

    #[test]
    fn test_response_wire_names() {
        let response = GatewayResponse {
            status_code: 405,
            headers: BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: String::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 405);
        assert_eq!(json["headers"]["Content-Type"], "application/json");
        assert_eq!(json["body"], "");
    }
}
