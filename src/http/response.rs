//! Response building module
//!
//! Builders for the gateway responses the handler returns, plus the
//! conversion of a gateway response into a hyper response for the local
//! gateway.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::json::to_spaced_string;
use crate::event::GatewayResponse;

/// Headers attached to every handler response
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type,Authorization"),
    ("Access-Control-Allow-Methods", "GET,PUT,OPTIONS"),
    ("Content-Type", "application/json"),
];

fn cors_headers() -> BTreeMap<String, String> {
    CORS_HEADERS
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

/// Build a response whose body is `body` encoded as JSON
pub fn build_json_response(status_code: u16, body: &Value) -> GatewayResponse {
    match to_spaced_string(body) {
        Ok(body) => GatewayResponse {
            status_code,
            headers: cors_headers(),
            body,
        },
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            GatewayResponse {
                status_code: 500,
                headers: cors_headers(),
                body: r#"{"success": false, "error": "Internal server error"}"#.to_string(),
            }
        }
    }
}

/// Build preflight response: 200 with an empty body
pub fn build_options_response() -> GatewayResponse {
    GatewayResponse {
        status_code: 200,
        headers: cors_headers(),
        body: String::new(),
    }
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> GatewayResponse {
    build_json_response(405, &json!({"error": "Method not allowed. Use PUT."}))
}

/// Build the success response for a completed write
pub fn build_saved_response(timestamp: &str) -> GatewayResponse {
    build_json_response(
        200,
        &json!({
            "success": true,
            "message": "Data saved successfully",
            "timestamp": timestamp,
        }),
    )
}

/// Build a failure response (`success: false`) with the given status
pub fn build_failure_response(status_code: u16, error: &str) -> GatewayResponse {
    build_json_response(status_code, &json!({"success": false, "error": error}))
}

/// Convert a gateway response into the HTTP response sent by the local gateway
pub fn to_http_response(response: GatewayResponse) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(response.status_code);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(response.body)))
        .unwrap_or_else(|e| {
            log_build_error(&response.status_code.to_string(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
///
/// Rejected by the gateway itself, so it carries no handler headers.
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(r#"{"message": "Request Entity Too Large"}"#)))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn assert_cors(response: &GatewayResponse) {
        for (name, value) in CORS_HEADERS {
            assert_eq!(response.headers.get(name).map(String::as_str), Some(value));
        }
        assert_eq!(response.headers.len(), 4);
    }

    #[test]
    fn test_options_response() {
        let response = build_options_response();
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
        assert_cors(&response);
    }

    #[test]
    fn test_405_response() {
        let response = build_405_response();
        assert_eq!(response.status_code, 405);
        assert_eq!(response.body, r#"{"error": "Method not allowed. Use PUT."}"#);
        assert_cors(&response);
    }

    #[test]
    fn test_saved_response_key_order() {
        let response = build_saved_response("2024-05-01T10:00:00.000000Z");
        assert_eq!(
            response.body,
            r#"{"success": true, "message": "Data saved successfully", "timestamp": "2024-05-01T10:00:00.000000Z"}"#
        );
    }

    #[test]
    fn test_failure_response() {
        let response = build_failure_response(400, "Request body is empty");
        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.body,
            r#"{"success": false, "error": "Request body is empty"}"#
        );
        assert_cors(&response);
    }

    #[tokio::test]
    async fn test_to_http_response() {
        let response = to_http_response(build_405_response());
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "GET,PUT,OPTIONS"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"error": "Method not allowed. Use PUT."}"#);
    }

    #[test]
    fn test_413_response() {
        assert_eq!(build_413_response().status(), 413);
    }
}
