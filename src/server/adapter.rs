// Gateway adapter module
// Maps HTTP requests onto gateway events and handler responses back onto HTTP

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use super::GatewayState;
use crate::config::PayloadFormat;
use crate::event::GatewayEvent;
use crate::http::{build_413_response, to_http_response};
use crate::logger;
use crate::storage::ObjectStore;

/// Serve one HTTP request through the handler
///
/// Every path reaches the handler; the gateway only enforces the body size
/// limit before building the event.
pub async fn handle_http<B, S>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<GatewayState<S>>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    S: ObjectStore,
{
    let max_body_size = state.http.max_body_size;

    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Ok(resp);
    }

    let event = match into_event(req, state.http.payload_format, max_body_size).await {
        Ok(event) => event,
        Err(resp) => return Ok(resp),
    };

    let response = state.handler.invoke(&peer_addr.to_string(), &event).await;
    Ok(to_http_response(response))
}

/// Validate Content-Length header against max body size
/// Returns Some(413 response) if too large, None otherwise
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(hyper::header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the request into the event shape configured for the gateway
///
/// The body is read as text (lossy for non-UTF-8 input); an empty body is
/// left out of the event.
async fn into_event<B>(
    req: Request<B>,
    format: PayloadFormat,
    max_body_size: u64,
) -> Result<GatewayEvent, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);

    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body exceeded {max_body_size} bytes"));
            return Err(build_413_response());
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            return Err(Response::builder()
                .status(400)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from(r#"{"message": "Bad Request"}"#)))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::new()))));
        }
    };

    let body = (!bytes.is_empty()).then(|| String::from_utf8_lossy(&bytes).into_owned());

    Ok(GatewayEvent::from_request(
        format,
        parts.method.as_str(),
        parts.uri.path(),
        body,
    ))
}
