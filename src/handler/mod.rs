//! Update handler
//!
//! Dispatches a gateway event on its method and, for `PUT`, validates the
//! document and overwrites the configured object with it.

use chrono::Utc;
use hyper::body::Bytes;
use serde_json::Value;
use std::time::Instant;

use crate::document;
use crate::error::{HandlerError, Result};
use crate::event::{GatewayEvent, GatewayResponse};
use crate::http::{
    build_405_response, build_failure_response, build_options_response, build_saved_response,
};
use crate::logger::{self, InvocationLogEntry};
use crate::storage::{ObjectStore, PutObject};

const STORED_CONTENT_TYPE: &str = "application/json";
const STORED_CACHE_CONTROL: &str = "no-cache";

/// Where the document is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

pub struct SolutionsHandler<S> {
    store: S,
    target: ObjectLocation,
    /// Invocation line format, `None` disables invocation logging
    access_log_format: Option<String>,
}

impl<S: ObjectStore> SolutionsHandler<S> {
    pub const fn new(store: S, target: ObjectLocation) -> Self {
        Self {
            store,
            target,
            access_log_format: None,
        }
    }

    /// Log one line per invocation in `format` (text or json)
    #[must_use]
    pub fn with_access_log(mut self, format: &str) -> Self {
        self.access_log_format = Some(format.to_string());
        self
    }

    /// Handle an event and log the invocation if enabled
    pub async fn invoke(&self, source: &str, event: &GatewayEvent) -> GatewayResponse {
        let started = Instant::now();
        let response = self.handle(event).await;

        if let Some(format) = &self.access_log_format {
            let mut entry = InvocationLogEntry::new(
                source.to_string(),
                event.method().unwrap_or_default().to_string(),
            );
            entry.status = response.status_code;
            entry.body_bytes = response.body.len();
            entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
            logger::log_invocation(&entry, format);
        }

        response
    }

    /// Handle one event
    ///
    /// `OPTIONS` is accepted without looking at anything else, `PUT` goes down
    /// the write path, every other method (or none) is refused with 405.
    pub async fn handle(&self, event: &GatewayEvent) -> GatewayResponse {
        match event.method() {
            Some("OPTIONS") => build_options_response(),
            Some("PUT") => match self.save(event.body.as_ref()).await {
                Ok(timestamp) => build_saved_response(&timestamp),
                Err(err) => error_response(&err),
            },
            _ => build_405_response(),
        }
    }

    /// Validate and store the document, returning the completion timestamp
    async fn save(&self, body: Option<&Value>) -> Result<String> {
        let document = document::parse_body(body)?;
        document::validate(&document)?;
        let stored = document::to_stored_json(&document)?;
        let size = stored.len();

        self.store
            .put_object(PutObject {
                bucket: self.target.bucket.clone(),
                key: self.target.key.clone(),
                body: Bytes::from(stored),
                content_type: STORED_CONTENT_TYPE.to_string(),
                cache_control: STORED_CACHE_CONTROL.to_string(),
            })
            .await?;

        logger::log_store_write(&self.target.bucket, &self.target.key, size);
        Ok(utc_timestamp())
    }
}

/// Map a write-path failure onto its response; only unexpected failures are logged
fn error_response(err: &HandlerError) -> GatewayResponse {
    match err {
        HandlerError::Validation(message) => build_failure_response(err.status_code(), message),
        HandlerError::Unexpected(message) => {
            logger::log_save_failure(message);
            build_failure_response(
                err.status_code(),
                &format!("Internal server error: {message}"),
            )
        }
    }
}

/// Current UTC time, ISO-8601 with microseconds and a `Z` suffix
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}
