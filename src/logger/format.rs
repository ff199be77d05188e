//! Invocation log format module
//!
//! Supports two formats:
//! - `text` (single space-separated line)
//! - `json` (JSON structured logging)

use chrono::{DateTime, Utc};

/// One handled invocation
#[derive(Debug, Clone)]
pub struct InvocationLogEntry {
    /// Where the event came from (peer address, or "lambda")
    pub source: String,
    /// Invocation timestamp
    pub time: DateTime<Utc>,
    /// Resolved HTTP method, empty when the event carried none
    pub method: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Handling time in microseconds
    pub request_time_us: u64,
}

impl InvocationLogEntry {
    /// Create a new entry stamped with the current time
    pub fn new(source: String, method: String) -> Self {
        Self {
            source,
            time: Utc::now(),
            method,
            status: 200,
            body_bytes: 0,
            request_time_us: 0,
        }
    }

    /// Format the entry; unknown formats fall back to `text`
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            _ => self.format_text(),
        }
    }

    /// `$source [$time] "$method" $status $body_bytes ${request_time}s`
    fn format_text(&self) -> String {
        let method = if self.method.is_empty() {
            "-"
        } else {
            &self.method
        };
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;
        format!(
            "{} [{}] \"{}\" {} {} {request_time:.3}s",
            self.source,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            method,
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "source": self.source,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }
}
