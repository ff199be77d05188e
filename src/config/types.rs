// Configuration types module
// Defines all configuration-related data structures

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub mode: RunMode,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
}

/// How the handler is hosted
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Local HTTP gateway built on hyper
    Server,
    /// Serverless runtime loop, events are pulled from the runtime API
    Lambda,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Lines below this level are dropped; errors are always written
    pub level: LogLevel,
    /// Emit one line per handled invocation
    pub access_log: bool,
    /// Invocation line format (text or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Info log file path (optional, stdout if not set)
    #[serde(default)]
    pub info_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "text".to_string()
}

/// Log verbosity, ordered from quietest to noisiest
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// Connection handling limits for the local gateway
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds a single connection may stay open
    pub request_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Gateway-level HTTP settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
    /// Event shape produced by the local gateway
    pub payload_format: PayloadFormat,
}

/// Gateway event shape
///
/// Written as `"1.0"` / `"2.0"`. Environment overrides arrive as numbers once
/// the config layer has parsed them, so `1.0`, `2.0`, `1` and `2` are accepted too.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// REST-style event: top-level `httpMethod`
    #[serde(rename = "1.0")]
    V1,
    /// HTTP-API-style event: `requestContext.http.method`
    #[serde(rename = "2.0")]
    V2,
}

impl<'de> Deserialize<'de> for PayloadFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PayloadFormatVisitor)
    }
}

struct PayloadFormatVisitor;

impl Visitor<'_> for PayloadFormatVisitor {
    type Value = PayloadFormat;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("payload format \"1.0\" or \"2.0\"")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<PayloadFormat, E> {
        match value {
            "1.0" | "1" => Ok(PayloadFormat::V1),
            "2.0" | "2" => Ok(PayloadFormat::V2),
            other => Err(E::invalid_value(Unexpected::Str(other), &self)),
        }
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<PayloadFormat, E> {
        match value {
            1 => Ok(PayloadFormat::V1),
            2 => Ok(PayloadFormat::V2),
            other => Err(E::invalid_value(Unexpected::Unsigned(other), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<PayloadFormat, E> {
        match u64::try_from(value) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::invalid_value(Unexpected::Signed(value), &self)),
        }
    }

    #[allow(clippy::float_cmp)]
    fn visit_f64<E: de::Error>(self, value: f64) -> Result<PayloadFormat, E> {
        if value == 1.0 {
            Ok(PayloadFormat::V1)
        } else if value == 2.0 {
            Ok(PayloadFormat::V2)
        } else {
            Err(E::invalid_value(Unexpected::Float(value), &self))
        }
    }
}

/// Object store configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub key: String,
    /// Root directory for the filesystem backend
    pub root_dir: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Custom S3 endpoint (S3-compatible stores, local emulators)
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    S3,
    Filesystem,
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::S3 => "s3",
            Self::Filesystem => "filesystem",
            Self::Memory => "memory",
        };
        f.write_str(name)
    }
}
