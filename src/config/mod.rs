// Configuration module entry point
// Loads layered configuration: defaults, config file, environment

mod types;

use std::collections::HashMap;
use std::net::SocketAddr;

// Re-export public types
pub use types::{
    Config, HttpConfig, LogLevel, PayloadFormat, PerformanceConfig, RunMode, StorageBackend,
    StorageConfig,
};

/// Bucket used when neither the config file nor `DATA_BUCKET` name one
pub const DEFAULT_BUCKET: &str = "merchant-solutions-data";
/// Object key used when neither the config file nor `DATA_KEY` name one
pub const DEFAULT_KEY: &str = "data/solutions.json";

/// Plain environment variables that override the storage target last
const BUCKET_ENV: &str = "DATA_BUCKET";
const KEY_ENV: &str = "DATA_KEY";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// The file is optional; `config` (any supported extension) is tried when no path is given
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::load_with_env(config_path, env)
    }

    /// Same as [`Config::load_from`] but reads variables from `env` instead of the process
    pub fn load_with_env(
        config_path: &str,
        env: HashMap<String, String>,
    ) -> Result<Self, config::ConfigError> {
        let bucket = env.get(BUCKET_ENV).filter(|v| !v.is_empty()).cloned();
        let key = env.get(KEY_ENV).filter(|v| !v.is_empty()).cloned();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SOLUTIONS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.into_iter().collect())),
            )
            .set_default("mode", "server")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "text")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.request_timeout", 30)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("http.payload_format", "2.0")?
            .set_default("storage.backend", "s3")?
            .set_default("storage.bucket", DEFAULT_BUCKET)?
            .set_default("storage.key", DEFAULT_KEY)?
            .set_default("storage.root_dir", "./data-store")?
            .set_override_option("storage.bucket", bucket)?
            .set_override_option("storage.key", key)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::load_with_env("does-not-exist", HashMap::new()).unwrap();
        assert_eq!(cfg.mode, RunMode::Server);
        assert_eq!(cfg.storage.backend, StorageBackend::S3);
        assert_eq!(cfg.storage.bucket, DEFAULT_BUCKET);
        assert_eq!(cfg.storage.key, DEFAULT_KEY);
        assert_eq!(cfg.http.payload_format, PayloadFormat::V2);
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.storage.endpoint_url.is_none());
    }

    #[test]
    fn test_data_env_overrides_storage_target() {
        let cfg = Config::load_with_env(
            "does-not-exist",
            env(&[("DATA_BUCKET", "other-bucket"), ("DATA_KEY", "x/y.json")]),
        )
        .unwrap();
        assert_eq!(cfg.storage.bucket, "other-bucket");
        assert_eq!(cfg.storage.key, "x/y.json");
    }

    #[test]
    fn test_empty_data_env_keeps_default() {
        let cfg = Config::load_with_env("does-not-exist", env(&[("DATA_BUCKET", "")])).unwrap();
        assert_eq!(cfg.storage.bucket, DEFAULT_BUCKET);
    }

    #[test]
    fn test_prefixed_env() {
        let cfg = Config::load_with_env(
            "does-not-exist",
            env(&[
                ("SOLUTIONS_SERVER__PORT", "9090"),
                ("SOLUTIONS_STORAGE__BACKEND", "memory"),
                ("SOLUTIONS_MODE", "lambda"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.mode, RunMode::Lambda);
    }

    #[test]
    fn test_payload_format_from_env() {
        for (raw, expected) in [
            ("1.0", PayloadFormat::V1),
            ("2.0", PayloadFormat::V2),
            ("1", PayloadFormat::V1),
        ] {
            let cfg = Config::load_with_env(
                "does-not-exist",
                env(&[("SOLUTIONS_HTTP__PAYLOAD_FORMAT", raw)]),
            )
            .unwrap();
            assert_eq!(cfg.http.payload_format, expected, "{raw}");
        }

        let err = Config::load_with_env(
            "does-not-exist",
            env(&[("SOLUTIONS_HTTP__PAYLOAD_FORMAT", "3.0")]),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_log_level_from_env() {
        let cfg = Config::load_with_env("does-not-exist", HashMap::new()).unwrap();
        assert_eq!(cfg.logging.level, LogLevel::Info);

        let cfg = Config::load_with_env(
            "does-not-exist",
            env(&[("SOLUTIONS_LOGGING__LEVEL", "warn")]),
        )
        .unwrap();
        assert_eq!(cfg.logging.level, LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
    }

    #[test]
    fn test_config_file_and_env_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solutions.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[storage]\nbackend = \"filesystem\"\nbucket = \"file-bucket\"\nroot_dir = \"/tmp/store\"\n\n[http]\npayload_format = \"1.0\""
        )
        .unwrap();

        let base = path.with_extension("");
        let base = base.to_str().unwrap();

        let cfg = Config::load_with_env(base, HashMap::new()).unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Filesystem);
        assert_eq!(cfg.storage.bucket, "file-bucket");
        assert_eq!(cfg.storage.root_dir, "/tmp/store");
        assert_eq!(cfg.http.payload_format, PayloadFormat::V1);

        let cfg = Config::load_with_env(base, env(&[("DATA_BUCKET", "env-bucket")])).unwrap();
        assert_eq!(cfg.storage.bucket, "env-bucket");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_with_env("does-not-exist", HashMap::new()).unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }
}
