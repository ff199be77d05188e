//! Logger module
//!
//! Provides logging utilities for the handler including:
//! - Startup logging for both hosting modes
//! - Invocation logging in text or json format
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::InvocationLogEntry;

use crate::config::{Config, LogLevel, RunMode};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.info_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        config.logging.level,
    )
}

/// Lines are written when no writer is installed yet (startup, tests)
fn enabled(level: LogLevel) -> bool {
    writer::get().map_or(true, |w| w.enabled(level))
}

/// Write to info log
fn write_info(message: &str) {
    if !enabled(LogLevel::Info) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_startup(config: &Config) {
    write_info("======================================");
    match config.mode {
        RunMode::Server => write_info("Solutions admin gateway starting"),
        RunMode::Lambda => write_info("Solutions admin handler starting in lambda mode"),
    }
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!(
        "Object store: {} ({}/{})",
        config.storage.backend, config.storage.bucket, config.storage.key
    ));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.info_log_file {
        write_info(&format!("Info log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_listening(addr: &SocketAddr) {
    write_info(&format!("Listening on: http://{addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    if !enabled(LogLevel::Warn) {
        return;
    }
    write_error(&format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

/// The one line an unexpected write-path failure produces
pub fn log_save_failure(message: &str) {
    write_error(&format!("Error saving data: {message}"));
}

pub fn log_store_write(bucket: &str, key: &str, size: usize) {
    if !enabled(LogLevel::Debug) {
        return;
    }
    write_info(&format!("[Store] Wrote {size} bytes to {bucket}/{key}"));
}

/// Log formatted invocation entry
pub fn log_invocation(entry: &InvocationLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown() {
    write_info("[Shutdown] Stopped accepting connections");
}
