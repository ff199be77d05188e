//! HTTP protocol layer module
//!
//! Response encoding and builders shared by the handler and the local gateway.

pub mod json;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_405_response, build_413_response, build_failure_response, build_options_response,
    build_saved_response, to_http_response,
};
