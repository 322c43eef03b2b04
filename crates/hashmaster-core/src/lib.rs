//! HashMaster Core - Common infrastructure for the service clients
//!
//! This crate provides the shared HTTP plumbing, error type, logging,
//! progress and shutdown handling used by the Hashtopolis, Hashes.com
//! and HashMob.net clients.

pub mod error;
pub mod http;
pub mod logging;
pub mod progress;
pub mod shutdown;

// Re-exports for convenience
pub use error::ApiError;
pub use http::{
    HttpConfig, SHARED_RUNTIME, get_text, http_client, http_config, post_form, post_json,
    set_http_config,
};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use shutdown::{install_signal_handlers, is_shutdown_requested, request_shutdown, shutdown_flag};
