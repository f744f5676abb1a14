//! Structured logging setup
//!
//! Library code emits `tracing` events. With the `log` feature of `tracing` enabled they
//! are forwarded to the `log` facade whenever no subscriber is installed, so an
//! `env_logger` backend is enough to see them.

use super::types::ErrorKind;
use log::{error, info, warn};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging infrastructure using `env_logger`
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging (call once at application startup)
    ///
    /// Configure levels via `RUST_LOG`:
    /// - `RUST_LOG=debug` - registration, matching and every chain step
    /// - `RUST_LOG=warn` - only unmatched errors and resolver failures
    /// - `RUST_LOG=faultline_policy=debug` - module-specific levels
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("Structured logging initialized");
        });
    }

    /// Initialize logging for test environments
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log a rejected registration or build step
    pub fn log_configuration_error(operation: &str, error: &dyn std::error::Error) {
        error!("Policy configuration rejected: {operation} ({error})");
    }

    /// Log an error that no policy matched
    pub fn log_unmatched(kind: ErrorKind, context: Option<&str>) {
        match context {
            Some(context) => warn!("No policy for {kind} in context {context:?}"),
            None => warn!("No policy for {kind}"),
        }
    }
}
