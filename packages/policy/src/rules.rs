//! Fallback rules for errors no policy matches

use crate::error::PolicyMissingError;
use faultline_common::{LoggingTransformer, RaisedError};

/// Decides what is raised when no policy matches
pub trait UnconfiguredRule: Send + Sync {
    /// Turn the unmatched error into the error to raise
    fn apply(&self, error: RaisedError, context: Option<&str>) -> RaisedError;
}

/// Raises [`PolicyMissingError`] wrapping the unmatched error
#[derive(Debug, Default, Clone, Copy)]
pub struct PolicyMissingRule;

impl UnconfiguredRule for PolicyMissingRule {
    fn apply(&self, error: RaisedError, context: Option<&str>) -> RaisedError {
        RaisedError::new(PolicyMissingError::new(error, context))
    }
}

/// Logs the unmatched error and raises it unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct RethrowOriginalRule;

impl UnconfiguredRule for RethrowOriginalRule {
    fn apply(&self, error: RaisedError, context: Option<&str>) -> RaisedError {
        LoggingTransformer::log_unmatched(error.kind(), context);
        error
    }
}
