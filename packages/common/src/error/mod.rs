//! Exception model
//!
//! Provides the pieces every other faultline crate builds on:
//! - Error kinds with an explicit generalization hierarchy
//! - Type-erased raised errors that can be downcast and generalized
//! - Aggregate wrappers for errors raised together
//! - Structured logging setup

pub mod aggregate;
pub mod display;
pub mod logging;
pub mod macros;
pub mod raised;
pub mod types;

pub use aggregate::AggregateError;
pub use logging::LoggingTransformer;
pub use raised::RaisedError;
pub use types::{Ancestors, ErrorKind, Exception, MAX_HIERARCHY_DEPTH};

/// Result type alias for operations that raise
pub type Result<T> = std::result::Result<T, RaisedError>;
