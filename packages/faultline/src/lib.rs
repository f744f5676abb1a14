//! # Faultline - Policy-based Exception Translation
//!
//! Declare in one place how low-level errors become the errors a layer is allowed to
//! expose, then apply those declarations wherever errors are caught.
//!
//! ## Concepts
//!
//! - An [`Exception`] is an error type that knows its base kind, which gives errors a
//!   generalization hierarchy (`DiskFull` is a `StorageError` is an `AppError`).
//! - A [`Policy`] translates errors of one kind, optionally only in a named context,
//!   through a typesafe chain of [`ExceptionHandler`]s.
//! - A [`PolicyGroup`] bundles every policy for one accepted kind.
//! - A [`PolicyRegistry`] collects groups until it is locked into an
//!   [`ExceptionManager`], which matches errors against the most specific group along
//!   their hierarchy.
//!
//! ## Example
//!
//! ```rust,ignore
//! use faultline::prelude::*;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("disk full")]
//! struct DiskFull;
//! exception!(DiskFull);
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("storage unavailable")]
//! struct StorageUnavailable;
//! exception!(StorageUnavailable);
//!
//! impl From<DiskFull> for StorageUnavailable {
//!     fn from(_: DiskFull) -> Self {
//!         StorageUnavailable
//!     }
//! }
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = Faultline::manager()
//!         .group(Faultline::convert::<DiskFull, StorageUnavailable>()?)
//!         .build()?;
//!
//!     let raised = Err::<(), _>(DiskFull).translate(&manager).unwrap_err();
//!     assert!(raised.is::<StorageUnavailable>());
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Registration, matching and chain execution emit `tracing` events. Call
//! [`LoggingTransformer::init`] to route them to `env_logger`, configured via `RUST_LOG`.

#![forbid(unsafe_code)]

pub mod extensions;
pub mod master;

// Re-export the exception model
pub use faultline_common::{
    exception, raise, AggregateError, Ancestors, ConvertHandler, ErrorKind, Exception,
    ExceptionHandler, LoggingTransformer, PassThroughHandler, RaisedError,
    MAX_HIERARCHY_DEPTH,
};

// Re-export the policy engine
pub use faultline_policy::{
    builder, ChainBuilder, ChainCallback, ChainState, ConfigurationError,
    ContainerResolver, DefaultPolicyMatchingStrategy, DefaultResolver, DynChainBuilder,
    ExceptionManager, FallbackRule, HandlerInstance, HandlerResolutionError, HandlerStep,
    HandlerType, KindMismatchError, ManagerConfig, Policy, PolicyGroup, PolicyGroupBuilder,
    PolicyMatchingStrategy, PolicyMissingError, PolicyMissingRule, PolicyRegistry,
    PolicySnapshot, Resolver, RethrowOriginalRule, UnconfiguredRule,
};

pub use extensions::TranslateExt;
pub use master::{Faultline, ManagerMasterBuilder};

/// Result of configuration operations
pub type Result<T> = faultline_policy::Result<T>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::builder::states::{Complete, Intermediate, Start};
    pub use crate::extensions::TranslateExt;
    pub use crate::master::Faultline;
    pub use crate::{
        exception, raise, ConfigurationError, ConvertHandler, ErrorKind, Exception,
        ExceptionHandler, ExceptionManager, PassThroughHandler, Policy, PolicyGroup,
        PolicyGroupBuilder, PolicyMissingError, PolicyRegistry, RaisedError,
    };
}
