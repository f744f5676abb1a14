//! # Faultline Policy
//!
//! Policy-based exception translation: declare once that errors of kind `A` (in an
//! optional context) become errors of kind `R` after a chain of handlers, then let an
//! [`ExceptionManager`] apply those declarations wherever errors are caught.
//!
//! ```rust,ignore
//! let group = PolicyGroupBuilder::<DiskFull, StorageUnavailable>::create(|chain| {
//!     chain.start_and_complete::<ConvertHandler<DiskFull, StorageUnavailable>>()
//! })?;
//!
//! let mut registry = PolicyRegistry::new();
//! registry.add_policy_group(group)?;
//! let manager = registry.lock_and_create_manager(None, None);
//!
//! let raised = manager.handle_error(DiskFull::new("/var"), None).unwrap_err();
//! assert!(raised.is::<StorageUnavailable>());
//! ```

#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
pub mod error;
pub mod manager;
pub mod policy;
pub mod registry;
pub mod resolver;
pub mod rules;
pub mod strategy;

pub use builder::{
    ChainBuilder, ChainCallback, ChainState, DynChainBuilder, PolicyGroupBuilder,
};
pub use config::{FallbackRule, ManagerConfig};
pub use error::{
    ConfigurationError, HandlerResolutionError, KindMismatchError, PolicyMissingError, Result,
};
pub use manager::ExceptionManager;
pub use policy::{HandlerStep, Policy, PolicyGroup};
pub use registry::{PolicyRegistry, PolicySnapshot};
pub use resolver::{ContainerResolver, DefaultResolver, HandlerInstance, HandlerType, Resolver};
pub use rules::{PolicyMissingRule, RethrowOriginalRule, UnconfiguredRule};
pub use strategy::{DefaultPolicyMatchingStrategy, PolicyMatchingStrategy};
