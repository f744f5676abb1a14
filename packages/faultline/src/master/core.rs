//! Core Master Builder
//!
//! Main entry point for declaring policies and creating managers

use super::ManagerMasterBuilder;
use faultline_common::{ConvertHandler, Exception};
use faultline_policy::{PolicyGroup, PolicyGroupBuilder, PolicyRegistry, Result};

/// Master builder providing the unified entry point
pub struct Faultline;

impl Faultline {
    /// Entry point for registration
    /// Example: `Faultline::registry().add_policy_group(group)`
    #[must_use]
    pub fn registry() -> PolicyRegistry {
        PolicyRegistry::new()
    }

    /// Entry point for a policy group translating `A` into `R`
    /// Example: `Faultline::policy::<Timeout, Unavailable>().policy(|c| c.start_and_complete::<H>()).build()`
    #[must_use]
    pub fn policy<A: Exception, R: Exception>() -> PolicyGroupBuilder<A, R> {
        PolicyGroupBuilder::new()
    }

    /// Group with one unlabeled policy converting `A` into `R` through `From`
    ///
    /// # Errors
    ///
    /// Infallible in practice; the chain is checked like any other.
    pub fn convert<A, R>() -> Result<PolicyGroup>
    where
        A: Exception,
        R: Exception + From<A>,
    {
        PolicyGroupBuilder::<A, R>::create(|chain| {
            chain.start_and_complete::<ConvertHandler<A, R>>()
        })
    }

    /// Entry point for manager construction
    /// Example: `Faultline::manager().group(group).rethrow_original().build()?`
    #[must_use]
    pub fn manager() -> ManagerMasterBuilder {
        ManagerMasterBuilder::new()
    }
}
