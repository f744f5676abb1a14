//! Policy group builder

use super::chain::ChainBuilder;
use super::states::{Complete, Start};
use crate::error::Result;
use crate::policy::{Policy, PolicyGroup};
use faultline_common::{Exception, LoggingTransformer};
use std::marker::PhantomData;
use tracing::debug;

/// Boxed chain construction callback, for passing several to [`PolicyGroupBuilder::create_many`]
pub type ChainCallback<A, R> =
    Box<dyn FnOnce(ChainBuilder<A, R, Start>) -> ChainBuilder<A, R, Complete>>;

/// Builds one [`PolicyGroup`] for errors of kind `A` translated to `R`
///
/// Each callback receives a fresh chain builder and must hand it back completed.
pub struct PolicyGroupBuilder<A, R> {
    policies: Vec<Result<Policy>>,
    _kinds: PhantomData<fn() -> (A, R)>,
}

impl<A: Exception, R: Exception> Default for PolicyGroupBuilder<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Exception, R: Exception> PolicyGroupBuilder<A, R> {
    /// Create an empty group builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            policies: Vec::new(),
            _kinds: PhantomData,
        }
    }

    /// Build a group holding the single policy `callback` constructs
    ///
    /// # Errors
    ///
    /// Fails with the first configuration error of the chain.
    pub fn create<F>(callback: F) -> Result<PolicyGroup>
    where
        F: FnOnce(ChainBuilder<A, R, Start>) -> ChainBuilder<A, R, Complete>,
    {
        Self::new().policy(callback).build()
    }

    /// Build a group with one policy per callback
    ///
    /// # Errors
    ///
    /// Fails on the first chain error, on duplicate context labels, or when no
    /// callback is given.
    pub fn create_many<I>(callbacks: I) -> Result<PolicyGroup>
    where
        I: IntoIterator<Item = ChainCallback<A, R>>,
    {
        callbacks
            .into_iter()
            .fold(Self::new(), |builder, callback| builder.policy(callback))
            .build()
    }

    /// Add a policy built by `callback`
    #[must_use]
    pub fn policy<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(ChainBuilder<A, R, Start>) -> ChainBuilder<A, R, Complete>,
    {
        self.policies.push(callback(ChainBuilder::new()).into_policy());
        self
    }

    /// Assemble the group
    ///
    /// # Errors
    ///
    /// Fails on the first chain error, on duplicate context labels, or when no
    /// policy was added.
    pub fn build(self) -> Result<PolicyGroup> {
        let group = self
            .policies
            .into_iter()
            .collect::<Result<Vec<_>>>()
            .and_then(PolicyGroup::from_policies)
            .inspect_err(|error| LoggingTransformer::log_configuration_error("build", error))?;

        debug!(
            handles = %group.handles(),
            policies = group.policies().len(),
            "Policy group built"
        );
        Ok(group)
    }
}
