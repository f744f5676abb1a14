//! Exception manager
//!
//! Usage: `manager.handle(error, Some("checkout"))` always yields the error to raise:
//! the translated one when a policy matches, the unconfigured rule's otherwise.

use crate::config::ManagerConfig;
use crate::error::Result;
use crate::policy::{normalize_context, Policy, PolicyGroup};
use crate::registry::PolicySnapshot;
use crate::resolver::{DefaultResolver, Resolver};
use crate::rules::UnconfiguredRule;
use crate::strategy::PolicyMatchingStrategy;
use faultline_common::{ErrorKind, Exception, RaisedError};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Translates raised errors through the policies of a locked snapshot
///
/// Immutable once created; clones share the snapshot and can be used from any
/// number of threads.
#[derive(Clone)]
pub struct ExceptionManager {
    snapshot: Arc<PolicySnapshot>,
    rule: Arc<dyn UnconfiguredRule>,
    strategy: Arc<dyn PolicyMatchingStrategy>,
    resolver: Arc<dyn Resolver>,
    config: ManagerConfig,
}

impl ExceptionManager {
    /// Manager over `groups` with the default rule and strategy
    ///
    /// # Errors
    ///
    /// Fails when two groups accept the same kind.
    pub fn new<I>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = PolicyGroup>,
    {
        let config = ManagerConfig::default();
        let rule = config.fallback.rule();
        let strategy = config.default_strategy();
        Self::with_parts(groups, rule, strategy)
    }

    /// Manager over `groups` with an explicit rule and strategy
    ///
    /// # Errors
    ///
    /// Fails when two groups accept the same kind.
    pub fn with_parts<I>(
        groups: I,
        rule: Arc<dyn UnconfiguredRule>,
        strategy: Arc<dyn PolicyMatchingStrategy>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = PolicyGroup>,
    {
        let snapshot = Arc::new(PolicySnapshot::from_groups(groups)?);
        Ok(Self::from_parts(
            snapshot,
            rule,
            strategy,
            ManagerConfig::default(),
        ))
    }

    pub(crate) fn from_parts(
        snapshot: Arc<PolicySnapshot>,
        rule: Arc<dyn UnconfiguredRule>,
        strategy: Arc<dyn PolicyMatchingStrategy>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            snapshot,
            rule,
            strategy,
            resolver: Arc::new(DefaultResolver),
            config,
        }
    }

    /// Use `resolver` to instantiate handlers
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Snapshot the manager matches against
    #[must_use]
    pub fn snapshot(&self) -> &PolicySnapshot {
        &self.snapshot
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Policy the strategy selects for `kind` in `context`
    #[must_use]
    pub fn find_policy(&self, kind: ErrorKind, context: Option<&str>) -> Option<&Policy> {
        self.strategy
            .match_policy(&self.snapshot, kind, normalize_context(context))
    }

    /// Handle a raised error; the result is always the error to raise
    ///
    /// The `Ok` side is uninhabited, so `manager.handle(error, None)?` always
    /// propagates.
    pub fn handle(
        &self,
        error: RaisedError,
        context: Option<&str>,
    ) -> std::result::Result<Infallible, RaisedError> {
        Err(self.translate(error, context))
    }

    /// Raise `error` and handle it
    pub fn handle_error<E: Exception>(
        &self,
        error: E,
        context: Option<&str>,
    ) -> std::result::Result<Infallible, RaisedError> {
        self.handle(RaisedError::new(error), context)
    }

    /// The error [`handle`](Self::handle) raises for `error` in `context`
    #[must_use]
    pub fn translate(&self, error: RaisedError, context: Option<&str>) -> RaisedError {
        let context = normalize_context(context);
        let error = if self.config.unwrap_aggregates {
            error.unwrap_single_aggregate()
        } else {
            error
        };

        let kind = error.kind();
        match self.strategy.match_policy(&self.snapshot, kind, context) {
            Some(policy) => {
                let translated = policy.handle_within(
                    self.resolver.as_ref(),
                    error,
                    self.config.max_generalization_depth,
                );
                debug!(
                    from = %kind,
                    to = %translated.kind(),
                    context = ?context,
                    "Exception translated"
                );
                translated
            }
            None => {
                warn!(kind = %kind, context = ?context, "No policy matched; applying unconfigured rule");
                self.rule.apply(error, context)
            }
        }
    }
}

impl fmt::Debug for ExceptionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionManager")
            .field("groups", &self.snapshot.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
