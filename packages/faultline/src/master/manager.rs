//! Manager Master Builder
//!
//! Collects groups and parts, then registers, locks and creates in one call

use faultline_policy::{
    ExceptionManager, FallbackRule, ManagerConfig, PolicyGroup, PolicyMatchingStrategy,
    PolicyRegistry, Resolver, Result, UnconfiguredRule,
};
use std::sync::Arc;

/// Master builder for [`ExceptionManager`]
#[derive(Default)]
pub struct ManagerMasterBuilder {
    groups: Vec<PolicyGroup>,
    config: ManagerConfig,
    rule: Option<Arc<dyn UnconfiguredRule>>,
    strategy: Option<Arc<dyn PolicyMatchingStrategy>>,
    resolver: Option<Arc<dyn Resolver>>,
}

impl ManagerMasterBuilder {
    /// Empty builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `group`
    #[must_use]
    pub fn group(mut self, group: PolicyGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Register every group of `groups`
    #[must_use]
    pub fn groups<I: IntoIterator<Item = PolicyGroup>>(mut self, groups: I) -> Self {
        self.groups.extend(groups);
        self
    }

    /// Use `config`
    #[must_use]
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `rule` for unmatched errors
    #[must_use]
    pub fn with_rule(mut self, rule: Arc<dyn UnconfiguredRule>) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Raise unmatched errors unchanged
    #[must_use]
    pub fn rethrow_original(mut self) -> Self {
        self.config.fallback = FallbackRule::RethrowOriginal;
        self.rule = None;
        self
    }

    /// Use `strategy` to select policies
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn PolicyMatchingStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Use `resolver` to instantiate handlers
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Register every group, lock and create the manager
    ///
    /// # Errors
    ///
    /// Fails when two groups accept the same kind.
    pub fn build(self) -> Result<ExceptionManager> {
        let mut registry = PolicyRegistry::new();
        for group in self.groups {
            registry.add_policy_group(group)?;
        }

        let manager = registry.lock_and_create_manager_with(self.config, self.rule, self.strategy);
        Ok(match self.resolver {
            Some(resolver) => manager.with_resolver(resolver),
            None => manager,
        })
    }
}
