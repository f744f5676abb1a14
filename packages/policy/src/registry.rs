//! Policy registry and its locked snapshot
//!
//! Groups are added while the registry is open. Locking freezes them into an immutable
//! [`PolicySnapshot`] shared by every manager created from it; after that, every
//! registration fails.

use crate::config::ManagerConfig;
use crate::error::{ConfigurationError, Result};
use crate::manager::ExceptionManager;
use crate::policy::PolicyGroup;
use crate::rules::UnconfiguredRule;
use crate::strategy::PolicyMatchingStrategy;
use faultline_common::{ErrorKind, LoggingTransformer};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Frozen mapping from accepted kind to policy group
#[derive(Debug, Default)]
pub struct PolicySnapshot {
    groups: HashMap<ErrorKind, PolicyGroup>,
}

impl PolicySnapshot {
    /// Snapshot of the given groups
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigurationError::DuplicateHandledKind`] when two groups accept
    /// the same kind.
    pub fn from_groups<I>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = PolicyGroup>,
    {
        let mut snapshot = Self::default();
        for group in groups {
            snapshot.insert(group)?;
        }
        Ok(snapshot)
    }

    /// Group registered for exactly `kind`
    #[must_use]
    pub fn group(&self, kind: ErrorKind) -> Option<&PolicyGroup> {
        self.groups.get(&kind)
    }

    /// Whether a group is registered for exactly `kind`
    #[must_use]
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.groups.contains_key(&kind)
    }

    /// Registered accepted kinds, in no particular order
    pub fn kinds(&self) -> impl Iterator<Item = ErrorKind> + '_ {
        self.groups.keys().copied()
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn insert(&mut self, group: PolicyGroup) -> Result<()> {
        let kind = group.handles();
        if self.groups.contains_key(&kind) {
            return Err(ConfigurationError::DuplicateHandledKind { kind });
        }
        self.groups.insert(kind, group);
        Ok(())
    }
}

#[derive(Debug)]
enum RegistryState {
    Open(PolicySnapshot),
    Locked(Arc<PolicySnapshot>),
}

/// Write-once collection of policy groups
#[derive(Debug)]
pub struct PolicyRegistry {
    state: RegistryState,
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRegistry {
    /// Create an open, empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RegistryState::Open(PolicySnapshot::default()),
        }
    }

    /// Whether the registry has been locked
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self.state, RegistryState::Locked(_))
    }

    /// Number of registered groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether no group is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Whether a group accepting exactly `kind` is registered
    #[must_use]
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.snapshot().contains(kind)
    }

    /// Register a policy group
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigurationError::RegistryLocked`] once the registry is locked,
    /// and with [`ConfigurationError::DuplicateHandledKind`] when the accepted kind is
    /// already registered.
    pub fn add_policy_group(&mut self, group: PolicyGroup) -> Result<()> {
        let kind = group.handles();
        let result = match &mut self.state {
            RegistryState::Locked(_) => Err(ConfigurationError::RegistryLocked { kind }),
            RegistryState::Open(snapshot) => snapshot.insert(group),
        };

        match &result {
            Ok(()) => debug!(handles = %kind, "Policy group registered"),
            Err(error) => LoggingTransformer::log_configuration_error("add_policy_group", error),
        }
        result
    }

    /// Lock the registry and create a manager with default parts
    ///
    /// `None` selects the configured unconfigured rule and the default matching strategy.
    pub fn lock_and_create_manager(
        &mut self,
        rule: Option<Arc<dyn UnconfiguredRule>>,
        strategy: Option<Arc<dyn PolicyMatchingStrategy>>,
    ) -> ExceptionManager {
        self.lock_and_create_manager_with(ManagerConfig::default(), rule, strategy)
    }

    /// Lock the registry and create a manager using `config`
    ///
    /// Locking is irreversible. Locking again hands out another manager over the same
    /// snapshot.
    pub fn lock_and_create_manager_with(
        &mut self,
        config: ManagerConfig,
        rule: Option<Arc<dyn UnconfiguredRule>>,
        strategy: Option<Arc<dyn PolicyMatchingStrategy>>,
    ) -> ExceptionManager {
        let snapshot = self.lock();
        let rule = rule.unwrap_or_else(|| config.fallback.rule());
        let strategy = strategy.unwrap_or_else(|| config.default_strategy());
        ExceptionManager::from_parts(snapshot, rule, strategy, config)
    }

    fn lock(&mut self) -> Arc<PolicySnapshot> {
        let snapshot = match &mut self.state {
            RegistryState::Locked(snapshot) => return Arc::clone(snapshot),
            RegistryState::Open(snapshot) => Arc::new(std::mem::take(snapshot)),
        };
        debug!(groups = snapshot.len(), "Policy registry locked");
        self.state = RegistryState::Locked(Arc::clone(&snapshot));
        snapshot
    }

    fn snapshot(&self) -> &PolicySnapshot {
        match &self.state {
            RegistryState::Open(snapshot) => snapshot,
            RegistryState::Locked(snapshot) => snapshot.as_ref(),
        }
    }
}
