//! Manager configuration loadable from JSON
//!
//! Every field has a default, so `{}` is a valid document.

use crate::rules::{PolicyMissingRule, RethrowOriginalRule, UnconfiguredRule};
use crate::strategy::{DefaultPolicyMatchingStrategy, PolicyMatchingStrategy};
use faultline_common::MAX_HIERARCHY_DEPTH;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Manager settings, loadable from JSON
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Replace a single-child aggregate with its inner error before matching
    #[serde(default = "default_unwrap_aggregates")]
    pub unwrap_aggregates: bool,
    /// Kinds the default strategy visits before giving up (the error's own kind included)
    ///
    /// Also bounds how far a matched policy generalizes the error before its chain runs.
    #[serde(default = "default_max_generalization_depth")]
    pub max_generalization_depth: usize,
    /// Rule used when none is passed explicitly
    #[serde(default)]
    pub fallback: FallbackRule,
}

/// Built-in unconfigured rules selectable by name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackRule {
    /// Raise `PolicyMissingError`
    #[default]
    PolicyMissing,
    /// Log and raise the unmatched error unchanged
    RethrowOriginal,
}

impl FallbackRule {
    /// Instance of the selected rule
    #[must_use]
    pub fn rule(self) -> Arc<dyn UnconfiguredRule> {
        match self {
            Self::PolicyMissing => Arc::new(PolicyMissingRule),
            Self::RethrowOriginal => Arc::new(RethrowOriginalRule),
        }
    }
}

fn default_unwrap_aggregates() -> bool {
    true
}

fn default_max_generalization_depth() -> usize {
    MAX_HIERARCHY_DEPTH
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            unwrap_aggregates: default_unwrap_aggregates(),
            max_generalization_depth: default_max_generalization_depth(),
            fallback: FallbackRule::default(),
        }
    }
}

impl ManagerConfig {
    /// Parse a configuration, filling absent fields with defaults
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Default matching strategy bounded by `max_generalization_depth`
    #[must_use]
    pub fn default_strategy(&self) -> Arc<dyn PolicyMatchingStrategy> {
        Arc::new(DefaultPolicyMatchingStrategy::with_max_depth(
            self.max_generalization_depth,
        ))
    }
}
