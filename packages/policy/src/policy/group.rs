//! Policies sharing one accepted kind

use super::{normalize_context, Policy};
use crate::error::{ConfigurationError, Result};
use faultline_common::ErrorKind;

/// All policies for one accepted kind, at most one per context label
#[derive(Debug, Clone)]
pub struct PolicyGroup {
    handles: ErrorKind,
    policies: Vec<Policy>,
}

impl PolicyGroup {
    /// Group policies that all accept the same kind
    ///
    /// # Errors
    ///
    /// Fails when no policy is given, when the policies accept different kinds, or
    /// when two policies share a context label (two unlabeled ones included).
    pub fn from_policies<I>(policies: I) -> Result<Self>
    where
        I: IntoIterator<Item = Policy>,
    {
        let policies: Vec<Policy> = policies.into_iter().collect();
        let handles = policies
            .first()
            .map(Policy::handles)
            .ok_or(ConfigurationError::EmptyPolicyGroup)?;

        for (index, policy) in policies.iter().enumerate() {
            if policy.handles() != handles {
                return Err(ConfigurationError::MixedHandledKinds {
                    expected: handles,
                    found: policy.handles(),
                });
            }
            let duplicate = policies[..index]
                .iter()
                .any(|earlier| earlier.context() == policy.context());
            if duplicate {
                return Err(ConfigurationError::DuplicateContext {
                    handles,
                    context: policy.context().map(str::to_owned),
                });
            }
        }

        Ok(Self { handles, policies })
    }

    /// Accepted kind shared by every policy
    #[must_use]
    pub fn handles(&self) -> ErrorKind {
        self.handles
    }

    /// Policies in the order they were built
    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Policy labeled exactly `label`
    #[must_use]
    pub fn labeled(&self, label: &str) -> Option<&Policy> {
        self.policies
            .iter()
            .find(|policy| policy.context() == Some(label))
    }

    /// The unlabeled fallback policy
    #[must_use]
    pub fn unlabeled(&self) -> Option<&Policy> {
        self.policies.iter().find(|policy| policy.context().is_none())
    }

    /// Labeled policy for `context` if there is one, else the unlabeled policy
    #[must_use]
    pub fn select(&self, context: Option<&str>) -> Option<&Policy> {
        normalize_context(context)
            .and_then(|label| self.labeled(label))
            .or_else(|| self.unlabeled())
    }
}
