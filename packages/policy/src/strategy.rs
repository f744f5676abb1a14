//! Policy matching strategies

use crate::policy::Policy;
use crate::registry::PolicySnapshot;
use faultline_common::{ErrorKind, MAX_HIERARCHY_DEPTH};
use tracing::debug;

/// Selects the policy that handles an error kind in a context
pub trait PolicyMatchingStrategy: Send + Sync {
    /// Policy for `kind` in `context`, or `None` when nothing applies
    fn match_policy<'a>(
        &self,
        snapshot: &'a PolicySnapshot,
        kind: ErrorKind,
        context: Option<&str>,
    ) -> Option<&'a Policy>;
}

/// Walks from the error's kind towards the root of its hierarchy
///
/// The first kind with a registered group decides: its policy labeled with the
/// context wins, then its unlabeled policy. If that group has neither, the walk stops
/// there and nothing matches; less specific groups are not consulted.
#[derive(Debug, Clone, Copy)]
pub struct DefaultPolicyMatchingStrategy {
    max_depth: usize,
}

impl Default for DefaultPolicyMatchingStrategy {
    fn default() -> Self {
        Self {
            max_depth: MAX_HIERARCHY_DEPTH,
        }
    }
}

impl DefaultPolicyMatchingStrategy {
    /// Strategy following at most `max_depth` kinds, the error's own kind included
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Maximum number of kinds visited
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl PolicyMatchingStrategy for DefaultPolicyMatchingStrategy {
    fn match_policy<'a>(
        &self,
        snapshot: &'a PolicySnapshot,
        kind: ErrorKind,
        context: Option<&str>,
    ) -> Option<&'a Policy> {
        let group = kind
            .ancestors()
            .take(self.max_depth)
            .find_map(|candidate| snapshot.group(candidate))?;

        let policy = group.select(context);
        debug!(
            kind = %kind,
            group = %group.handles(),
            context = ?context,
            matched = policy.is_some(),
            "Policy group selected"
        );
        policy
    }
}
