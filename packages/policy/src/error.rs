//! Configuration errors and the exceptions the engine raises itself

use crate::builder::ChainState;
use faultline_common::{ErrorKind, Exception, RaisedError};
use thiserror::Error;

/// Violations detected while building chains or registering policy groups
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A group for this accepted kind is already registered
    #[error("a policy group handling `{kind}` is already registered")]
    DuplicateHandledKind {
        /// Accepted kind registered twice
        kind: ErrorKind,
    },

    /// The registry was locked before this registration
    #[error("the policy registry is locked; `{kind}` cannot be registered")]
    RegistryLocked {
        /// Accepted kind of the rejected group
        kind: ErrorKind,
    },

    /// A chain was materialized before reaching its terminating step
    #[error("chain for `{handles}`{} stopped in state {state:?}", context_suffix(.context))]
    IncompleteChain {
        /// Accepted kind of the chain
        handles: ErrorKind,
        /// Context label of the chain
        context: Option<String>,
        /// State the chain was left in
        state: ChainState,
    },

    /// Two policies in one group share a context label
    #[error("policy group for `{handles}` has more than one policy{}", context_suffix(.context))]
    DuplicateContext {
        /// Accepted kind of the group
        handles: ErrorKind,
        /// The repeated label, `None` for two unlabeled policies
        context: Option<String>,
    },

    /// A step does not accept what the previous step produces
    #[error("step {position} accepts `{found}` but `{expected}` flows into it")]
    ChainKindMismatch {
        /// Zero-based index of the offending step
        position: usize,
        /// Kind produced by the previous step (or the accepted kind)
        expected: ErrorKind,
        /// Kind the step accepts
        found: ErrorKind,
    },

    /// The terminating step does not produce the declared kind
    #[error("chain for `{handles}` must return `{expected}` but its last step returns `{found}`")]
    ReturnKindMismatch {
        /// Accepted kind of the chain
        handles: ErrorKind,
        /// Declared return kind
        expected: ErrorKind,
        /// Kind produced by the terminating step
        found: ErrorKind,
    },

    /// A builder operation was called from a state that does not allow it
    #[error("`{operation}` is not allowed once a chain is in state {state:?}")]
    IllegalTransition {
        /// Builder operation attempted
        operation: &'static str,
        /// State the builder was in
        state: ChainState,
    },

    /// A group mixes policies accepting different kinds
    #[error("policy group for `{expected}` received a policy handling `{found}`")]
    MixedHandledKinds {
        /// Kind of the first policy
        expected: ErrorKind,
        /// Kind of the offending policy
        found: ErrorKind,
    },

    /// A group was built without any policy
    #[error("a policy group needs at least one policy")]
    EmptyPolicyGroup,
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(label) => format!(" in context {label:?}"),
        None => String::new(),
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Raised when no policy matches an error
#[derive(Debug, Error)]
#[error("no exception policy configured for `{kind}`{}", context_suffix(.context))]
pub struct PolicyMissingError {
    kind: ErrorKind,
    context: Option<String>,
    #[source]
    source: RaisedError,
}

impl Exception for PolicyMissingError {}

impl PolicyMissingError {
    /// Describe the unmatched error
    #[must_use]
    pub fn new(source: RaisedError, context: Option<&str>) -> Self {
        Self {
            kind: source.kind(),
            context: context.map(str::to_owned),
            source,
        }
    }

    /// Kind that had no policy
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Context label the lookup used
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Take back the unmatched error
    #[must_use]
    pub fn into_source(self) -> RaisedError {
        self.source
    }
}

/// Raised when a handler instance cannot be obtained for a chain step
#[derive(Debug, Error)]
#[error("handler `{handler}` could not be resolved: {reason}")]
pub struct HandlerResolutionError {
    handler: &'static str,
    reason: &'static str,
}

impl Exception for HandlerResolutionError {}

impl HandlerResolutionError {
    pub(crate) fn unresolved(handler: &'static str) -> Self {
        Self {
            handler,
            reason: "the resolver returned no instance",
        }
    }

    pub(crate) fn wrong_type(handler: &'static str) -> Self {
        Self {
            handler,
            reason: "the resolver returned an instance of another type",
        }
    }

    /// Type name of the handler
    #[must_use]
    pub fn handler(&self) -> &'static str {
        self.handler
    }
}

/// Raised when an error reaches a policy or step that cannot accept its kind
#[derive(Debug, Error)]
#[error("expected an error of kind `{expected}` but received `{found}`")]
pub struct KindMismatchError {
    expected: ErrorKind,
    found: ErrorKind,
    #[source]
    source: RaisedError,
}

impl Exception for KindMismatchError {}

impl KindMismatchError {
    pub(crate) fn new(expected: ErrorKind, source: RaisedError) -> Self {
        Self {
            expected,
            found: source.kind(),
            source,
        }
    }

    /// Kind the policy or step accepts
    #[must_use]
    pub fn expected(&self) -> ErrorKind {
        self.expected
    }

    /// Kind that was received
    #[must_use]
    pub fn found(&self) -> ErrorKind {
        self.found
    }
}
