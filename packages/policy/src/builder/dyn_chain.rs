//! Chain builder with runtime state checks

use crate::error::{ConfigurationError, Result};
use crate::policy::{HandlerStep, Policy};
use faultline_common::ErrorKind;
use tracing::debug;

/// Where a chain is in its construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// No step yet
    Start,
    /// At least one step, not terminated
    Intermediate,
    /// Terminated, ready to become a policy
    Complete,
}

/// Chain builder for steps only known at runtime
///
/// Every call is checked against the current [`ChainState`] and the kind produced
/// by the previous step. The first violation is kept and reported by
/// [`build`](Self::build); calls after it are ignored.
#[derive(Debug)]
pub struct DynChainBuilder {
    handles: ErrorKind,
    returns: ErrorKind,
    context: Option<String>,
    state: ChainState,
    steps: Vec<HandlerStep>,
    violation: Option<ConfigurationError>,
}

impl DynChainBuilder {
    /// Start a chain accepting `handles` and returning `returns`
    #[must_use]
    pub fn new(handles: ErrorKind, returns: ErrorKind) -> Self {
        Self {
            handles,
            returns,
            context: None,
            state: ChainState::Start,
            steps: Vec::new(),
            violation: None,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Steps added so far
    #[must_use]
    pub fn steps(&self) -> &[HandlerStep] {
        &self.steps
    }

    /// Attach a context label; an empty label means no label
    #[must_use]
    pub fn set_context<S: Into<String>>(mut self, label: S) -> Self {
        if self.violation.is_some() {
            return self;
        }
        if self.state == ChainState::Complete {
            let state = self.state;
            return self.violate(ConfigurationError::IllegalTransition {
                operation: "set_context",
                state,
            });
        }
        let label = label.into();
        self.context = (!label.is_empty()).then_some(label);
        self
    }

    /// Single-step chain: Start to Complete
    #[must_use]
    pub fn start_and_complete(self, step: HandlerStep) -> Self {
        self.push("start_and_complete", ChainState::Start, step, ChainState::Complete)
    }

    /// First step of a longer chain: Start to Intermediate
    #[must_use]
    pub fn start(self, step: HandlerStep) -> Self {
        self.push("start", ChainState::Start, step, ChainState::Intermediate)
    }

    /// Another step: Intermediate to Intermediate
    #[must_use]
    pub fn then(self, step: HandlerStep) -> Self {
        self.push("then", ChainState::Intermediate, step, ChainState::Intermediate)
    }

    /// Terminating step: Intermediate to Complete
    #[must_use]
    pub fn then_complete(self, step: HandlerStep) -> Self {
        self.push(
            "then_complete",
            ChainState::Intermediate,
            step,
            ChainState::Complete,
        )
    }

    /// Materialize the chain as a policy
    ///
    /// # Errors
    ///
    /// Returns the first recorded violation, or [`ConfigurationError::IncompleteChain`]
    /// when the chain never reached [`ChainState::Complete`].
    pub fn build(self) -> Result<Policy> {
        if let Some(violation) = self.violation {
            return Err(violation);
        }
        if self.state != ChainState::Complete {
            return Err(ConfigurationError::IncompleteChain {
                handles: self.handles,
                context: self.context,
                state: self.state,
            });
        }

        debug!(
            handles = %self.handles,
            returns = %self.returns,
            context = ?self.context,
            steps = self.steps.len(),
            "Chain built"
        );
        Ok(Policy::from_checked_chain(
            self.handles,
            self.returns,
            self.context,
            self.steps,
        ))
    }

    fn push(
        mut self,
        operation: &'static str,
        required: ChainState,
        step: HandlerStep,
        next: ChainState,
    ) -> Self {
        if self.violation.is_some() {
            return self;
        }
        if self.state != required {
            let state = self.state;
            return self.violate(ConfigurationError::IllegalTransition { operation, state });
        }

        let expected = self.steps.last().map_or(self.handles, HandlerStep::output);
        if step.input() != expected {
            let position = self.steps.len();
            return self.violate(ConfigurationError::ChainKindMismatch {
                position,
                expected,
                found: step.input(),
            });
        }
        if next == ChainState::Complete && step.output() != self.returns {
            let (handles, expected) = (self.handles, self.returns);
            return self.violate(ConfigurationError::ReturnKindMismatch {
                handles,
                expected,
                found: step.output(),
            });
        }

        self.steps.push(step);
        self.state = next;
        self
    }

    fn violate(mut self, violation: ConfigurationError) -> Self {
        debug!(%violation, "Chain builder violation recorded");
        self.violation = Some(violation);
        self
    }
}
