//! Policies and policy groups
//!
//! A [`Policy`] is one completed chain: it accepts errors of one kind, runs them
//! through its steps in order and yields an error of its declared return kind.
//! A [`PolicyGroup`] collects the policies for one accepted kind, told apart by
//! context label.

mod group;
mod step;

pub use group::PolicyGroup;
pub use step::HandlerStep;

use crate::error::KindMismatchError;
use crate::resolver::Resolver;
use faultline_common::{ErrorKind, RaisedError, MAX_HIERARCHY_DEPTH};
use std::sync::Arc;
use tracing::debug;

/// Treat an empty label the same as no label
pub(crate) fn normalize_context(context: Option<&str>) -> Option<&str> {
    context.filter(|label| !label.is_empty())
}

/// A completed transformation chain for one accepted kind
#[derive(Debug, Clone)]
pub struct Policy {
    handles: ErrorKind,
    returns: ErrorKind,
    context: Option<String>,
    chain: Arc<[HandlerStep]>,
}

impl Policy {
    /// Only the chain builder creates policies, after checking the chain
    pub(crate) fn from_checked_chain(
        handles: ErrorKind,
        returns: ErrorKind,
        context: Option<String>,
        chain: Vec<HandlerStep>,
    ) -> Self {
        Self {
            handles,
            returns,
            context,
            chain: chain.into(),
        }
    }

    /// Accepted kind
    #[must_use]
    pub fn handles(&self) -> ErrorKind {
        self.handles
    }

    /// Kind every run produces
    #[must_use]
    pub fn returns(&self) -> ErrorKind {
        self.returns
    }

    /// Context label, `None` for the group's fallback policy
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Steps in execution order
    #[must_use]
    pub fn steps(&self) -> &[HandlerStep] {
        &self.chain
    }

    /// Run `error` through the chain and return the error to raise
    ///
    /// A specialized error is first generalized to the accepted kind. Any failure
    /// along the way (a kind that cannot reach the accepted kind, a handler the
    /// resolver cannot supply) becomes the returned error.
    pub fn handle(&self, resolver: &dyn Resolver, error: RaisedError) -> RaisedError {
        self.handle_within(resolver, error, MAX_HIERARCHY_DEPTH)
    }

    /// Like [`Policy::handle`] with generalization bounded by `max_depth` steps
    pub fn handle_within(
        &self,
        resolver: &dyn Resolver,
        error: RaisedError,
        max_depth: usize,
    ) -> RaisedError {
        let mut current = match error.generalize_within(self.handles, max_depth) {
            Ok(accepted) => accepted,
            Err(unreachable) => {
                return RaisedError::new(KindMismatchError::new(self.handles, unreachable));
            }
        };

        for (position, step) in self.chain.iter().enumerate() {
            debug!(
                position,
                handler = step.handler().name(),
                input = %step.input(),
                output = %step.output(),
                "Running chain step"
            );
            current = match step.run(resolver, current) {
                Ok(next) => next,
                Err(failure) => return failure,
            };
        }

        current
    }
}
