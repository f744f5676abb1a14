//! Typesafe chain builder
//!
//! Usage: `builder.start::<H1>().then::<H2>().then_complete::<H3>()`
//!
//! Each transition is only available from the state that allows it, and each step's
//! `Source` must be the previous step's `Target`, so malformed chains do not compile.

use super::dyn_chain::DynChainBuilder;
use super::states::{Complete, Intermediate, Start};
use crate::error::Result;
use crate::policy::{HandlerStep, Policy};
use faultline_common::{ErrorKind, Exception, ExceptionHandler};
use std::marker::PhantomData;

/// Chain builder for a policy accepting `A` and returning `R`, in state `S`
pub struct ChainBuilder<A, R, S> {
    inner: DynChainBuilder,
    _state: PhantomData<fn() -> (A, R, S)>,
}

impl<A, R, S> ChainBuilder<A, R, S> {
    fn transition<T>(inner: DynChainBuilder) -> ChainBuilder<A, R, T> {
        ChainBuilder {
            inner,
            _state: PhantomData,
        }
    }
}

impl<A: Exception, R: Exception> ChainBuilder<A, R, Start> {
    pub(crate) fn new() -> Self {
        Self::transition(DynChainBuilder::new(
            ErrorKind::of::<A>(),
            ErrorKind::of::<R>(),
        ))
    }

    /// Attach a context label to the policy being built
    #[must_use]
    pub fn set_context<S: Into<String>>(self, label: S) -> Self {
        Self::transition(self.inner.set_context(label))
    }

    /// Single-step chain
    #[must_use]
    pub fn start_and_complete<H>(self) -> ChainBuilder<A, R, Complete>
    where
        H: ExceptionHandler<Source = A, Target = R> + Default,
    {
        Self::transition(self.inner.start_and_complete(HandlerStep::of::<H>()))
    }

    /// First step of a multi-step chain
    #[must_use]
    pub fn start<H>(self) -> ChainBuilder<A, R, Intermediate<H::Target>>
    where
        H: ExceptionHandler<Source = A> + Default,
    {
        Self::transition(self.inner.start(HandlerStep::of::<H>()))
    }
}

impl<A: Exception, R: Exception, E: Exception> ChainBuilder<A, R, Intermediate<E>> {
    /// Attach a context label to the policy being built
    #[must_use]
    pub fn set_context<S: Into<String>>(self, label: S) -> Self {
        Self::transition(self.inner.set_context(label))
    }

    /// Append a step accepting what the previous step produced
    #[must_use]
    pub fn then<H>(self) -> ChainBuilder<A, R, Intermediate<H::Target>>
    where
        H: ExceptionHandler<Source = E> + Default,
    {
        Self::transition(self.inner.then(HandlerStep::of::<H>()))
    }

    /// Append the terminating step
    #[must_use]
    pub fn then_complete<H>(self) -> ChainBuilder<A, R, Complete>
    where
        H: ExceptionHandler<Source = E, Target = R> + Default,
    {
        Self::transition(self.inner.then_complete(HandlerStep::of::<H>()))
    }
}

impl<A, R> ChainBuilder<A, R, Complete> {
    /// Materialize the completed chain
    ///
    /// # Errors
    ///
    /// Propagates any violation the underlying builder recorded.
    pub fn into_policy(self) -> Result<Policy> {
        self.inner.build()
    }
}
