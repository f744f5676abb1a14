//! Handler steps that transform one exception into another
//!
//! A handler is the unit a policy chain is assembled from: it accepts an exception of
//! its `Source` kind and produces one of its `Target` kind.

use crate::Exception;
use std::marker::PhantomData;

/// One translation step
pub trait ExceptionHandler: Send + Sync + 'static {
    /// Kind this handler accepts
    type Source: Exception;
    /// Kind this handler produces
    type Target: Exception;

    /// Transform the exception
    fn handle(&self, source: Self::Source) -> Self::Target;
}

/// Handler that translates through `From<S> for T`
pub struct ConvertHandler<S, T> {
    _phantom: PhantomData<fn(S) -> T>,
}

impl<S, T> Default for ConvertHandler<S, T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<S, T> ExceptionHandler for ConvertHandler<S, T>
where
    S: Exception,
    T: Exception + From<S>,
{
    type Source = S;
    type Target = T;

    fn handle(&self, source: S) -> T {
        tracing::trace!(
            from = std::any::type_name::<S>(),
            to = std::any::type_name::<T>(),
            "Converting exception"
        );
        T::from(source)
    }
}

/// Handler that returns its input unchanged
pub struct PassThroughHandler<E> {
    _phantom: PhantomData<fn(E) -> E>,
}

impl<E> Default for PassThroughHandler<E> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<E: Exception> ExceptionHandler for PassThroughHandler<E> {
    type Source = E;
    type Target = E;

    fn handle(&self, source: E) -> E {
        source
    }
}
