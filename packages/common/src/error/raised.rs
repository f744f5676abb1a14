//! Type-erased raised errors

use super::aggregate::AggregateError;
use super::types::{ErrorKind, Exception, MAX_HIERARCHY_DEPTH};

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;
type GeneralizeFn = fn(BoxedError) -> std::result::Result<RaisedError, BoxedError>;

/// An exception in flight, with its concrete type erased
///
/// Keeps the [`ErrorKind`] of the value it carries so policies can be matched without
/// knowing the concrete type, and can be downcast back once matched.
pub struct RaisedError {
    pub(super) kind: ErrorKind,
    pub(super) inner: BoxedError,
    generalize: GeneralizeFn,
    /// Backtrace captured where the error was first raised
    #[cfg(feature = "full-backtrace")]
    pub(super) backtrace: backtrace::Backtrace,
}

impl RaisedError {
    /// Raise an exception value
    #[must_use]
    pub fn new<E: Exception>(error: E) -> Self {
        Self {
            kind: ErrorKind::of::<E>(),
            inner: Box::new(error),
            generalize: generalize_erased::<E>,
            #[cfg(feature = "full-backtrace")]
            backtrace: backtrace::Backtrace::new_unresolved(),
        }
    }

    /// Kind of the carried exception
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether the carried exception is exactly `E`
    #[must_use]
    pub fn is<E: Exception>(&self) -> bool {
        self.inner.is::<E>()
    }

    /// Borrow the carried exception as `E`
    #[must_use]
    pub fn downcast_ref<E: Exception>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// Take the carried exception as `E`, handing `self` back on mismatch
    pub fn downcast<E: Exception>(self) -> std::result::Result<E, Self> {
        let Self {
            kind,
            inner,
            generalize,
            #[cfg(feature = "full-backtrace")]
            backtrace,
        } = self;

        match inner.downcast::<E>() {
            Ok(error) => Ok(*error),
            Err(inner) => Err(Self {
                kind,
                inner,
                generalize,
                #[cfg(feature = "full-backtrace")]
                backtrace,
            }),
        }
    }

    /// Convert the carried exception into its base kind
    pub fn generalize(self) -> std::result::Result<Self, Self> {
        let Self {
            kind,
            inner,
            generalize,
            #[cfg(feature = "full-backtrace")]
            backtrace,
        } = self;

        match generalize(inner) {
            Ok(base) => {
                #[cfg(feature = "full-backtrace")]
                let base = Self { backtrace, ..base };
                Ok(base)
            }
            Err(inner) => Err(Self {
                kind,
                inner,
                generalize,
                #[cfg(feature = "full-backtrace")]
                backtrace,
            }),
        }
    }

    /// Generalize until the carried exception is of kind `target`
    ///
    /// Fails with the last value reached when the hierarchy ends first.
    pub fn generalize_to(self, target: ErrorKind) -> std::result::Result<Self, Self> {
        self.generalize_within(target, MAX_HIERARCHY_DEPTH)
    }

    /// Generalize toward `target` taking at most `max_steps` steps
    ///
    /// Fails with the last value reached when the hierarchy ends or the
    /// bound is hit first.
    pub fn generalize_within(
        self,
        target: ErrorKind,
        max_steps: usize,
    ) -> std::result::Result<Self, Self> {
        let mut current = self;
        for _ in 0..max_steps {
            if current.kind == target {
                return Ok(current);
            }
            current = current.generalize()?;
        }
        if current.kind == target {
            Ok(current)
        } else {
            Err(current)
        }
    }

    /// Replace an aggregate holding exactly one error with that error
    ///
    /// Only one level is unwrapped. Anything else is returned unchanged,
    /// backtrace included.
    #[must_use]
    pub fn unwrap_single_aggregate(self) -> Self {
        if self.downcast_ref::<AggregateError>().map(AggregateError::len) != Some(1) {
            return self;
        }
        match self.downcast::<AggregateError>() {
            Ok(aggregate) => match aggregate.into_single() {
                Ok(inner) => inner,
                Err(aggregate) => Self::new(aggregate),
            },
            Err(other) => other,
        }
    }

    /// Get the backtrace
    #[cfg(feature = "full-backtrace")]
    #[must_use]
    pub fn backtrace(&self) -> &backtrace::Backtrace {
        &self.backtrace
    }
}

impl<E: Exception> From<E> for RaisedError {
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

fn generalize_erased<E: Exception>(
    inner: BoxedError,
) -> std::result::Result<RaisedError, BoxedError> {
    match inner.downcast::<E>() {
        Ok(error) => (*error)
            .generalize()
            .map_err(|error| Box::new(error) as BoxedError),
        Err(inner) => Err(inner),
    }
}
