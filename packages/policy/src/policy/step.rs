//! A single step of a handler chain

use crate::error::{HandlerResolutionError, KindMismatchError};
use crate::resolver::{HandlerType, Resolver};
use faultline_common::{ErrorKind, ExceptionHandler, RaisedError};
use std::any::Any;
use std::fmt;

type InvokeFn = fn(&(dyn Any + Send + Sync), RaisedError) -> Result<RaisedError, RaisedError>;

/// One handler in a chain, with the kinds it accepts and produces
#[derive(Clone, Copy)]
pub struct HandlerStep {
    input: ErrorKind,
    output: ErrorKind,
    handler: HandlerType,
    invoke: InvokeFn,
}

impl HandlerStep {
    /// Step running handler `H`
    #[must_use]
    pub fn of<H: ExceptionHandler + Default>() -> Self {
        Self {
            input: ErrorKind::of::<H::Source>(),
            output: ErrorKind::of::<H::Target>(),
            handler: HandlerType::of::<H>(),
            invoke: invoke::<H>,
        }
    }

    /// Kind the step accepts
    #[must_use]
    pub fn input(&self) -> ErrorKind {
        self.input
    }

    /// Kind the step produces
    #[must_use]
    pub fn output(&self) -> ErrorKind {
        self.output
    }

    /// Handler type run by the step
    #[must_use]
    pub fn handler(&self) -> &HandlerType {
        &self.handler
    }

    /// Resolve the handler and run it; the `Err` side is the error to raise instead
    pub(crate) fn run(
        &self,
        resolver: &dyn Resolver,
        error: RaisedError,
    ) -> Result<RaisedError, RaisedError> {
        let Some(instance) = resolver.resolve(&self.handler) else {
            tracing::warn!(handler = self.handler.name(), "Resolver returned no handler");
            return Err(RaisedError::new(HandlerResolutionError::unresolved(
                self.handler.name(),
            )));
        };
        (self.invoke)(instance.as_ref(), error)
    }
}

impl fmt::Debug for HandlerStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerStep")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("handler", &self.handler)
            .finish()
    }
}

fn invoke<H: ExceptionHandler>(
    instance: &(dyn Any + Send + Sync),
    error: RaisedError,
) -> Result<RaisedError, RaisedError> {
    let Some(handler) = instance.downcast_ref::<H>() else {
        tracing::warn!(
            handler = std::any::type_name::<H>(),
            "Resolver returned a handler of another type"
        );
        return Err(RaisedError::new(HandlerResolutionError::wrong_type(
            std::any::type_name::<H>(),
        )));
    };

    let source = error.downcast::<H::Source>().map_err(|found| {
        RaisedError::new(KindMismatchError::new(ErrorKind::of::<H::Source>(), found))
    })?;

    Ok(RaisedError::new(handler.handle(source)))
}
