//! Type states for the chain builder

use std::marker::PhantomData;

/// Type state indicating no step has been added
pub struct Start;

/// Type state indicating the last step produces `E` and the chain is not terminated
pub struct Intermediate<E>(PhantomData<fn() -> E>);

/// Type state indicating the chain is terminated
pub struct Complete;
