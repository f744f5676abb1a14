//! Handler instantiation
//!
//! Chains store handler *types*; an instance is obtained from a [`Resolver`] every
//! time a step runs. [`DefaultResolver`] builds instances through `Default`,
//! [`ContainerResolver`] serves registered factories first.

use faultline_common::ExceptionHandler;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A handler instance with its type erased
pub type HandlerInstance = Box<dyn Any + Send + Sync>;

type Factory = Arc<dyn Fn() -> HandlerInstance + Send + Sync>;

/// Description of a handler type a chain step needs
#[derive(Clone, Copy)]
pub struct HandlerType {
    id: TypeId,
    name: &'static str,
    construct: fn() -> HandlerInstance,
}

impl HandlerType {
    /// Describe handler type `H`
    #[must_use]
    pub fn of<H: ExceptionHandler + Default>() -> Self {
        Self {
            id: TypeId::of::<H>(),
            name: std::any::type_name::<H>(),
            construct: construct_default::<H>,
        }
    }

    /// Type identity of the handler
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name of the handler
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build an instance through `Default`
    #[must_use]
    pub fn construct_default(&self) -> HandlerInstance {
        (self.construct)()
    }
}

impl fmt::Debug for HandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandlerType").field(&self.name).finish()
    }
}

fn construct_default<H: ExceptionHandler + Default>() -> HandlerInstance {
    Box::new(H::default())
}

/// Capability to produce handler instances
pub trait Resolver: Send + Sync {
    /// Produce an instance of `handler`, or `None` when it cannot
    fn resolve(&self, handler: &HandlerType) -> Option<HandlerInstance>;
}

/// Resolver that builds every handler through `Default`
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResolver;

impl Resolver for DefaultResolver {
    fn resolve(&self, handler: &HandlerType) -> Option<HandlerInstance> {
        Some(handler.construct_default())
    }
}

/// Resolver backed by registered factories
///
/// Types without a factory are built through `Default` unless the container is strict.
pub struct ContainerResolver {
    factories: HashMap<TypeId, Factory>,
    fallback_to_default: bool,
}

impl Default for ContainerResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerResolver {
    /// Create a container that falls back to `Default` construction
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            fallback_to_default: true,
        }
    }

    /// Create a container that only serves registered factories
    #[must_use]
    pub fn strict() -> Self {
        Self {
            factories: HashMap::new(),
            fallback_to_default: false,
        }
    }

    /// Register a factory for handler type `H`, replacing any previous one
    #[must_use]
    pub fn with_factory<H, F>(mut self, factory: F) -> Self
    where
        H: ExceptionHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || Box::new(factory()) as HandlerInstance);
        self.factories.insert(TypeId::of::<H>(), factory);
        self
    }

    /// Serve clones of `instance` for handler type `H`
    #[must_use]
    pub fn with_instance<H>(self, instance: H) -> Self
    where
        H: ExceptionHandler + Clone,
    {
        self.with_factory::<H, _>(move || instance.clone())
    }

    /// Whether a factory is registered for `H`
    #[must_use]
    pub fn contains<H: ExceptionHandler>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<H>())
    }
}

impl fmt::Debug for ContainerResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerResolver")
            .field("factories", &self.factories.len())
            .field("fallback_to_default", &self.fallback_to_default)
            .finish()
    }
}

impl Resolver for ContainerResolver {
    fn resolve(&self, handler: &HandlerType) -> Option<HandlerInstance> {
        match self.factories.get(&handler.id()) {
            Some(factory) => Some(factory()),
            None if self.fallback_to_default => Some(handler.construct_default()),
            None => None,
        }
    }
}
