//! Error kinds and the exception trait

use super::raised::RaisedError;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Upper bound on generalization steps followed before a hierarchy is treated as cyclic
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// An error type that can be raised through the policy engine
///
/// Every exception names its immediate generalization (its base kind) and knows how to
/// convert itself into a value of that base. Root kinds keep the defaults. The
/// [`exception!`](crate::exception) macro writes both methods from a `From` impl.
pub trait Exception: std::error::Error + Send + Sync + 'static {
    /// Kind this exception generalizes to, `None` at the root of a hierarchy
    fn base_kind() -> Option<ErrorKind>
    where
        Self: Sized,
    {
        None
    }

    /// Convert into a value of the base kind, handing `self` back at the root
    fn generalize(self) -> std::result::Result<RaisedError, Self>
    where
        Self: Sized,
    {
        Err(self)
    }
}

/// Identity of an exception type plus its link to the base kind
#[derive(Clone, Copy)]
pub struct ErrorKind {
    id: TypeId,
    name: &'static str,
    base: fn() -> Option<ErrorKind>,
}

impl ErrorKind {
    /// Kind of the exception type `E`
    #[must_use]
    pub fn of<E: Exception>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
            base: E::base_kind,
        }
    }

    /// Fully qualified type name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path or generic arguments
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let head = self.name.split('<').next().unwrap_or(self.name);
        head.rsplit("::").next().unwrap_or(head)
    }

    /// Immediate generalization of this kind
    #[must_use]
    pub fn base(&self) -> Option<ErrorKind> {
        (self.base)()
    }

    /// This kind followed by each successive generalization
    #[must_use]
    pub fn ancestors(&self) -> Ancestors {
        Ancestors { next: Some(*self) }
    }

    /// Whether this kind equals `other` or generalizes to it
    #[must_use]
    pub fn is_a(&self, other: ErrorKind) -> bool {
        self.ancestors()
            .take(MAX_HIERARCHY_DEPTH)
            .any(|kind| kind == other)
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ErrorKind {}

impl Hash for ErrorKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorKind").field(&self.name).finish()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Iterator over a kind and its generalizations, most specific first
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<ErrorKind>,
}

impl Iterator for Ancestors {
    type Item = ErrorKind;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.base();
        Some(current)
    }
}
