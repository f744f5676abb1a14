//! Exception hierarchy and handlers shared by the policy tests
//!
//! ```text
//! AppError
//! ├── StorageError
//! │   └── DiskFull
//! └── NetworkError
//!     └── Timeout
//! ```
//!
//! `ServiceUnavailable`, `Audited`, `UserFacing` and `Unconfigured` are unrelated roots.

#![allow(dead_code)]

use faultline_common::{exception, ConvertHandler, Exception, ExceptionHandler, RaisedError};
use faultline_policy::{PolicyGroup, PolicyGroupBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("app: {0}")]
pub struct AppError(pub String);
exception!(AppError);

#[derive(Debug, Error)]
#[error("storage: {0}")]
pub struct StorageError(pub String);
exception!(StorageError: AppError);

#[derive(Debug, Error)]
#[error("disk full: {0}")]
pub struct DiskFull(pub String);
exception!(DiskFull: StorageError);

#[derive(Debug, Error)]
#[error("network: {0}")]
pub struct NetworkError(pub String);
exception!(NetworkError: AppError);

#[derive(Debug, Error)]
#[error("timeout after {0}ms")]
pub struct Timeout(pub u64);
exception!(Timeout: NetworkError);

#[derive(Debug, Error)]
#[error("service unavailable: {0}")]
pub struct ServiceUnavailable(pub String);
exception!(ServiceUnavailable);

#[derive(Debug, Error)]
#[error("audited: {0}")]
pub struct Audited(pub String);
exception!(Audited);

#[derive(Debug, Error)]
#[error("user facing: {0}")]
pub struct UserFacing(pub String);
exception!(UserFacing);

#[derive(Debug, Error)]
#[error("nobody handles this")]
pub struct Unconfigured;
exception!(Unconfigured);

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        AppError(error.0)
    }
}

impl From<DiskFull> for StorageError {
    fn from(error: DiskFull) -> Self {
        StorageError(format!("disk {}", error.0))
    }
}

impl From<NetworkError> for AppError {
    fn from(error: NetworkError) -> Self {
        AppError(error.0)
    }
}

impl From<Timeout> for NetworkError {
    fn from(error: Timeout) -> Self {
        NetworkError(format!("timed out after {}ms", error.0))
    }
}

impl From<AppError> for ServiceUnavailable {
    fn from(error: AppError) -> Self {
        ServiceUnavailable(format!("from app: {}", error.0))
    }
}

impl From<StorageError> for ServiceUnavailable {
    fn from(error: StorageError) -> Self {
        ServiceUnavailable(format!("from storage: {}", error.0))
    }
}

impl From<DiskFull> for ServiceUnavailable {
    fn from(error: DiskFull) -> Self {
        ServiceUnavailable(format!("from disk: {}", error.0))
    }
}

impl From<NetworkError> for ServiceUnavailable {
    fn from(error: NetworkError) -> Self {
        ServiceUnavailable(format!("from network: {}", error.0))
    }
}

impl From<Timeout> for ServiceUnavailable {
    fn from(error: Timeout) -> Self {
        ServiceUnavailable(format!("from timeout: {}", error.0))
    }
}

impl From<Audited> for UserFacing {
    fn from(error: Audited) -> Self {
        UserFacing(error.0)
    }
}

impl From<StorageError> for UserFacing {
    fn from(error: StorageError) -> Self {
        UserFacing(format!("plain {}", error.0))
    }
}

impl From<AppError> for UserFacing {
    fn from(error: AppError) -> Self {
        UserFacing(format!("plain {}", error.0))
    }
}

impl From<ServiceUnavailable> for UserFacing {
    fn from(error: ServiceUnavailable) -> Self {
        UserFacing(error.0)
    }
}

/// Wraps any exception's message into [`Audited`]
pub struct AuditHandler<S>(std::marker::PhantomData<fn(S)>);

impl<S> Default for AuditHandler<S> {
    fn default() -> Self {
        Self(std::marker::PhantomData)
    }
}

impl<S: Exception> ExceptionHandler for AuditHandler<S> {
    type Source = S;
    type Target = Audited;

    fn handle(&self, source: S) -> Audited {
        Audited(source.to_string())
    }
}

/// Prefixes storage failures with a configurable label
#[derive(Clone)]
pub struct LabelHandler {
    pub label: String,
}

impl Default for LabelHandler {
    fn default() -> Self {
        Self {
            label: "default".into(),
        }
    }
}

impl ExceptionHandler for LabelHandler {
    type Source = StorageError;
    type Target = ServiceUnavailable;

    fn handle(&self, source: StorageError) -> ServiceUnavailable {
        ServiceUnavailable(format!("{}: {}", self.label, source.0))
    }
}

/// Group with a single unlabeled `From` conversion
pub fn convert_group<A, R>() -> PolicyGroup
where
    A: Exception,
    R: Exception + From<A>,
{
    PolicyGroupBuilder::<A, R>::create(|chain| chain.start_and_complete::<ConvertHandler<A, R>>())
        .expect("single-step conversion chains are always valid")
}

/// Group translating `A` into [`UserFacing`]
///
/// The unlabeled policy converts directly (`UserFacing("plain ...")`); each labeled
/// policy audits first, so its result carries the source's full display text.
pub fn labeled_group<A>(contexts: &[&str]) -> PolicyGroup
where
    A: Exception,
    UserFacing: From<A>,
{
    contexts
        .iter()
        .map(|label| (*label).to_owned())
        .fold(
            PolicyGroupBuilder::<A, UserFacing>::new()
                .policy(|chain| chain.start_and_complete::<ConvertHandler<A, UserFacing>>()),
            |builder, label| {
                builder.policy(move |chain| {
                    chain
                        .set_context(label)
                        .start::<AuditHandler<A>>()
                        .then_complete::<ConvertHandler<Audited, UserFacing>>()
                })
            },
        )
        .build()
        .expect("labeled groups with distinct contexts are valid")
}

/// Downcast and take the message of a translated error
pub fn message_of<E: Exception + std::fmt::Display>(raised: &RaisedError) -> Option<String> {
    raised.downcast_ref::<E>().map(ToString::to_string)
}
