//! Aggregate wrapper for errors raised together

use super::raised::RaisedError;
use super::types::Exception;
use thiserror::Error;

/// Several errors raised as one, typically by parallel work
#[derive(Debug, Error)]
#[error("{message} ({count} inner errors)", count = .inner.len())]
pub struct AggregateError {
    message: String,
    inner: Vec<RaisedError>,
}

impl Exception for AggregateError {}

impl AggregateError {
    /// Wrap the given errors
    pub fn new<S, I>(message: S, inner: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = RaisedError>,
    {
        Self {
            message: message.into(),
            inner: inner.into_iter().collect(),
        }
    }

    /// Outer message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wrapped errors in the order they were given
    #[must_use]
    pub fn inner_errors(&self) -> &[RaisedError] {
        &self.inner
    }

    /// Number of wrapped errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing is wrapped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Take the only wrapped error, or get `self` back when there are zero or several
    pub fn into_single(mut self) -> std::result::Result<RaisedError, Self> {
        match self.inner.len() {
            1 => self.inner.pop().ok_or(self),
            _ => Err(self),
        }
    }

    /// Take all wrapped errors
    #[must_use]
    pub fn into_inner(self) -> Vec<RaisedError> {
        self.inner
    }
}
