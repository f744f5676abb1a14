//! Display and trait implementations for RaisedError

use super::raised::RaisedError;
use std::fmt;

impl fmt::Display for RaisedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for RaisedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RaisedError")
            .field("kind", &self.kind)
            .field("error", &self.inner)
            .finish_non_exhaustive()
    }
}

impl std::error::Error for RaisedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}
