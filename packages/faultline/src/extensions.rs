//! Extension traits for translating errors at the catch site

use faultline_common::RaisedError;
use faultline_policy::ExceptionManager;
use tracing::trace;

/// Translate the error side of a `Result` through an [`ExceptionManager`]
pub trait TranslateExt<T> {
    /// Leave `Ok` untouched; replace `Err` with whatever the manager raises for it
    ///
    /// # Errors
    ///
    /// Returns the translated error, or the unconfigured rule's error when nothing
    /// matches.
    fn translate_with(
        self,
        manager: &ExceptionManager,
        context: Option<&str>,
    ) -> Result<T, RaisedError>;

    /// [`translate_with`](Self::translate_with) without a context label
    ///
    /// # Errors
    ///
    /// Same as [`translate_with`](Self::translate_with).
    fn translate(self, manager: &ExceptionManager) -> Result<T, RaisedError>
    where
        Self: Sized,
    {
        self.translate_with(manager, None)
    }
}

impl<T, E: Into<RaisedError>> TranslateExt<T> for Result<T, E> {
    fn translate_with(
        self,
        manager: &ExceptionManager,
        context: Option<&str>,
    ) -> Result<T, RaisedError> {
        self.map_err(|error| {
            let error = error.into();
            trace!(kind = %error.kind(), context = ?context, "Translating at catch site");
            manager.translate(error, context)
        })
    }
}
