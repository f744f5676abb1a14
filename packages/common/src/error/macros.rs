//! Macros for declaring and raising exceptions

/// Declare an exception type, optionally specializing a base kind
///
/// ```rust,ignore
/// exception!(StorageError);
/// exception!(DiskFullError: StorageError);
/// ```
///
/// The second form needs `impl From<DiskFullError> for StorageError`.
#[macro_export]
macro_rules! exception {
    ($ty:ty) => {
        impl $crate::Exception for $ty {}
    };
    ($ty:ty : $base:ty) => {
        impl $crate::Exception for $ty {
            fn base_kind() -> ::std::option::Option<$crate::ErrorKind> {
                ::std::option::Option::Some($crate::ErrorKind::of::<$base>())
            }

            fn generalize(self) -> ::std::result::Result<$crate::RaisedError, Self> {
                ::std::result::Result::Ok($crate::RaisedError::new(
                    <$base as ::std::convert::From<$ty>>::from(self),
                ))
            }
        }
    };
}

/// Return early with a raised exception
#[macro_export]
macro_rules! raise {
    ($error:expr) => {
        return ::std::result::Result::Err($crate::RaisedError::new($error).into())
    };
}
