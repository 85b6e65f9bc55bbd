//! Result extensions.

use crate::error::{Error, Result};

/// Extension trait attaching file context to I/O results.
pub trait ResultExt<T> {
    /// Wrap an I/O failure as a [`Error::FileSystem`] naming `path`.
    fn fs_context(self, message: impl Into<String>, path: impl Into<String>) -> Result<T>;

    /// Lazy variant of [`ResultExt::fs_context`].
    fn with_fs_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> (String, String);
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, message: impl Into<String>, path: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(Box::new(e)),
        })
    }

    fn with_fs_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> (String, String),
    {
        self.map_err(|e| {
            let (message, path) = f();
            Error::FileSystem {
                message,
                path: Some(path),
                source: Some(Box::new(e)),
            }
        })
    }
}
