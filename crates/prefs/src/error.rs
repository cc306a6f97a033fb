//! Errors raised by the storage backends and the text codecs.
//!
//! The stores never hand these to their callers: a failing backend degrades
//! to defaults (see [`PreferenceStore`] and [`CollapseStore`]). They are
//! public so custom [`Storage`] implementations can report failures.
//!
//!  [`PreferenceStore`]: crate::PreferenceStore
//!  [`CollapseStore`]: crate::CollapseStore
//!  [`Storage`]: crate::Storage
use thiserror::Error;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage backend errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    /// `true` for the expected "no storage here" case, as opposed to a
    /// backend that exists but misbehaves.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// Returned when text cannot be read as a theme value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported theme: \"{0}\"")]
pub struct ParsePreferenceError(pub String);
