use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`crate::LookupService`].
#[derive(Debug, Error)]
pub enum LookupError {
    /// The database could not be reached.
    #[error("database unavailable: {0}")]
    Connection(#[source] skrytki_core::Error),

    /// A statement failed on a healthy connection.
    #[error("query failed: {0}")]
    Query(#[source] skrytki_core::Error),

    /// The request itself is unusable (empty query, bad id, zero limit).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request did not finish within its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl LookupError {
    /// Sort a storage error into [`LookupError::Connection`] or
    /// [`LookupError::Query`].
    #[must_use]
    pub fn from_storage(err: skrytki_core::Error) -> Self {
        if err.is_connectivity() {
            Self::Connection(err)
        } else {
            Self::Query(err)
        }
    }

    /// Whether the same request may succeed on a fresh connection.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(e) if !matches!(e, skrytki_core::Error::PoolClosed))
    }
}

impl From<rusqlite::Error> for LookupError {
    fn from(err: rusqlite::Error) -> Self {
        Self::from_storage(skrytki_core::Error::Database(err))
    }
}
