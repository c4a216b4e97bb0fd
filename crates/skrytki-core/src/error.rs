use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("connection pool is closed")]
    PoolClosed,
}

impl Error {
    /// Returns `true` when the error means the database itself could not be
    /// reached (as opposed to a statement that failed on a healthy
    /// connection). A fresh connection may succeed where this one failed.
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Database(e) => is_connectivity_failure(e),
            Self::PoolClosed => true,
            Self::InvalidData(_) => false,
        }
    }
}

/// Classify a raw `rusqlite` error as a connectivity failure.
pub fn is_connectivity_failure(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.code,
            ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::SystemIoFailure
                | ErrorCode::NotADatabase
        ),
        _ => false,
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_failure(code: std::os::raw::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn test_busy_is_connectivity() {
        let err = Error::from(sqlite_failure(rusqlite::ffi::SQLITE_BUSY));
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_syntax_error_is_not_connectivity() {
        let err = Error::from(sqlite_failure(rusqlite::ffi::SQLITE_ERROR));
        assert!(!err.is_connectivity());
        assert!(!Error::InvalidData("bad".to_string()).is_connectivity());
    }

    #[test]
    fn test_pool_closed_is_connectivity() {
        assert!(Error::PoolClosed.is_connectivity());
    }
}
