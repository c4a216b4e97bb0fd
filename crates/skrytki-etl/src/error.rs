//! Error types for the ETL pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an ETL run. There is no per-row recovery: any of
/// these fails the whole run before anything is loaded.
#[derive(Debug, Error)]
pub enum EtlError {
    /// A CSV or TSV file could not be read or written.
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The source extract lacks a column the pipeline needs.
    #[error("missing column {column} in {}", path.display())]
    MissingColumn { column: &'static str, path: PathBuf },

    /// A file could not be opened or created.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A staging file holds a value the loader cannot interpret.
    #[error("invalid staging data in {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    /// The workflow failed or did not finish.
    #[error("pipeline error: {0}")]
    Stage(String),

    /// An error propagated from the core storage layer.
    #[error("database error: {0}")]
    Database(#[from] skrytki_core::Error),
}

impl EtlError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for ETL results.
pub type EtlResult<T> = std::result::Result<T, EtlError>;
