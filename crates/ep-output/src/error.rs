//! Error types for ep-output.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when writing status history or agent snapshots.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Create `dir` (and parents) if it does not exist yet.
pub(crate) fn ensure_dir(dir: &std::path::Path) -> OutputResult<()> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}
