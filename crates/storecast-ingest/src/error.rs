use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading source CSV files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be opened or read.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: csv::Error,
    },

    /// A record could not be parsed into the expected schema.
    #[error("malformed record in {path} at line {line}: {source}")]
    Record {
        path: PathBuf,
        line: u64,
        source: csv::Error,
    },
}
