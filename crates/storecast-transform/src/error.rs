use storecast_model::FrameError;
use thiserror::Error;

/// Errors raised by the transform stages.
///
/// All of these are unrecoverable for the run: the pipeline surfaces them
/// immediately rather than skipping rows, since silent data corruption is
/// worse than a failed run.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A date field did not match the expected ISO format.
    #[error("unparseable date '{value}' at row {row}: {source}")]
    Parse {
        row: usize,
        value: String,
        source: chrono::ParseError,
    },

    /// A transaction row references a store with no metadata record.
    #[error("store {store_id} referenced at row {row} has no store record")]
    JoinIntegrity { row: usize, store_id: u32 },

    /// The store table holds more than one record for the same store.
    #[error("duplicate store record for store {0}")]
    DuplicateStore(u32),

    /// A cell required by the current stage is missing.
    #[error("missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    /// Train and inference column sets cannot be reconciled.
    #[error("train/inference column sets cannot be reconciled: {0}")]
    SchemaMismatch(String),

    /// A categorical value was not present in the fitted label index.
    #[error("unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    /// A frame-level invariant was violated.
    #[error(transparent)]
    Frame(#[from] FrameError),
}
