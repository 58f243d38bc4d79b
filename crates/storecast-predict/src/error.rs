use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the prediction-side stages.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Metric or assembly inputs have mismatched lengths.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A string column survived into the design-matrix build.
    #[error("column '{column}' is not numeric; categoricals must be encoded first")]
    NonNumericColumn { column: String },

    /// A missing cell survived into the design-matrix build.
    #[error("missing cell in column '{column}' at row {row}")]
    MissingCell { column: String, row: usize },

    /// The normal-equation system could not be solved.
    #[error("design matrix is singular beyond the ridge stabilizer")]
    SingularSystem,

    /// Prediction input width differs from the fitted feature count.
    #[error("feature count mismatch: model was fit on {expected} features, matrix has {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    /// Fit was called with no rows.
    #[error("cannot fit an estimator on an empty training set")]
    EmptyTrainingSet,

    /// An inference identifier received more than one prediction.
    #[error("duplicate prediction for id {0}")]
    DuplicateId(u64),

    /// An inference identifier received neither a prediction nor the
    /// closed-store fallback.
    #[error("no prediction or fallback for id {0}")]
    MissingPrediction(u64),

    /// The model artifact could not be read or written.
    #[error("model artifact i/o failed for {path}: {source}")]
    ArtifactIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The model artifact blob could not be decoded or encoded.
    #[error("model artifact format error for {path}: {source}")]
    ArtifactFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}
