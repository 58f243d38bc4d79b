use std::path::PathBuf;

/// Everything the summary table reports about one training run.
#[derive(Debug)]
pub struct RunResult {
    pub variant: String,
    pub output: PathBuf,
    pub model_path: Option<PathBuf>,
    pub train_rows_read: usize,
    pub train_rows_modeled: usize,
    pub train_rows_dropped: usize,
    pub test_rows_read: usize,
    pub open_rows: usize,
    pub closed_rows: usize,
    pub store_rows: usize,
    pub feature_columns: usize,
    pub output_rows: usize,
    /// In-sample RMSPE of the fit, on the raw sales scale.
    pub train_rmspe: f64,
}

#[derive(Debug)]
pub struct PredictResult {
    pub variant: String,
    pub output: PathBuf,
    pub test_rows_read: usize,
    pub open_rows: usize,
    pub closed_rows: usize,
    pub feature_columns: usize,
    pub output_rows: usize,
}

#[derive(Debug)]
pub struct EvaluateResult {
    pub rows: usize,
    pub rmspe: f64,
}
