//! Forecasting pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Read the training, inference, and store CSV tables
//! 2. **Prepare**: Normalize, derive calendar features, impute, reconcile
//! 3. **Fit**: Build the design matrix and train the estimator
//! 4. **Predict**: Score the inference matrix
//! 5. **Assemble**: Re-attach closed-store rows and order the output
//!
//! Each stage takes the output of the previous stage and returns typed
//! results. A training run walks all five; a prediction run against a
//! saved artifact replays stages 1-2 for the inference table only and
//! reuses the persisted fit.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use tracing::{info, info_span};

use storecast_ingest::{read_store_records, read_test_records, read_train_records};
use storecast_model::{EncodingStrategy, Frame, PipelineVariant};
use storecast_predict::{
    Estimator, FittedEstimator, FittedModel, LinearRegression, MeanBaseline, ModelArtifact,
    design_matrix,
};
use storecast_transform::{
    ReconcileInput, ReconciledDataset, align_to_columns, apply_label_maps, derive_calendar,
    featurize_test, one_hot_expand,
};
use storecast_transform::impute::{apply_open_policy, impute_stores, impute_test_open};
use storecast_transform::normalize::{normalize_test, normalize_train};

/// Estimator family selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EstimatorKind {
    /// Ridge-stabilized least squares.
    Linear,
    /// Training-set mean baseline.
    Mean,
}

// ============================================================================
// Stage 1-2: Ingest and prepare
// ============================================================================

/// Row counts observed while reading the source tables.
#[derive(Debug, Clone, Copy)]
pub struct SourceCounts {
    pub train_rows: usize,
    pub test_rows: usize,
    pub store_rows: usize,
}

/// Result of the ingest and prepare stages for a training run.
#[derive(Debug)]
pub struct PreparedData {
    pub dataset: ReconciledDataset,
    /// Every inference row id in source order, including closed stores.
    pub original_ids: Vec<u64>,
    pub counts: SourceCounts,
}

/// Read and reconcile all three tables for one pipeline variant.
pub fn prepare(
    train_path: &Path,
    store_path: &Path,
    test_path: &Path,
    variant: &PipelineVariant,
) -> Result<PreparedData> {
    let span = info_span!("prepare", variant = %variant.name);
    let _guard = span.enter();

    let train = read_train_records(train_path).context("read training table")?;
    let test = read_test_records(test_path).context("read inference table")?;
    let stores = read_store_records(store_path).context("read store table")?;
    let counts = SourceCounts {
        train_rows: train.len(),
        test_rows: test.len(),
        store_rows: stores.len(),
    };

    let train = normalize_train(train);
    let test = normalize_test(test);
    let train_calendar = derive_calendar(train.iter().map(|r| r.date.as_str()))
        .context("derive training calendar")?;
    let test_calendar = derive_calendar(test.iter().map(|r| r.date.as_str()))
        .context("derive inference calendar")?;

    let (train, test) = apply_open_policy(variant.open_imputation, train, test);
    let stores = impute_stores(stores);
    let original_ids: Vec<u64> = test.iter().map(|r| r.id).collect();

    let dataset = storecast_transform::reconcile::reconcile(
        &ReconcileInput {
            train: &train,
            train_calendar: &train_calendar,
            test: &test,
            test_calendar: &test_calendar,
            stores: &stores,
        },
        variant,
    )
    .context("reconcile modeling matrices")?;

    Ok(PreparedData {
        dataset,
        original_ids,
        counts,
    })
}

// ============================================================================
// Stage 3-4: Fit and predict
// ============================================================================

/// Fit the selected estimator on the reconciled training matrix.
///
/// The target vector is expected already transformed to the variant's
/// fitting scale.
pub fn fit(kind: EstimatorKind, x_train: &Frame, y_train: &[f64]) -> Result<FittedEstimator> {
    let span = info_span!("fit");
    let _guard = span.enter();
    let x = design_matrix(x_train).context("build training design matrix")?;
    let fitted = match kind {
        EstimatorKind::Linear => FittedEstimator::Linear(
            LinearRegression::default()
                .fit(x.view(), ndarray::ArrayView1::from(y_train))
                .context("fit linear model")?,
        ),
        EstimatorKind::Mean => FittedEstimator::Mean(
            MeanBaseline
                .fit(x.view(), ndarray::ArrayView1::from(y_train))
                .context("fit mean baseline")?,
        ),
    };
    info!(rows = x_train.height(), columns = x_train.width(), "fitted estimator");
    Ok(fitted)
}

/// Score one reconciled frame with a fitted model.
///
/// Outputs stay on the fitting scale; inversion happens at assembly.
pub fn predict(model: &FittedEstimator, frame: &Frame) -> Result<Vec<f64>> {
    let x = design_matrix(frame).context("build inference design matrix")?;
    let predictions = model.predict(x.view()).context("score inference matrix")?;
    Ok(predictions.to_vec())
}

// ============================================================================
// Inference replay against a saved artifact
// ============================================================================

/// Inference matrix rebuilt to a persisted artifact's column schema.
#[derive(Debug)]
pub struct InferenceData {
    pub x_test: Frame,
    /// Open-store row ids parallel to `x_test` rows.
    pub ids: Vec<u64>,
    pub closed_ids: Vec<u64>,
    /// Every inference row id in source order.
    pub original_ids: Vec<u64>,
    pub counts: SourceCounts,
}

/// Rebuild the inference matrix for a saved model.
///
/// The featurization replays the artifact's variant configuration; the
/// resulting columns must land on exactly the schema the model was fit
/// on, or the run aborts.
pub fn prepare_inference(
    artifact: &ModelArtifact,
    store_path: &Path,
    test_path: &Path,
) -> Result<InferenceData> {
    let span = info_span!("prepare_inference", variant = %artifact.variant.name);
    let _guard = span.enter();

    let test = read_test_records(test_path).context("read inference table")?;
    let stores = read_store_records(store_path).context("read store table")?;
    let counts = SourceCounts {
        train_rows: 0,
        test_rows: test.len(),
        store_rows: stores.len(),
    };

    let test = normalize_test(test);
    let calendar = derive_calendar(test.iter().map(|r| r.date.as_str()))
        .context("derive inference calendar")?;
    let test = impute_test_open(test);
    let stores = impute_stores(stores);
    let original_ids: Vec<u64> = test.iter().map(|r| r.id).collect();

    let features = featurize_test(&test, &calendar, &stores, &artifact.variant)
        .context("featurize inference table")?;

    let x_test = match artifact.variant.encoding {
        EncodingStrategy::OneHot => {
            let expanded = one_hot_expand(features.frame).context("one-hot expand")?;
            align_to_columns(&artifact.columns, &expanded)
                .context("align to trained column schema")?
        }
        EncodingStrategy::SharedLabel => {
            let Some(maps) = &artifact.label_maps else {
                bail!("artifact uses shared-label encoding but carries no label maps");
            };
            let encoded =
                apply_label_maps(features.frame, maps).context("apply persisted label maps")?;
            let names: Vec<String> = encoded.names().iter().map(|n| (*n).to_string()).collect();
            if names != artifact.columns {
                bail!(
                    "inference columns {names:?} do not match trained schema {:?}",
                    artifact.columns
                );
            }
            encoded
        }
    };

    info!(
        open_rows = features.ids.len(),
        closed_rows = features.closed_ids.len(),
        columns = x_test.width(),
        "rebuilt inference matrix"
    );
    Ok(InferenceData {
        x_test,
        ids: features.ids,
        closed_ids: features.closed_ids,
        original_ids,
        counts,
    })
}
