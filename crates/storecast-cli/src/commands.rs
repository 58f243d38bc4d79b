use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use storecast_cli::pipeline::{fit, predict, prepare, prepare_inference};
use storecast_ingest::read_prediction_rows;
use storecast_model::PipelineVariant;
use storecast_output::write_predictions;
use storecast_predict::{ModelArtifact, assemble, rmspe};

use crate::cli::{EvaluateArgs, PredictArgs, RunArgs, VariantArg};
use crate::types::{EvaluateResult, PredictResult, RunResult};

fn variant_from_arg(arg: VariantArg) -> PipelineVariant {
    match arg {
        VariantArg::Linear => PipelineVariant::linear(),
        VariantArg::Tree => PipelineVariant::tree(),
    }
}

pub fn run_run(args: &RunArgs) -> Result<RunResult> {
    let variant = variant_from_arg(args.variant);
    let prepared = prepare(&args.train, &args.store, &args.test, &variant)?;
    let dataset = &prepared.dataset;

    let y_fit = variant.target.apply_all(&dataset.y_train);
    let model = fit(args.estimator, &dataset.x_train, &y_fit)?;

    let in_sample = predict(&model, &dataset.x_train)?;
    let in_sample: Vec<f64> = in_sample.iter().map(|v| variant.target.invert(*v)).collect();
    let train_rmspe =
        rmspe(&dataset.y_train, &in_sample).context("score in-sample predictions")?;

    let predictions = predict(&model, &dataset.x_test)?;
    let rows = assemble(
        &prepared.original_ids,
        &dataset.test_ids,
        &predictions,
        &dataset.closed_ids,
        variant.target,
    )
    .context("assemble prediction table")?;
    write_predictions(&args.output, &rows).context("write prediction table")?;

    if let Some(path) = &args.save_model {
        let artifact = ModelArtifact {
            variant: variant.clone(),
            columns: dataset.columns.clone(),
            label_maps: dataset.label_maps.clone(),
            model,
        };
        artifact.save(path)?;
    }

    info!(variant = %variant.name, train_rmspe, "training run complete");
    Ok(RunResult {
        variant: variant.name,
        output: args.output.clone(),
        model_path: args.save_model.clone(),
        train_rows_read: prepared.counts.train_rows,
        train_rows_modeled: dataset.x_train.height(),
        train_rows_dropped: dataset.train_rows_dropped,
        test_rows_read: prepared.counts.test_rows,
        open_rows: dataset.test_ids.len(),
        closed_rows: dataset.closed_ids.len(),
        store_rows: prepared.counts.store_rows,
        feature_columns: dataset.columns.len(),
        output_rows: rows.len(),
        train_rmspe,
    })
}

pub fn run_predict(args: &PredictArgs) -> Result<PredictResult> {
    let artifact = ModelArtifact::load(&args.model)?;
    let inference = prepare_inference(&artifact, &args.store, &args.test)?;

    let predictions = predict(&artifact.model, &inference.x_test)?;
    let rows = assemble(
        &inference.original_ids,
        &inference.ids,
        &predictions,
        &inference.closed_ids,
        artifact.variant.target,
    )
    .context("assemble prediction table")?;
    write_predictions(&args.output, &rows).context("write prediction table")?;

    Ok(PredictResult {
        variant: artifact.variant.name,
        output: args.output.clone(),
        test_rows_read: inference.counts.test_rows,
        open_rows: inference.ids.len(),
        closed_rows: inference.closed_ids.len(),
        feature_columns: inference.x_test.width(),
        output_rows: rows.len(),
    })
}

pub fn run_evaluate(args: &EvaluateArgs) -> Result<EvaluateResult> {
    let predicted = read_prediction_rows(&args.predictions).context("read prediction file")?;
    let actuals = read_prediction_rows(&args.actuals).context("read actuals file")?;

    let mut actual_by_id = BTreeMap::new();
    for row in &actuals {
        if actual_by_id.insert(row.id, row.sales).is_some() {
            return Err(anyhow!("duplicate id {} in actuals file", row.id));
        }
    }

    let mut y_true = Vec::with_capacity(predicted.len());
    let mut y_pred = Vec::with_capacity(predicted.len());
    for row in &predicted {
        let actual = actual_by_id
            .get(&row.id)
            .ok_or_else(|| anyhow!("no actual value for predicted id {}", row.id))?;
        y_true.push(*actual);
        y_pred.push(row.sales);
    }

    let score = rmspe(&y_true, &y_pred).context("compute RMSPE")?;
    Ok(EvaluateResult {
        rows: predicted.len(),
        rmspe: score,
    })
}
