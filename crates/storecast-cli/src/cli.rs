//! CLI argument definitions for the storecast pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use storecast_cli::pipeline::EstimatorKind;

#[derive(Parser)]
#[command(
    name = "storecast",
    version,
    about = "Retail daily-sales forecasting pipeline",
    long_about = "Forecast per-store daily sales from historical transactions.\n\n\
                  Reads the training, inference, and store CSV tables, engineers\n\
                  features, fits a regression model, and writes one prediction\n\
                  per inference row. Fitted models can be saved and replayed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Train on historical sales and write predictions for the inference table.
    Run(RunArgs),

    /// Predict with a previously saved model artifact.
    Predict(PredictArgs),

    /// Score a prediction file against known actuals (RMSPE).
    Evaluate(EvaluateArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Historical transactions CSV (includes the Sales target).
    #[arg(long = "train", value_name = "FILE")]
    pub train: PathBuf,

    /// Store metadata CSV.
    #[arg(long = "store", value_name = "FILE")]
    pub store: PathBuf,

    /// Inference-period transactions CSV (includes row Ids).
    #[arg(long = "test", value_name = "FILE")]
    pub test: PathBuf,

    /// Output path for the prediction CSV.
    #[arg(long = "output", value_name = "FILE")]
    pub output: PathBuf,

    /// Feature-engineering variant.
    #[arg(long = "variant", value_enum, default_value = "linear")]
    pub variant: VariantArg,

    /// Estimator family to fit.
    #[arg(long = "estimator", value_enum, default_value = "linear")]
    pub estimator: EstimatorKind,

    /// Save the fitted model as a JSON artifact.
    #[arg(long = "save-model", value_name = "FILE")]
    pub save_model: Option<PathBuf>,
}

#[derive(Parser)]
pub struct PredictArgs {
    /// Model artifact written by a previous `run --save-model`.
    #[arg(long = "model", value_name = "FILE")]
    pub model: PathBuf,

    /// Store metadata CSV.
    #[arg(long = "store", value_name = "FILE")]
    pub store: PathBuf,

    /// Inference-period transactions CSV (includes row Ids).
    #[arg(long = "test", value_name = "FILE")]
    pub test: PathBuf,

    /// Output path for the prediction CSV.
    #[arg(long = "output", value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct EvaluateArgs {
    /// Prediction CSV to score (Id,Sales).
    #[arg(long = "predictions", value_name = "FILE")]
    pub predictions: PathBuf,

    /// Actual sales CSV in the same Id,Sales layout.
    #[arg(long = "actuals", value_name = "FILE")]
    pub actuals: PathBuf,
}

/// Feature-engineering variant choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum VariantArg {
    /// One-hot features, raw target, calendar columns dropped.
    Linear,
    /// Shared label-index features, log target, calendar columns kept.
    Tree,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
