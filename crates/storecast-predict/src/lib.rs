//! Estimator seam, model artifacts, prediction assembly, and evaluation.
//!
//! The regression models themselves are black boxes behind the
//! [`Estimator`]/[`FittedModel`] traits: `fit` produces an immutable
//! trained value once, and every later `predict` call borrows it
//! read-only. Two simple estimators ship with the crate; anything that
//! consumes an `ndarray` design matrix can plug into the same seam.

pub mod artifact;
pub mod assemble;
pub mod error;
pub mod estimator;
pub mod matrix;
pub mod metrics;

pub use artifact::{FittedEstimator, ModelArtifact};
pub use assemble::assemble;
pub use error::PredictError;
pub use estimator::{Estimator, FittedModel, LinearModel, LinearRegression, MeanBaseline, MeanModel};
pub use matrix::design_matrix;
pub use metrics::rmspe;
