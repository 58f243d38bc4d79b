//! Persisted model artifact.
//!
//! One run's immutable fit products travel together: the variant
//! configuration, the reconciled column schema, any fitted label maps,
//! and the trained model. The blob is written once by a training run and
//! consumed read-only by later prediction runs; a prediction run must
//! reproduce the exact column schema or fail, never silently realign.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};
use tracing::info;

use storecast_model::PipelineVariant;
use storecast_transform::LabelMap;

use crate::error::PredictError;
use crate::estimator::{FittedModel, LinearModel, MeanModel};

/// A trained model of any shipped family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedEstimator {
    Linear(LinearModel),
    Mean(MeanModel),
}

impl FittedModel for FittedEstimator {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, PredictError> {
        match self {
            Self::Linear(model) => model.predict(x),
            Self::Mean(model) => model.predict(x),
        }
    }
}

/// Everything a later run needs to predict with a persisted fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub variant: PipelineVariant,
    /// Reconciled column schema the model was fit on, in order.
    pub columns: Vec<String>,
    /// Label-index maps (shared-label variant only).
    pub label_maps: Option<BTreeMap<String, LabelMap>>,
    pub model: FittedEstimator,
}

impl ModelArtifact {
    /// Write the artifact as a JSON blob.
    pub fn save(&self, path: &Path) -> Result<(), PredictError> {
        let blob = serde_json::to_vec_pretty(self).map_err(|source| {
            PredictError::ArtifactFormat {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, blob).map_err(|source| PredictError::ArtifactIo {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), variant = %self.variant.name, "saved model artifact");
        Ok(())
    }

    /// Read an artifact back from disk.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let blob = fs::read(path).map_err(|source| PredictError::ArtifactIo {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: Self =
            serde_json::from_slice(&blob).map_err(|source| PredictError::ArtifactFormat {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), variant = %artifact.variant.name, "loaded model artifact");
        Ok(artifact)
    }
}
