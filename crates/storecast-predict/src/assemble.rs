//! Prediction assembly.
//!
//! Re-attaches the closed-store rows the reconciler removed, inverts the
//! target transform on estimator outputs, and emits exactly one row per
//! original inference identifier, in source order.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use storecast_model::{PredictionRow, TargetTransform};

use crate::error::PredictError;

/// Closed stores predict a fixed zero; they were never modeled.
const CLOSED_STORE_SALES: f64 = 0.0;

/// Merge estimator outputs with the closed-store fallback.
///
/// `original_ids` is the full inference table id sequence in source
/// order; `open_ids` runs parallel to `predictions`. Every original id
/// must be covered exactly once, by a prediction or by the fallback.
pub fn assemble(
    original_ids: &[u64],
    open_ids: &[u64],
    predictions: &[f64],
    closed_ids: &[u64],
    target: TargetTransform,
) -> Result<Vec<PredictionRow>, PredictError> {
    if open_ids.len() != predictions.len() {
        return Err(PredictError::ShapeMismatch {
            expected: open_ids.len(),
            actual: predictions.len(),
        });
    }

    let mut predicted = BTreeMap::new();
    for (id, value) in open_ids.iter().zip(predictions) {
        if predicted.insert(*id, target.invert(*value)).is_some() {
            return Err(PredictError::DuplicateId(*id));
        }
    }
    let mut closed = BTreeSet::new();
    for id in closed_ids {
        if predicted.contains_key(id) || !closed.insert(*id) {
            return Err(PredictError::DuplicateId(*id));
        }
    }

    let mut seen = BTreeSet::new();
    let mut rows = Vec::with_capacity(original_ids.len());
    for id in original_ids {
        if !seen.insert(*id) {
            return Err(PredictError::DuplicateId(*id));
        }
        let sales = if let Some(value) = predicted.get(id) {
            *value
        } else if closed.contains(id) {
            CLOSED_STORE_SALES
        } else {
            return Err(PredictError::MissingPrediction(*id));
        };
        rows.push(PredictionRow { id: *id, sales });
    }
    debug!(
        rows = rows.len(),
        closed = closed.len(),
        "assembled prediction table"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_covers_every_original_id_once() {
        let rows = assemble(
            &[10, 11, 12],
            &[10, 12],
            &[100.0, 200.0],
            &[11],
            TargetTransform::Identity,
        )
        .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], PredictionRow { id: 10, sales: 100.0 });
        assert_eq!(rows[1], PredictionRow { id: 11, sales: 0.0 });
        assert_eq!(rows[2], PredictionRow { id: 12, sales: 200.0 });
    }

    #[test]
    fn log_variant_predictions_are_inverse_transformed() {
        let raw = 5000.0_f64;
        let transformed = TargetTransform::Log1p.apply(raw);
        let rows = assemble(&[1], &[1], &[transformed], &[], TargetTransform::Log1p).unwrap();
        assert!((rows[0].sales - raw).abs() < 1e-6);
    }

    #[test]
    fn closed_rows_are_exact_zero_not_inverse_transformed() {
        // invert(0) for the log transform would be exp(0)-1 == 0 too,
        // but the fallback must not pass through the transform at all.
        let rows = assemble(&[1], &[], &[], &[1], TargetTransform::Log1p).unwrap();
        assert_eq!(rows[0].sales, 0.0);
    }

    #[test]
    fn uncovered_id_is_an_error() {
        let err = assemble(&[1, 2], &[1], &[10.0], &[], TargetTransform::Identity).unwrap_err();
        assert!(matches!(err, PredictError::MissingPrediction(2)));
    }

    #[test]
    fn duplicate_original_id_is_an_error() {
        let err = assemble(&[1, 1], &[1], &[10.0], &[], TargetTransform::Identity).unwrap_err();
        assert!(matches!(err, PredictError::DuplicateId(1)));
    }

    #[test]
    fn id_in_both_partitions_is_an_error() {
        let err = assemble(&[1], &[1], &[10.0], &[1], TargetTransform::Identity).unwrap_err();
        assert!(matches!(err, PredictError::DuplicateId(1)));
    }

    #[test]
    fn misaligned_predictions_are_an_error() {
        let err = assemble(&[1], &[1], &[], &[], TargetTransform::Identity).unwrap_err();
        assert!(matches!(err, PredictError::ShapeMismatch { .. }));
    }
}
