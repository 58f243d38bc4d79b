//! Root Mean Squared Percentage Error.

use crate::error::PredictError;

/// RMSPE over parallel true/predicted sequences.
///
/// Elements with a zero true value contribute 0 to the sum but still
/// count in the mean denominator, matching the reference definition
/// exactly: `sqrt(1/n * Σ ((y_true - y_pred) / y_true)²)` with the
/// per-element factor forced to 0 where `y_true == 0`.
pub fn rmspe(y_true: &[f64], y_pred: &[f64]) -> Result<f64, PredictError> {
    if y_true.len() != y_pred.len() {
        return Err(PredictError::ShapeMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Ok(0.0);
    }
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| {
            if *t == 0.0 {
                0.0
            } else {
                let relative = (t - p) / t;
                relative * relative
            }
        })
        .sum();
    Ok((sum / y_true.len() as f64).sqrt())
}
