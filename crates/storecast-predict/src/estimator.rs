//! Black-box estimator seam and the two shipped implementations.
//!
//! The pipeline only requires `fit(X, y) -> model` and
//! `predict(X) -> y`. A ridge-stabilized least-squares model covers the
//! linear variant; the mean baseline exists for smoke tests and as a
//! sanity floor. Gradient-boosted or any other external regressor plugs
//! in behind the same traits.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PredictError;

/// An unfitted estimator: configuration plus a `fit` entry point.
pub trait Estimator {
    /// The immutable trained artifact produced by `fit`.
    type Fitted: FittedModel;

    /// Fit on a design matrix and target vector.
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>)
    -> Result<Self::Fitted, PredictError>;
}

/// A trained model; prediction never mutates it.
pub trait FittedModel {
    /// Predict one value per row of `x`.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, PredictError>;
}

/// Least-squares linear regression via the normal equations.
///
/// A small ridge penalty (excluding the intercept) keeps the system
/// solvable when one-hot blocks are collinear with the intercept.
#[derive(Debug, Clone, Copy)]
pub struct LinearRegression {
    ridge: f64,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self { ridge: 1e-6 }
    }
}

impl LinearRegression {
    /// Override the ridge stabilizer.
    pub fn with_ridge(ridge: f64) -> Self {
        Self { ridge }
    }
}

impl Estimator for LinearRegression {
    type Fitted = LinearModel;

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Self::Fitted, PredictError> {
        let rows = x.nrows();
        let features = x.ncols();
        if rows == 0 {
            return Err(PredictError::EmptyTrainingSet);
        }
        if rows != y.len() {
            return Err(PredictError::ShapeMismatch {
                expected: rows,
                actual: y.len(),
            });
        }

        // Normal equations over the bias-augmented design: G w = b with
        // G = Xᵀ X and b = Xᵀ y, accumulated row by row.
        let dim = features + 1;
        let mut gram = Array2::<f64>::zeros((dim, dim));
        let mut rhs = Array1::<f64>::zeros(dim);
        let mut augmented = vec![0.0; dim];
        for (row_idx, row) in x.outer_iter().enumerate() {
            augmented[0] = 1.0;
            for (j, value) in row.iter().enumerate() {
                augmented[j + 1] = *value;
            }
            for i in 0..dim {
                for j in i..dim {
                    gram[[i, j]] += augmented[i] * augmented[j];
                }
                rhs[i] += augmented[i] * y[row_idx];
            }
        }
        for i in 0..dim {
            for j in 0..i {
                gram[[i, j]] = gram[[j, i]];
            }
        }
        for j in 1..dim {
            gram[[j, j]] += self.ridge;
        }

        let solution = solve(gram, rhs)?;
        debug!(rows, features, "fit linear model");
        Ok(LinearModel {
            intercept: solution[0],
            coefficients: solution.iter().skip(1).copied().collect(),
        })
    }
}

/// Trained linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl FittedModel for LinearModel {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, PredictError> {
        if x.ncols() != self.coefficients.len() {
            return Err(PredictError::FeatureMismatch {
                expected: self.coefficients.len(),
                actual: x.ncols(),
            });
        }
        Ok(x.outer_iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(v, c)| v * c)
                        .sum::<f64>()
            })
            .collect())
    }
}

/// Baseline estimator predicting the training-set mean everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanBaseline;

/// Trained mean baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanModel {
    pub mean: f64,
}

impl Estimator for MeanBaseline {
    type Fitted = MeanModel;

    fn fit(
        &self,
        _x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Self::Fitted, PredictError> {
        if y.is_empty() {
            return Err(PredictError::EmptyTrainingSet);
        }
        Ok(MeanModel {
            mean: y.sum() / y.len() as f64,
        })
    }
}

impl FittedModel for MeanModel {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, PredictError> {
        Ok(Array1::from_elem(x.nrows(), self.mean))
    }
}

/// Solve `a w = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>, PredictError> {
    let n = b.len();
    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if a[[row, col]].abs() > a[[pivot, col]].abs() {
                pivot = row;
            }
        }
        if a[[pivot, col]].abs() < 1e-12 {
            return Err(PredictError::SingularSystem);
        }
        if pivot != col {
            for j in 0..n {
                let tmp = a[[col, j]];
                a[[col, j]] = a[[pivot, j]];
                a[[pivot, j]] = tmp;
            }
            b.swap(col, pivot);
        }
        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                a[[row, j]] -= factor * a[[col, j]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut solution = Array1::zeros(n);
    for row in (0..n).rev() {
        let mut acc = b[row];
        for j in (row + 1)..n {
            acc -= a[[row, j]] * solution[j];
        }
        solution[row] = acc / a[[row, row]];
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn linear_model_recovers_exact_linear_function() {
        // y = 3 + 2a - b over a well-conditioned design.
        let x = array![
            [1.0, 0.0],
            [2.0, 1.0],
            [3.0, 5.0],
            [4.0, 2.0],
            [0.5, 7.0],
        ];
        let y = x.map_axis(ndarray::Axis(1), |row| 3.0 + 2.0 * row[0] - row[1]);
        let model = LinearRegression::default().fit(x.view(), y.view()).unwrap();
        assert!((model.intercept - 3.0).abs() < 1e-3);
        assert!((model.coefficients[0] - 2.0).abs() < 1e-3);
        assert!((model.coefficients[1] + 1.0).abs() < 1e-3);

        let predicted = model.predict(x.view()).unwrap();
        for (p, t) in predicted.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-3);
        }
    }

    #[test]
    fn collinear_one_hot_block_still_fits() {
        // Two indicator columns summing to one are collinear with the
        // intercept; the ridge stabilizer must keep the solve alive.
        let x = array![
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
            [0.0, 1.0],
        ];
        let y = array![10.0, 20.0, 10.0, 20.0];
        let model = LinearRegression::default().fit(x.view(), y.view()).unwrap();
        let predicted = model.predict(x.view()).unwrap();
        for (p, t) in predicted.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-2, "predicted {p}, wanted {t}");
        }
    }

    #[test]
    fn empty_training_set_is_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            LinearRegression::default().fit(x.view(), y.view()),
            Err(PredictError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn feature_mismatch_is_rejected_at_predict() {
        let model = LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0, 2.0],
        };
        let x = Array2::<f64>::zeros((1, 3));
        assert!(matches!(
            model.predict(x.view()),
            Err(PredictError::FeatureMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn mean_baseline_predicts_training_mean() {
        let x = Array2::<f64>::zeros((3, 1));
        let y = array![1.0, 2.0, 6.0];
        let model = MeanBaseline.fit(x.view(), y.view()).unwrap();
        assert!((model.mean - 3.0).abs() < 1e-12);
        let predicted = model.predict(Array2::<f64>::zeros((2, 1)).view()).unwrap();
        assert_eq!(predicted.len(), 2);
        assert!((predicted[0] - 3.0).abs() < 1e-12);
    }
}
