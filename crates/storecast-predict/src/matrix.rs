//! Conversion from the reconciled [`Frame`] to an `ndarray` design matrix.

use ndarray::Array2;

use storecast_model::{ColumnValues, Frame};

use crate::error::PredictError;

/// Build a dense row-major design matrix from a reconciled frame.
///
/// Every column must be numeric and fully dense; the reconciler
/// guarantees this, and any violation here means a pipeline bug rather
/// than bad input data.
pub fn design_matrix(frame: &Frame) -> Result<Array2<f64>, PredictError> {
    let height = frame.height();
    let width = frame.width();
    let mut matrix = Array2::zeros((height, width));
    for (col_idx, column) in frame.columns().iter().enumerate() {
        let cells = match &column.values {
            ColumnValues::Float(cells) => cells,
            ColumnValues::Str(_) => {
                return Err(PredictError::NonNumericColumn {
                    column: column.name.clone(),
                });
            }
        };
        for (row, cell) in cells.iter().enumerate() {
            let value = cell.ok_or_else(|| PredictError::MissingCell {
                column: column.name.clone(),
                row,
            })?;
            matrix[[row, col_idx]] = value;
        }
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storecast_model::Column;

    #[test]
    fn builds_row_major_matrix() {
        let mut frame = Frame::with_height(2);
        frame
            .push(Column::float_dense("a", vec![1.0, 2.0]))
            .unwrap();
        frame
            .push(Column::float_dense("b", vec![3.0, 4.0]))
            .unwrap();
        let matrix = design_matrix(&frame).unwrap();
        assert_eq!(matrix.shape(), &[2, 2]);
        assert_eq!(matrix[[0, 1]], 3.0);
        assert_eq!(matrix[[1, 0]], 2.0);
    }

    #[test]
    fn rejects_string_columns() {
        let mut frame = Frame::with_height(1);
        frame.push(Column::str_dense("s", vec!["x"])).unwrap();
        assert!(matches!(
            design_matrix(&frame),
            Err(PredictError::NonNumericColumn { .. })
        ));
    }

    #[test]
    fn rejects_missing_cells() {
        let mut frame = Frame::with_height(2);
        frame
            .push(Column::float("a", vec![Some(1.0), None]))
            .unwrap();
        let err = design_matrix(&frame).unwrap_err();
        assert!(matches!(
            err,
            PredictError::MissingCell { row: 1, .. }
        ));
    }
}
