//! Categorical encoding.
//!
//! Two strategies, selected per pipeline variant:
//!
//! - [`one_hot_expand`]: per-table indicator expansion. Each string
//!   column is replaced by one 0/1 column per distinct observed value,
//!   named `column_value`, in sorted value order. Train and inference
//!   tables are expanded independently and reconciled afterwards by
//!   column alignment.
//! - [`LabelMap`]: a shared label index fit on the union of values
//!   observed in both tables, applied identically to each. The map is an
//!   immutable artifact; encoding a value outside the fitted union is an
//!   [`UnknownCategory`](crate::TransformError::UnknownCategory) error
//!   (which the union fit makes unreachable within one run, but guards
//!   re-encoding against a persisted artifact).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use storecast_model::{Column, ColumnValues, Frame};

use crate::error::TransformError;

/// Replace every string column with sorted indicator columns.
///
/// Missing cells contribute no indicator (all-zero row). Numeric columns
/// pass through unchanged, keeping their relative order ahead of the
/// expansion block of each replaced column.
pub fn one_hot_expand(frame: Frame) -> Result<Frame, TransformError> {
    let height = frame.height();
    let mut out = Frame::with_height(height);
    for column in frame.columns() {
        match &column.values {
            ColumnValues::Float(_) => out.push(column.clone())?,
            ColumnValues::Str(cells) => {
                let mut observed: BTreeSet<&str> = BTreeSet::new();
                for cell in cells.iter().flatten() {
                    observed.insert(cell.as_str());
                }
                for value in observed {
                    let indicators = cells
                        .iter()
                        .map(|cell| Some(f64::from(u8::from(cell.as_deref() == Some(value)))))
                        .collect();
                    out.push(Column::float(format!("{}_{value}", column.name), indicators))?;
                }
            }
        }
    }
    Ok(out)
}

/// Immutable value-to-index mapping for one categorical column.
///
/// Indices are assigned in sorted distinct-value order, so the mapping is
/// reproducible run to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMap {
    values: Vec<String>,
}

impl LabelMap {
    /// Fit a map over an iterator of observed values.
    pub fn fit<'a, I>(observed: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = observed.into_iter().collect();
        Self {
            values: distinct.into_iter().map(String::from).collect(),
        }
    }

    /// Number of distinct values in the map.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the map holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of a value, if it was observed at fit time.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.binary_search_by(|v| v.as_str().cmp(value)).ok()
    }

    /// Encode one value, failing on anything outside the fitted union.
    pub fn encode(&self, column: &str, value: &str) -> Result<f64, TransformError> {
        self.index_of(value)
            .map(|idx| idx as f64)
            .ok_or_else(|| TransformError::UnknownCategory {
                column: column.to_string(),
                value: value.to_string(),
            })
    }
}

fn str_cells<'a>(frame: &'a Frame, name: &str) -> Option<&'a [Option<String>]> {
    match &frame.column(name)?.values {
        ColumnValues::Str(cells) => Some(cells),
        ColumnValues::Float(_) => None,
    }
}

/// Fit one label map per string column, over the union of both tables.
///
/// The two frames must agree on which columns are string-valued.
pub fn fit_label_maps(
    train: &Frame,
    test: &Frame,
) -> Result<BTreeMap<String, LabelMap>, TransformError> {
    let mut maps = BTreeMap::new();
    for column in train.columns() {
        let ColumnValues::Str(train_cells) = &column.values else {
            continue;
        };
        let test_cells = str_cells(test, &column.name).ok_or_else(|| {
            TransformError::SchemaMismatch(format!(
                "column '{}' is categorical in training but not in inference",
                column.name
            ))
        })?;
        let observed = train_cells
            .iter()
            .chain(test_cells)
            .flatten()
            .map(String::as_str);
        maps.insert(column.name.clone(), LabelMap::fit(observed));
    }
    Ok(maps)
}

/// Replace every string column with its label-index encoding.
///
/// Every string column must have a fitted map and no missing cells (the
/// catch-all fill runs before encoding in the variant that uses this
/// strategy).
pub fn apply_label_maps(
    frame: Frame,
    maps: &BTreeMap<String, LabelMap>,
) -> Result<Frame, TransformError> {
    let height = frame.height();
    let mut out = Frame::with_height(height);
    for column in frame.columns() {
        match &column.values {
            ColumnValues::Float(_) => out.push(column.clone())?,
            ColumnValues::Str(cells) => {
                let map = maps.get(&column.name).ok_or_else(|| {
                    TransformError::SchemaMismatch(format!(
                        "no label map fitted for column '{}'",
                        column.name
                    ))
                })?;
                let mut encoded = Vec::with_capacity(cells.len());
                for (row, cell) in cells.iter().enumerate() {
                    let value = cell.as_deref().ok_or_else(|| {
                        TransformError::MissingValue {
                            column: column.name.clone(),
                            row,
                        }
                    })?;
                    encoded.push(Some(map.encode(&column.name, value)?));
                }
                out.push(Column::float(column.name.clone(), encoded))?;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_frame(name: &str, values: Vec<&str>) -> Frame {
        let mut frame = Frame::with_height(values.len());
        frame.push(Column::str_dense(name, values)).unwrap();
        frame
    }

    #[test]
    fn one_hot_names_are_deterministic_and_sorted() {
        let frame = str_frame("holiday", vec!["b", "0", "a", "0"]);
        let expanded = one_hot_expand(frame).unwrap();
        assert_eq!(expanded.names(), vec!["holiday_0", "holiday_a", "holiday_b"]);
        assert_eq!(
            expanded.float_column("holiday_0").unwrap(),
            &[Some(0.0), Some(1.0), Some(0.0), Some(1.0)]
        );
        assert_eq!(
            expanded.float_column("holiday_b").unwrap(),
            &[Some(1.0), Some(0.0), Some(0.0), Some(0.0)]
        );
    }

    #[test]
    fn one_hot_missing_cell_has_no_indicator() {
        let mut frame = Frame::with_height(2);
        frame
            .push(Column::str("kind", vec![Some("a".to_string()), None]))
            .unwrap();
        let expanded = one_hot_expand(frame).unwrap();
        assert_eq!(expanded.names(), vec!["kind_a"]);
        assert_eq!(
            expanded.float_column("kind_a").unwrap(),
            &[Some(1.0), Some(0.0)]
        );
    }

    #[test]
    fn one_hot_preserves_numeric_columns() {
        let mut frame = Frame::with_height(2);
        frame
            .push(Column::float_dense("promo", vec![1.0, 0.0]))
            .unwrap();
        frame.push(Column::str_dense("kind", vec!["a", "b"])).unwrap();
        let expanded = one_hot_expand(frame).unwrap();
        assert_eq!(expanded.names(), vec!["promo", "kind_a", "kind_b"]);
    }

    #[test]
    fn label_map_fits_union_in_sorted_order() {
        let train = str_frame("kind", vec!["c", "a"]);
        let test = str_frame("kind", vec!["b", "a"]);
        let maps = fit_label_maps(&train, &test).unwrap();
        let map = &maps["kind"];
        assert_eq!(map.len(), 3);
        assert_eq!(map.index_of("a"), Some(0));
        assert_eq!(map.index_of("b"), Some(1));
        assert_eq!(map.index_of("c"), Some(2));
    }

    #[test]
    fn label_encoding_applies_same_map_to_both_tables() {
        let train = str_frame("kind", vec!["c", "a"]);
        let test = str_frame("kind", vec!["b"]);
        let maps = fit_label_maps(&train, &test).unwrap();
        let train_encoded = apply_label_maps(train, &maps).unwrap();
        let test_encoded = apply_label_maps(test, &maps).unwrap();
        assert_eq!(
            train_encoded.float_column("kind").unwrap(),
            &[Some(2.0), Some(0.0)]
        );
        assert_eq!(test_encoded.float_column("kind").unwrap(), &[Some(1.0)]);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let map = LabelMap::fit(["a", "b"]);
        let err = map.encode("kind", "z").unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnknownCategory { column, value }
                if column == "kind" && value == "z"
        ));
    }

    #[test]
    fn mismatched_column_typing_is_a_schema_error() {
        let train = str_frame("kind", vec!["a"]);
        let mut test = Frame::with_height(1);
        test.push(Column::float_dense("kind", vec![1.0])).unwrap();
        assert!(matches!(
            fit_label_maps(&train, &test),
            Err(TransformError::SchemaMismatch(_))
        ));
    }
}
