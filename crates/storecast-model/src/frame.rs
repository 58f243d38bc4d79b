//! Column-typed in-memory table.
//!
//! [`Frame`] replaces the dynamic dataframe operations of the original
//! modeling scripts with an explicit, typed structure: every column is
//! either numeric or string-valued, missing cells are `None`, and every
//! mutation is an explicit consume-and-produce step. Downstream stages
//! (encoding, reconciliation) require all surviving columns to be numeric
//! and fully dense before a design matrix is built.

use crate::error::FrameError;

/// Cell storage for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Numeric column; `None` marks a missing cell.
    Float(Vec<Option<f64>>),
    /// String-valued (categorical or raw text) column.
    Str(Vec<Option<String>>),
}

impl ColumnValues {
    /// Number of cells in the column.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Str(v) => v.len(),
        }
    }

    /// True if the column holds no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for string-valued columns.
    pub fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }

    /// Count of missing (`None`) cells.
    pub fn missing_count(&self) -> usize {
        match self {
            Self::Float(v) => v.iter().filter(|c| c.is_none()).count(),
            Self::Str(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    /// Build a numeric column.
    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Float(values),
        }
    }

    /// Build a numeric column with no missing cells.
    pub fn float_dense(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::float(name, values.into_iter().map(Some).collect())
    }

    /// Build a string column.
    pub fn str(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Str(values),
        }
    }

    /// Build a string column with no missing cells.
    pub fn str_dense<S: Into<String>>(name: impl Into<String>, values: Vec<S>) -> Self {
        Self::str(name, values.into_iter().map(|v| Some(v.into())).collect())
    }
}

/// An ordered collection of equal-height columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    height: usize,
    columns: Vec<Column>,
}

impl Frame {
    /// Create an empty frame with a fixed height.
    pub fn with_height(height: usize) -> Self {
        Self {
            height,
            columns: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Append a column, enforcing height and name uniqueness.
    pub fn push(&mut self, column: Column) -> Result<(), FrameError> {
        if column.values.len() != self.height {
            return Err(FrameError::HeightMismatch {
                column: column.name,
                expected: self.height,
                actual: column.values.len(),
            });
        }
        if self.column(&column.name).is_some() {
            return Err(FrameError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric cells of a named column, or an error if absent.
    pub fn float_column(&self, name: &str) -> Result<&[Option<f64>], FrameError> {
        match self.column(name) {
            Some(Column {
                values: ColumnValues::Float(v),
                ..
            }) => Ok(v),
            _ => Err(FrameError::MissingColumn(name.to_string())),
        }
    }

    /// Remove a column by name and return it.
    pub fn take_column(&mut self, name: &str) -> Result<Column, FrameError> {
        let idx = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))?;
        Ok(self.columns.remove(idx))
    }

    /// Drop the named columns; names absent from the frame are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        self.columns.retain(|c| !names.contains(&c.name.as_str()));
    }

    /// Produce a frame containing exactly `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Frame, FrameError> {
        let mut out = Frame::with_height(self.height);
        for name in names {
            let column = self
                .column(name)
                .ok_or_else(|| FrameError::MissingColumn((*name).to_string()))?;
            out.push(column.clone())?;
        }
        Ok(out)
    }

    /// Keep only the rows where `mask` is true.
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Frame, FrameError> {
        if mask.len() != self.height {
            return Err(FrameError::MaskMismatch {
                expected: self.height,
                actual: mask.len(),
            });
        }
        let kept = mask.iter().filter(|m| **m).count();
        let mut out = Frame::with_height(kept);
        for column in &self.columns {
            let values = match &column.values {
                ColumnValues::Float(v) => ColumnValues::Float(
                    v.iter()
                        .zip(mask)
                        .filter(|(_, m)| **m)
                        .map(|(c, _)| *c)
                        .collect(),
                ),
                ColumnValues::Str(v) => ColumnValues::Str(
                    v.iter()
                        .zip(mask)
                        .filter(|(_, m)| **m)
                        .map(|(c, _)| c.clone())
                        .collect(),
                ),
            };
            out.push(Column {
                name: column.name.clone(),
                values,
            })?;
        }
        Ok(out)
    }

    /// Replace every missing cell with the given fill values.
    pub fn fill_missing(&mut self, float_fill: f64, str_fill: &str) {
        for column in &mut self.columns {
            match &mut column.values {
                ColumnValues::Float(v) => {
                    for cell in v.iter_mut() {
                        if cell.is_none() {
                            *cell = Some(float_fill);
                        }
                    }
                }
                ColumnValues::Str(v) => {
                    for cell in v.iter_mut() {
                        if cell.is_none() {
                            *cell = Some(str_fill.to_string());
                        }
                    }
                }
            }
        }
    }

    /// Total missing cells across all columns.
    pub fn missing_cells(&self) -> usize {
        self.columns.iter().map(|c| c.values.missing_count()).sum()
    }
}
