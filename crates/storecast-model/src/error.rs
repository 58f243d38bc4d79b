use thiserror::Error;

/// Errors raised by [`Frame`](crate::Frame) operations.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A column was added whose length does not match the frame height.
    #[error("column '{column}' has {actual} values, frame height is {expected}")]
    HeightMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A column with the same name already exists.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// A named column does not exist in the frame.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// A row mask does not match the frame height.
    #[error("row mask has {actual} entries, frame height is {expected}")]
    MaskMismatch { expected: usize, actual: usize },
}
