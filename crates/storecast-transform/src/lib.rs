//! Feature engineering and dataset reconciliation.
//!
//! The stages in pipeline order:
//!
//! 1. [`normalize`]: canonicalize ambiguous raw representations.
//! 2. [`temporal`]: derive year / month / year-month from the date field.
//! 3. [`impute`]: domain-specific missing-value fills.
//! 4. [`reconcile`]: row filtering, store join, feature selection,
//!    categorical encoding (via [`encode`]), and train/inference column
//!    alignment.
//!
//! Every stage consumes its input and produces a new value; nothing is
//! mutated behind a shared reference. Any malformed input aborts the run
//! with a diagnostic naming the stage and the offending row or column.

pub mod encode;
pub mod error;
pub mod impute;
pub mod normalize;
pub mod reconcile;
pub mod temporal;

pub use encode::{LabelMap, apply_label_maps, fit_label_maps, one_hot_expand};
pub use error::TransformError;
pub use reconcile::{
    ReconcileInput, ReconciledDataset, TestFeatures, align_to_columns, featurize_test,
};
pub use temporal::{Calendar, derive_calendar};
