//! Typed data model for the storecast sales forecasting pipeline.
//!
//! This crate defines the record types read from the raw tables, the
//! column-typed [`Frame`] that the feature-engineering stages operate on,
//! and the [`PipelineVariant`] configuration describing the two shipped
//! pipeline flavors.

pub mod error;
pub mod frame;
pub mod records;
pub mod variant;

pub use error::FrameError;
pub use frame::{Column, ColumnValues, Frame};
pub use records::{PredictionRow, StoreRecord, TestRecord, TrainRecord};
pub use variant::{
    EncodingStrategy, FeaturePolicy, OpenImputation, PipelineVariant, TargetTransform,
};
