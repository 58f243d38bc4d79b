//! CSV ingestion for the storecast pipeline.
//!
//! Thin loading layer: each reader parses one of the three fixed-schema
//! sources into a vector of typed records. All cell-level cleanup beyond
//! trimming (holiday-code canonicalization, missing-value fills) belongs
//! to `storecast-transform`, not here.

mod error;
mod reader;

pub use error::IngestError;
pub use reader::{
    read_prediction_rows, read_store_records, read_test_records, read_train_records,
};
