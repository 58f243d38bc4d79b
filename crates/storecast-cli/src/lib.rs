//! CLI library components for the storecast forecasting pipeline.

pub mod logging;
pub mod pipeline;
