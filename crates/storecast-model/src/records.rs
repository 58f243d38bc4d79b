//! Record types for the three raw tables.
//!
//! Field names map onto the source CSV headers via serde renames. Nullable
//! source cells are `Option` fields; the `csv` reader deserializes empty
//! cells to `None`.

use serde::{Deserialize, Serialize};

/// One row of the historical transactions table (training source).
///
/// One row per (store, date). Carries the target (`sales`) and the
/// `customers` count, both of which exist only on the training side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainRecord {
    #[serde(rename = "Store")]
    pub store_id: u32,
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: u8,
    /// Raw ISO calendar date string; parsed by the temporal deriver.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Sales")]
    pub sales: Option<f64>,
    #[serde(rename = "Customers")]
    pub customers: Option<u32>,
    #[serde(rename = "Open")]
    pub open: Option<u8>,
    #[serde(rename = "Promo")]
    pub promo: u8,
    /// Categorical holiday code. Raw sources encode "no holiday" as either
    /// the string "0" or a numeric 0; the schema normalizer canonicalizes.
    #[serde(rename = "StateHoliday")]
    pub state_holiday: String,
    #[serde(rename = "SchoolHoliday")]
    pub school_holiday: u8,
}

/// One row of the inference-period transactions table.
///
/// Carries a row identifier instead of the target; `open` is nullable in
/// this table and is filled by the imputer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestRecord {
    #[serde(rename = "Id")]
    pub id: u64,
    #[serde(rename = "Store")]
    pub store_id: u32,
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: u8,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: Option<u8>,
    #[serde(rename = "Promo")]
    pub promo: u8,
    #[serde(rename = "StateHoliday")]
    pub state_holiday: String,
    #[serde(rename = "SchoolHoliday")]
    pub school_holiday: u8,
}

/// Static store metadata, one row per store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreRecord {
    #[serde(rename = "Store")]
    pub store_id: u32,
    #[serde(rename = "StoreType")]
    pub store_type: String,
    #[serde(rename = "Assortment")]
    pub assortment: String,
    #[serde(rename = "CompetitionDistance")]
    pub competition_distance: Option<f64>,
    #[serde(rename = "CompetitionOpenSinceMonth")]
    pub competition_open_since_month: Option<u32>,
    #[serde(rename = "CompetitionOpenSinceYear")]
    pub competition_open_since_year: Option<u32>,
    #[serde(rename = "Promo2")]
    pub promo2: u8,
    #[serde(rename = "Promo2SinceWeek")]
    pub promo2_since_week: Option<u32>,
    #[serde(rename = "Promo2SinceYear")]
    pub promo2_since_year: Option<u32>,
    #[serde(rename = "PromoInterval")]
    pub promo_interval: Option<String>,
}

/// One row of the final prediction output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    #[serde(rename = "Id")]
    pub id: u64,
    #[serde(rename = "Sales")]
    pub sales: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_row_serializes_with_source_headers() {
        let row = PredictionRow { id: 7, sales: 0.0 };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Id":7,"Sales":0.0}"#);
    }
}
