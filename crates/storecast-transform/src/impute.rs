//! Domain-specific missing-value imputation.
//!
//! Targeted rules, in order:
//!
//! - Transaction `open`: missing becomes 1 unless the row falls on a
//!   Sunday (day 7), which closes by default. Whether the fill applies to
//!   the training table as well as the inference table is a variant
//!   choice ([`OpenImputation`]).
//! - Store `competition_distance`: missing becomes 0, the "no known
//!   competitor" sentinel.
//! - Store `competition_open_since_year`/`_month`: missing becomes the
//!   far-past sentinel 1900-01, but only when the post-fill distance is
//!   nonzero. A store whose distance was originally missing therefore
//!   keeps its since-fields missing; the tree variant's catch-all fill
//!   later sets them to 0 and the linear variant drops the columns.
//!
//! The catch-all fill itself lives on
//! [`Frame::fill_missing`](storecast_model::Frame::fill_missing) and is
//! invoked by the reconciler for variants that request it.

use storecast_model::{OpenImputation, StoreRecord, TestRecord, TrainRecord};

/// Sentinel year meaning "competition has always existed".
pub const COMPETITION_SENTINEL_YEAR: u32 = 1900;
/// Sentinel month paired with [`COMPETITION_SENTINEL_YEAR`].
pub const COMPETITION_SENTINEL_MONTH: u32 = 1;

const SUNDAY: u8 = 7;

fn open_fill(day_of_week: u8) -> u8 {
    u8::from(day_of_week != SUNDAY)
}

/// Fill missing `open` cells in the inference table.
pub fn impute_test_open(mut records: Vec<TestRecord>) -> Vec<TestRecord> {
    for record in &mut records {
        if record.open.is_none() {
            record.open = Some(open_fill(record.day_of_week));
        }
    }
    records
}

/// Fill missing `open` cells in the training table.
pub fn impute_train_open(mut records: Vec<TrainRecord>) -> Vec<TrainRecord> {
    for record in &mut records {
        if record.open.is_none() {
            record.open = Some(open_fill(record.day_of_week));
        }
    }
    records
}

/// Apply the variant's `open` policy to both transaction tables.
pub fn apply_open_policy(
    policy: OpenImputation,
    train: Vec<TrainRecord>,
    test: Vec<TestRecord>,
) -> (Vec<TrainRecord>, Vec<TestRecord>) {
    let test = impute_test_open(test);
    let train = match policy {
        OpenImputation::InferenceOnly => train,
        OpenImputation::Both => impute_train_open(train),
    };
    (train, test)
}

/// Apply the competition fill rules to the store table.
pub fn impute_stores(mut records: Vec<StoreRecord>) -> Vec<StoreRecord> {
    for record in &mut records {
        if record.competition_distance.is_none() {
            record.competition_distance = Some(0.0);
        }
        // The since-field condition reads the post-fill distance, so an
        // originally-missing distance (now 0) never triggers it.
        let has_competition = record.competition_distance != Some(0.0);
        if has_competition && record.competition_open_since_year.is_none() {
            record.competition_open_since_year = Some(COMPETITION_SENTINEL_YEAR);
        }
        if has_competition && record.competition_open_since_month.is_none() {
            record.competition_open_since_month = Some(COMPETITION_SENTINEL_MONTH);
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_record(day_of_week: u8, open: Option<u8>) -> TestRecord {
        TestRecord {
            id: 1,
            store_id: 1,
            day_of_week,
            date: "2015-09-17".to_string(),
            open,
            promo: 0,
            state_holiday: "0".to_string(),
            school_holiday: 0,
        }
    }

    fn store_record(
        distance: Option<f64>,
        since_month: Option<u32>,
        since_year: Option<u32>,
    ) -> StoreRecord {
        StoreRecord {
            store_id: 1,
            store_type: "a".to_string(),
            assortment: "a".to_string(),
            competition_distance: distance,
            competition_open_since_month: since_month,
            competition_open_since_year: since_year,
            promo2: 0,
            promo2_since_week: None,
            promo2_since_year: None,
            promo_interval: None,
        }
    }

    #[test]
    fn missing_open_fills_by_weekday() {
        let records = impute_test_open(vec![test_record(4, None), test_record(7, None)]);
        assert_eq!(records[0].open, Some(1));
        assert_eq!(records[1].open, Some(0));
    }

    #[test]
    fn present_open_is_untouched() {
        let records = impute_test_open(vec![test_record(4, Some(0))]);
        assert_eq!(records[0].open, Some(0));
    }

    #[test]
    fn inference_only_policy_leaves_training_open_missing() {
        let train = vec![TrainRecord {
            store_id: 1,
            day_of_week: 3,
            date: "2015-07-01".to_string(),
            sales: Some(100.0),
            customers: Some(10),
            open: None,
            promo: 0,
            state_holiday: "0".to_string(),
            school_holiday: 0,
        }];
        let (train_kept, _) =
            apply_open_policy(OpenImputation::InferenceOnly, train.clone(), Vec::new());
        assert_eq!(train_kept[0].open, None);
        let (train_filled, _) = apply_open_policy(OpenImputation::Both, train, Vec::new());
        assert_eq!(train_filled[0].open, Some(1));
    }

    #[test]
    fn missing_distance_becomes_zero_and_blocks_since_fill() {
        let records = impute_stores(vec![store_record(None, None, None)]);
        assert_eq!(records[0].competition_distance, Some(0.0));
        // Distance was originally missing, so the since-fields stay
        // missing for the catch-all (or a column drop) to deal with.
        assert_eq!(records[0].competition_open_since_year, None);
        assert_eq!(records[0].competition_open_since_month, None);
    }

    #[test]
    fn present_distance_with_missing_since_gets_sentinel() {
        let records = impute_stores(vec![store_record(Some(250.0), None, None)]);
        assert_eq!(
            records[0].competition_open_since_year,
            Some(COMPETITION_SENTINEL_YEAR)
        );
        assert_eq!(
            records[0].competition_open_since_month,
            Some(COMPETITION_SENTINEL_MONTH)
        );
    }

    #[test]
    fn present_since_fields_are_untouched() {
        let records = impute_stores(vec![store_record(Some(250.0), Some(9), Some(2008))]);
        assert_eq!(records[0].competition_open_since_year, Some(2008));
        assert_eq!(records[0].competition_open_since_month, Some(9));
    }
}
