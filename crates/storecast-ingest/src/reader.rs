//! Typed CSV readers for the three source tables.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use tracing::debug;

use storecast_model::{PredictionRow, StoreRecord, TestRecord, TrainRecord};

use crate::error::IngestError;

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let mut records = Vec::new();
    for result in reader.deserialize::<T>() {
        let record = result.map_err(|source| IngestError::Record {
            path: path.to_path_buf(),
            line: source.position().map_or(0, csv::Position::line),
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Read the historical transactions table (includes the target).
pub fn read_train_records(path: &Path) -> Result<Vec<TrainRecord>, IngestError> {
    let records = read_records(path)?;
    debug!(path = %path.display(), rows = records.len(), "read training table");
    Ok(records)
}

/// Read the inference-period transactions table (includes row ids).
pub fn read_test_records(path: &Path) -> Result<Vec<TestRecord>, IngestError> {
    let records = read_records(path)?;
    debug!(path = %path.display(), rows = records.len(), "read inference table");
    Ok(records)
}

/// Read the store metadata table.
pub fn read_store_records(path: &Path) -> Result<Vec<StoreRecord>, IngestError> {
    let records = read_records(path)?;
    debug!(path = %path.display(), rows = records.len(), "read store table");
    Ok(records)
}

/// Read a prediction output file back in (used by the evaluate command).
pub fn read_prediction_rows(path: &Path) -> Result<Vec<PredictionRow>, IngestError> {
    read_records(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_training_rows_with_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "train.csv",
            "Store,DayOfWeek,Date,Sales,Customers,Open,Promo,StateHoliday,SchoolHoliday\n\
             1,5,2015-07-31,5263,555,1,1,0,1\n",
        );
        let records = read_train_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].store_id, 1);
        assert_eq!(records[0].sales, Some(5263.0));
        assert_eq!(records[0].state_holiday, "0");
    }

    #[test]
    fn empty_open_cell_becomes_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "test.csv",
            "Id,Store,DayOfWeek,Date,Open,Promo,StateHoliday,SchoolHoliday\n\
             1,1,4,2015-09-17,,1,0,0\n\
             2,1,7,2015-09-20,0,0,0,0\n",
        );
        let records = read_test_records(&path).unwrap();
        assert_eq!(records[0].open, None);
        assert_eq!(records[1].open, Some(0));
    }

    #[test]
    fn missing_competition_fields_become_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "store.csv",
            "Store,StoreType,Assortment,CompetitionDistance,CompetitionOpenSinceMonth,\
             CompetitionOpenSinceYear,Promo2,Promo2SinceWeek,Promo2SinceYear,PromoInterval\n\
             1,c,a,1270,9,2008,0,,,\n\
             2,a,a,,,,1,13,2010,\"Jan,Apr,Jul,Oct\"\n",
        );
        let records = read_store_records(&path).unwrap();
        assert_eq!(records[0].competition_distance, Some(1270.0));
        assert_eq!(records[1].competition_distance, None);
        assert_eq!(records[1].competition_open_since_year, None);
        assert_eq!(records[1].promo_interval.as_deref(), Some("Jan,Apr,Jul,Oct"));
    }

    #[test]
    fn malformed_row_names_file_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "train.csv",
            "Store,DayOfWeek,Date,Sales,Customers,Open,Promo,StateHoliday,SchoolHoliday\n\
             1,5,2015-07-31,5263,555,1,1,0,1\n\
             not-a-store,5,2015-07-31,5263,555,1,1,0,1\n",
        );
        let err = read_train_records(&path).unwrap_err();
        match err {
            IngestError::Record { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}
