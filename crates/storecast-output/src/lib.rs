//! Prediction table output.
//!
//! The terminal write stage: one CSV with an `Id,Sales` header and one
//! row per inference identifier, already ordered and validated by the
//! assembler.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use storecast_model::PredictionRow;

/// Errors raised while writing the prediction file.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write predictions to {path}: {source}")]
    Write {
        path: PathBuf,
        source: csv::Error,
    },
}

/// Write the assembled prediction rows as a headered CSV.
pub fn write_predictions(path: &Path, rows: &[PredictionRow]) -> Result<(), OutputError> {
    let map_err = |source: csv::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(map_err)?;
    for row in rows {
        writer.serialize(row).map_err(map_err)?;
    }
    writer.flush().map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    info!(path = %path.display(), rows = rows.len(), "wrote prediction table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        let rows = vec![
            PredictionRow {
                id: 1,
                sales: 4406.25,
            },
            PredictionRow { id: 2, sales: 0.0 },
        ];
        write_predictions(&path, &rows).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("Id,Sales"));
        assert_eq!(lines.next(), Some("1,4406.25"));
        assert_eq!(lines.next(), Some("2,0.0"));
    }

    #[test]
    fn round_trips_to_reasonable_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        let rows = vec![PredictionRow {
            id: 7,
            sales: 1234.567_891_011,
        }];
        write_predictions(&path, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let back: PredictionRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(back.id, 7);
        assert!((back.sales - rows[0].sales).abs() < 1e-9);
    }
}
