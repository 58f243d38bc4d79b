//! Calendar feature derivation from the raw date field.

use chrono::{Datelike, NaiveDate};

use crate::error::TransformError;

/// Calendar fields derived from one ISO `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub year: i32,
    pub month: u32,
    /// `"YYYY-MM"` bucket key with a zero-padded month.
    pub year_month: String,
}

/// Derive calendar fields for every date in order.
///
/// Fails on the first date that does not parse; malformed rows are never
/// silently skipped.
pub fn derive_calendar<'a, I>(dates: I) -> Result<Vec<Calendar>, TransformError>
where
    I: IntoIterator<Item = &'a str>,
{
    dates
        .into_iter()
        .enumerate()
        .map(|(row, raw)| {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|source| {
                TransformError::Parse {
                    row,
                    value: raw.to_string(),
                    source,
                }
            })?;
            Ok(Calendar {
                year: date.year(),
                month: date.month(),
                year_month: format!("{:04}-{:02}", date.year(), date.month()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_year_month_and_padded_bucket() {
        let calendar = derive_calendar(["2015-08-01", "2014-12-31"]).unwrap();
        assert_eq!(calendar[0].year, 2015);
        assert_eq!(calendar[0].month, 8);
        assert_eq!(calendar[0].year_month, "2015-08");
        assert_eq!(calendar[1].year_month, "2014-12");
    }

    #[test]
    fn malformed_date_reports_row_and_value() {
        let err = derive_calendar(["2015-08-01", "08/02/2015"]).unwrap_err();
        match err {
            TransformError::Parse { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "08/02/2015");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_range_date_fails() {
        assert!(derive_calendar(["2015-13-01"]).is_err());
    }
}
