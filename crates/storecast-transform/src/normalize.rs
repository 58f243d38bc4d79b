//! Schema normalization of ambiguous raw representations.
//!
//! The holiday column arrives with two encodings of "no holiday": the
//! string `"0"` and a numeric zero (which some readers render as `"0.0"`
//! or `"00"`). Both are mapped to the canonical `"0"`. Unrecognized codes
//! pass through unchanged; strict validation of holiday codes is an
//! explicit non-goal.

use storecast_model::{TestRecord, TrainRecord};

/// Canonical form of one raw holiday code.
pub fn canonical_holiday_code(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "0".to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value == 0.0 => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

/// Canonicalize the holiday column of the training table.
pub fn normalize_train(mut records: Vec<TrainRecord>) -> Vec<TrainRecord> {
    for record in &mut records {
        record.state_holiday = canonical_holiday_code(&record.state_holiday);
    }
    records
}

/// Canonicalize the holiday column of the inference table.
pub fn normalize_test(mut records: Vec<TestRecord>) -> Vec<TestRecord> {
    for record in &mut records {
        record.state_holiday = canonical_holiday_code(&record.state_holiday);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_zero_forms_collapse_to_canonical() {
        assert_eq!(canonical_holiday_code("0"), "0");
        assert_eq!(canonical_holiday_code("0.0"), "0");
        assert_eq!(canonical_holiday_code("00"), "0");
        assert_eq!(canonical_holiday_code(" 0 "), "0");
        assert_eq!(canonical_holiday_code(""), "0");
    }

    #[test]
    fn holiday_codes_pass_through() {
        assert_eq!(canonical_holiday_code("a"), "a");
        assert_eq!(canonical_holiday_code("b"), "b");
        assert_eq!(canonical_holiday_code("c"), "c");
        // Unknown codes are not rejected here.
        assert_eq!(canonical_holiday_code("x"), "x");
    }
}
