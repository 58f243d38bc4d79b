//! Pipeline variant configuration.
//!
//! Two historical modeling experiments shipped with divergent choices:
//! a linear model over one-hot expanded features, and a tree model over
//! shared label-indexed features with a log-transformed target. The
//! divergences are genuine design differences, not bugs, so they are
//! carried as explicit configuration rather than silently unified.

use serde::{Deserialize, Serialize};

/// Canonical feature column names used across the pipeline.
pub mod columns {
    pub const STORE: &str = "store";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const DATE: &str = "date";
    pub const CUSTOMERS: &str = "customers";
    pub const OPEN: &str = "open";
    pub const PROMO: &str = "promo";
    pub const STATE_HOLIDAY: &str = "state_holiday";
    pub const STATE_HOLIDAY_BINARY: &str = "state_holiday_binary";
    pub const SCHOOL_HOLIDAY: &str = "school_holiday";
    pub const YEAR: &str = "year";
    pub const MONTH: &str = "month";
    pub const YEAR_MONTH: &str = "year_month";
    pub const STORE_TYPE: &str = "store_type";
    pub const ASSORTMENT: &str = "assortment";
    pub const COMPETITION_DISTANCE: &str = "competition_distance";
    pub const COMPETITION_OPEN_SINCE_MONTH: &str = "competition_open_since_month";
    pub const COMPETITION_OPEN_SINCE_YEAR: &str = "competition_open_since_year";
    pub const PROMO2: &str = "promo2";
    pub const PROMO2_SINCE_WEEK: &str = "promo2_since_week";
    pub const PROMO2_SINCE_YEAR: &str = "promo2_since_year";
    pub const PROMO_INTERVAL: &str = "promo_interval";
}

/// Which tables receive the `open` missing-value fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenImputation {
    /// Fill only the inference table (linear variant).
    InferenceOnly,
    /// Fill both training and inference tables (tree variant).
    Both,
}

/// Categorical encoding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStrategy {
    /// Per-table one-hot expansion, reconciled afterwards by column
    /// alignment.
    OneHot,
    /// One label-index map per column, fit on the union of training and
    /// inference values and applied to both tables.
    SharedLabel,
}

/// Which feature columns survive into the modeling matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturePolicy {
    /// Drop the listed columns, keep everything else.
    DropList(Vec<String>),
    /// Keep exactly the listed columns, in the listed order.
    KeepList(Vec<String>),
}

/// Target-scale transform applied before fitting and inverted at assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTransform {
    /// Fit on raw sales values.
    Identity,
    /// Fit on `ln(sales + 1)`; invert with `exp(value) - 1`.
    Log1p,
}

impl TargetTransform {
    /// Forward transform of one target value.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Log1p => (value + 1.0).ln(),
        }
    }

    /// Inverse transform of one predicted value.
    pub fn invert(self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Log1p => value.exp() - 1.0,
        }
    }

    /// Forward transform of a target vector.
    pub fn apply_all(self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| self.apply(*v)).collect()
    }
}

/// Full configuration of one pipeline flavor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineVariant {
    /// Short variant name used in logs and artifacts.
    pub name: String,
    pub open_imputation: OpenImputation,
    pub encoding: EncodingStrategy,
    /// Numeric source columns treated as categoricals (built as string
    /// columns so the encoder sees them).
    pub categorical_columns: Vec<String>,
    pub feature_policy: FeaturePolicy,
    /// Derive the binary holiday indicator from `state_holiday`.
    pub holiday_binary: bool,
    /// Run the catch-all fill of remaining missing cells with 0.
    pub fill_remaining: bool,
    pub target: TargetTransform,
}

impl PipelineVariant {
    /// The linear-model pipeline: one-hot features, raw target, no
    /// calendar features (the inference window is a fixed two-month
    /// span, so year/month carry no usable signal).
    pub fn linear() -> Self {
        use self::columns as c;
        Self {
            name: "linear".to_string(),
            open_imputation: OpenImputation::InferenceOnly,
            encoding: EncodingStrategy::OneHot,
            categorical_columns: vec![c::DAY_OF_WEEK.to_string()],
            feature_policy: FeaturePolicy::DropList(
                [
                    c::DATE,
                    c::CUSTOMERS,
                    c::OPEN,
                    c::YEAR,
                    c::MONTH,
                    c::YEAR_MONTH,
                    c::COMPETITION_OPEN_SINCE_MONTH,
                    c::COMPETITION_OPEN_SINCE_YEAR,
                    c::PROMO2,
                    c::PROMO2_SINCE_WEEK,
                    c::PROMO2_SINCE_YEAR,
                    c::PROMO_INTERVAL,
                ]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            ),
            holiday_binary: false,
            fill_remaining: false,
            target: TargetTransform::Identity,
        }
    }

    /// The tree-model pipeline: shared label-index features, log target,
    /// calendar features retained.
    pub fn tree() -> Self {
        use self::columns as c;
        Self {
            name: "tree".to_string(),
            open_imputation: OpenImputation::Both,
            encoding: EncodingStrategy::SharedLabel,
            categorical_columns: Vec::new(),
            feature_policy: FeaturePolicy::KeepList(
                [
                    c::STORE,
                    c::YEAR,
                    c::MONTH,
                    c::YEAR_MONTH,
                    c::OPEN,
                    c::PROMO,
                    c::SCHOOL_HOLIDAY,
                    c::COMPETITION_DISTANCE,
                    c::PROMO2,
                    c::COMPETITION_OPEN_SINCE_YEAR,
                    c::STATE_HOLIDAY,
                    c::DAY_OF_WEEK,
                    c::STATE_HOLIDAY_BINARY,
                    c::STORE_TYPE,
                    c::ASSORTMENT,
                ]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            ),
            holiday_binary: true,
            fill_remaining: true,
            target: TargetTransform::Log1p,
        }
    }

    /// True if this variant treats the named source column as categorical.
    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical_columns.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_preset_drops_calendar_features() {
        let variant = PipelineVariant::linear();
        match &variant.feature_policy {
            FeaturePolicy::DropList(drops) => {
                assert!(drops.contains(&columns::YEAR.to_string()));
                assert!(drops.contains(&columns::YEAR_MONTH.to_string()));
            }
            FeaturePolicy::KeepList(_) => panic!("linear variant uses a drop list"),
        }
        assert_eq!(variant.target, TargetTransform::Identity);
        assert!(variant.is_categorical(columns::DAY_OF_WEEK));
    }

    #[test]
    fn tree_preset_keeps_calendar_features() {
        let variant = PipelineVariant::tree();
        match &variant.feature_policy {
            FeaturePolicy::KeepList(keeps) => {
                assert!(keeps.contains(&columns::YEAR_MONTH.to_string()));
                assert!(keeps.contains(&columns::STATE_HOLIDAY_BINARY.to_string()));
            }
            FeaturePolicy::DropList(_) => panic!("tree variant uses a keep list"),
        }
        assert_eq!(variant.target, TargetTransform::Log1p);
        assert_eq!(variant.open_imputation, OpenImputation::Both);
    }

    #[test]
    fn variant_round_trips_through_json() {
        let variant = PipelineVariant::tree();
        let json = serde_json::to_string(&variant).unwrap();
        let back: PipelineVariant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, variant);
    }

    #[test]
    fn log_transform_round_trips() {
        let transform = TargetTransform::Log1p;
        for v in [0.0, 1.0, 42.5, 12345.0] {
            let back = transform.invert(transform.apply(v));
            assert!((back - v).abs() < 1e-9, "{v} round-tripped to {back}");
        }
    }
}
