//! Dataset reconciliation: row filtering, store join, feature selection,
//! encoding, and train/inference column alignment.
//!
//! This stage turns the cleaned record tables into a pair of modeling
//! matrices with an identical column schema. The column alignment step is
//! the safety-critical invariant of the whole pipeline: a silent column
//! mismatch between fit and predict corrupts every prediction without
//! raising, so the reconciled inference frame is forced to exactly the
//! training column list and verified before anything is returned.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use storecast_model::variant::columns as col;
use storecast_model::{
    Column, ColumnValues, EncodingStrategy, FeaturePolicy, Frame, PipelineVariant, StoreRecord,
    TestRecord, TrainRecord,
};

use crate::encode::{LabelMap, apply_label_maps, fit_label_maps, one_hot_expand};
use crate::error::TransformError;
use crate::temporal::Calendar;

/// Cleaned inputs to reconciliation. Calendars are parallel to their
/// record slices.
pub struct ReconcileInput<'a> {
    pub train: &'a [TrainRecord],
    pub train_calendar: &'a [Calendar],
    pub test: &'a [TestRecord],
    pub test_calendar: &'a [Calendar],
    pub stores: &'a [StoreRecord],
}

/// Aligned modeling matrices plus the bookkeeping needed downstream.
#[derive(Debug)]
pub struct ReconciledDataset {
    /// Shared column schema of both matrices, in order.
    pub columns: Vec<String>,
    pub x_train: Frame,
    /// Raw (untransformed) target values, parallel to `x_train` rows.
    pub y_train: Vec<f64>,
    pub x_test: Frame,
    /// Inference row ids parallel to `x_test` rows, in source order.
    pub test_ids: Vec<u64>,
    /// Ids of inference rows removed because the store is closed; these
    /// re-enter at assembly with a fixed fallback prediction.
    pub closed_ids: Vec<u64>,
    /// Fitted label-index maps (shared-label variant only).
    pub label_maps: Option<BTreeMap<String, LabelMap>>,
    /// Training rows removed by the row filters.
    pub train_rows_dropped: usize,
}

/// Featurized inference table before encoding.
#[derive(Debug)]
pub struct TestFeatures {
    pub frame: Frame,
    pub ids: Vec<u64>,
    pub closed_ids: Vec<u64>,
}

struct RowView<'a> {
    store_id: u32,
    day_of_week: u8,
    date: &'a str,
    customers: Option<u32>,
    open: Option<u8>,
    promo: u8,
    state_holiday: &'a str,
    school_holiday: u8,
    calendar: &'a Calendar,
    store: &'a StoreRecord,
}

fn store_index(stores: &[StoreRecord]) -> Result<BTreeMap<u32, &StoreRecord>, TransformError> {
    let mut index = BTreeMap::new();
    for store in stores {
        if index.insert(store.store_id, store).is_some() {
            return Err(TransformError::DuplicateStore(store.store_id));
        }
    }
    Ok(index)
}

fn join_store<'a>(
    index: &BTreeMap<u32, &'a StoreRecord>,
    store_id: u32,
    row: usize,
) -> Result<&'a StoreRecord, TransformError> {
    index
        .get(&store_id)
        .copied()
        .ok_or(TransformError::JoinIntegrity { row, store_id })
}

fn check_parallel(records: usize, calendar: usize, table: &str) -> Result<(), TransformError> {
    if records == calendar {
        Ok(())
    } else {
        Err(TransformError::SchemaMismatch(format!(
            "{table} table has {records} rows but {calendar} derived calendar rows"
        )))
    }
}

fn holiday_binary(code: &str) -> Option<f64> {
    match code {
        "0" => Some(0.0),
        "a" | "b" | "c" => Some(1.0),
        _ => None,
    }
}

/// Build the joined wide frame for a slice of transaction rows.
fn build_wide_frame(
    rows: &[RowView<'_>],
    variant: &PipelineVariant,
    include_customers: bool,
) -> Result<Frame, TransformError> {
    let mut frame = Frame::with_height(rows.len());

    frame.push(Column::float_dense(
        col::STORE,
        rows.iter().map(|r| f64::from(r.store_id)).collect(),
    ))?;
    if variant.is_categorical(col::DAY_OF_WEEK) {
        frame.push(Column::str_dense(
            col::DAY_OF_WEEK,
            rows.iter().map(|r| r.day_of_week.to_string()).collect::<Vec<_>>(),
        ))?;
    } else {
        frame.push(Column::float_dense(
            col::DAY_OF_WEEK,
            rows.iter().map(|r| f64::from(r.day_of_week)).collect(),
        ))?;
    }
    frame.push(Column::str_dense(
        col::DATE,
        rows.iter().map(|r| r.date.to_string()).collect::<Vec<_>>(),
    ))?;
    if include_customers {
        frame.push(Column::float(
            col::CUSTOMERS,
            rows.iter()
                .map(|r| r.customers.map(f64::from))
                .collect(),
        ))?;
    }
    frame.push(Column::float(
        col::OPEN,
        rows.iter().map(|r| r.open.map(f64::from)).collect(),
    ))?;
    frame.push(Column::float_dense(
        col::PROMO,
        rows.iter().map(|r| f64::from(r.promo)).collect(),
    ))?;
    frame.push(Column::str_dense(
        col::STATE_HOLIDAY,
        rows.iter()
            .map(|r| r.state_holiday.to_string())
            .collect::<Vec<_>>(),
    ))?;
    if variant.holiday_binary {
        frame.push(Column::float(
            col::STATE_HOLIDAY_BINARY,
            rows.iter().map(|r| holiday_binary(r.state_holiday)).collect(),
        ))?;
    }
    frame.push(Column::float_dense(
        col::SCHOOL_HOLIDAY,
        rows.iter().map(|r| f64::from(r.school_holiday)).collect(),
    ))?;
    frame.push(Column::float_dense(
        col::YEAR,
        rows.iter().map(|r| f64::from(r.calendar.year)).collect(),
    ))?;
    frame.push(Column::float_dense(
        col::MONTH,
        rows.iter().map(|r| f64::from(r.calendar.month)).collect(),
    ))?;
    frame.push(Column::str_dense(
        col::YEAR_MONTH,
        rows.iter()
            .map(|r| r.calendar.year_month.clone())
            .collect::<Vec<_>>(),
    ))?;
    frame.push(Column::str_dense(
        col::STORE_TYPE,
        rows.iter()
            .map(|r| r.store.store_type.clone())
            .collect::<Vec<_>>(),
    ))?;
    frame.push(Column::str_dense(
        col::ASSORTMENT,
        rows.iter()
            .map(|r| r.store.assortment.clone())
            .collect::<Vec<_>>(),
    ))?;
    frame.push(Column::float(
        col::COMPETITION_DISTANCE,
        rows.iter().map(|r| r.store.competition_distance).collect(),
    ))?;
    frame.push(Column::float(
        col::COMPETITION_OPEN_SINCE_MONTH,
        rows.iter()
            .map(|r| r.store.competition_open_since_month.map(f64::from))
            .collect(),
    ))?;
    frame.push(Column::float(
        col::COMPETITION_OPEN_SINCE_YEAR,
        rows.iter()
            .map(|r| r.store.competition_open_since_year.map(f64::from))
            .collect(),
    ))?;
    frame.push(Column::float_dense(
        col::PROMO2,
        rows.iter().map(|r| f64::from(r.store.promo2)).collect(),
    ))?;
    frame.push(Column::float(
        col::PROMO2_SINCE_WEEK,
        rows.iter()
            .map(|r| r.store.promo2_since_week.map(f64::from))
            .collect(),
    ))?;
    frame.push(Column::float(
        col::PROMO2_SINCE_YEAR,
        rows.iter()
            .map(|r| r.store.promo2_since_year.map(f64::from))
            .collect(),
    ))?;
    frame.push(Column::str(
        col::PROMO_INTERVAL,
        rows.iter().map(|r| r.store.promo_interval.clone()).collect(),
    ))?;

    Ok(frame)
}

fn apply_feature_policy(frame: Frame, policy: &FeaturePolicy) -> Result<Frame, TransformError> {
    match policy {
        FeaturePolicy::DropList(drops) => {
            let mut frame = frame;
            let names: Vec<&str> = drops.iter().map(String::as_str).collect();
            frame.drop_columns(&names);
            Ok(frame)
        }
        FeaturePolicy::KeepList(keeps) => {
            let names: Vec<&str> = keeps.iter().map(String::as_str).collect();
            frame.select(&names).map_err(TransformError::from)
        }
    }
}

fn first_missing(frame: &Frame) -> Option<(String, usize)> {
    for column in frame.columns() {
        let row = match &column.values {
            ColumnValues::Float(v) => v.iter().position(Option::is_none),
            ColumnValues::Str(v) => v.iter().position(Option::is_none),
        };
        if let Some(row) = row {
            return Some((column.name.clone(), row));
        }
    }
    None
}

fn ensure_dense(frame: &Frame) -> Result<(), TransformError> {
    match first_missing(frame) {
        Some((column, row)) => Err(TransformError::MissingValue { column, row }),
        None => Ok(()),
    }
}

/// Featurize the inference table: split off closed-store rows, join the
/// store table, apply the variant's feature policy and catch-all fill.
pub fn featurize_test(
    test: &[TestRecord],
    calendar: &[Calendar],
    stores: &[StoreRecord],
    variant: &PipelineVariant,
) -> Result<TestFeatures, TransformError> {
    check_parallel(test.len(), calendar.len(), "inference")?;
    let index = store_index(stores)?;

    let mut ids = Vec::new();
    let mut closed_ids = Vec::new();
    let mut rows = Vec::new();
    for (row, (record, calendar)) in test.iter().zip(calendar).enumerate() {
        if record.open == Some(0) {
            closed_ids.push(record.id);
            continue;
        }
        ids.push(record.id);
        rows.push(RowView {
            store_id: record.store_id,
            day_of_week: record.day_of_week,
            date: &record.date,
            customers: None,
            open: record.open,
            promo: record.promo,
            state_holiday: &record.state_holiday,
            school_holiday: record.school_holiday,
            calendar,
            store: join_store(&index, record.store_id, row)?,
        });
    }

    let frame = build_wide_frame(&rows, variant, false)?;
    let mut frame = apply_feature_policy(frame, &variant.feature_policy)?;
    if variant.fill_remaining {
        frame.fill_missing(0.0, "0");
    }
    debug!(
        open_rows = ids.len(),
        closed_rows = closed_ids.len(),
        columns = frame.width(),
        "featurized inference table"
    );
    Ok(TestFeatures {
        frame,
        ids,
        closed_ids,
    })
}

fn featurize_train(
    train: &[TrainRecord],
    calendar: &[Calendar],
    stores: &[StoreRecord],
    inference_stores: &BTreeSet<u32>,
    variant: &PipelineVariant,
) -> Result<(Frame, Vec<f64>, usize), TransformError> {
    check_parallel(train.len(), calendar.len(), "training")?;
    let index = store_index(stores)?;

    let mut rows = Vec::new();
    let mut y_train = Vec::new();
    for (row, (record, calendar)) in train.iter().zip(calendar).enumerate() {
        // Stores the model will never be asked about do not help, and
        // closed days carry no learnable sales signal.
        if !inference_stores.contains(&record.store_id) || record.open == Some(0) {
            continue;
        }
        let sales = record.sales.ok_or_else(|| TransformError::MissingValue {
            column: "sales".to_string(),
            row,
        })?;
        y_train.push(sales);
        rows.push(RowView {
            store_id: record.store_id,
            day_of_week: record.day_of_week,
            date: &record.date,
            customers: record.customers,
            open: record.open,
            promo: record.promo,
            state_holiday: &record.state_holiday,
            school_holiday: record.school_holiday,
            calendar,
            store: join_store(&index, record.store_id, row)?,
        });
    }
    let dropped = train.len() - rows.len();

    let frame = build_wide_frame(&rows, variant, true)?;
    let mut frame = apply_feature_policy(frame, &variant.feature_policy)?;
    if variant.fill_remaining {
        frame.fill_missing(0.0, "0");
    }
    Ok((frame, y_train, dropped))
}

/// Force `frame` to exactly the given column schema.
///
/// Columns absent from the frame are added as all-zero; columns the
/// schema does not name are dropped. Every surviving column must be
/// numeric.
pub fn align_to_columns(columns: &[String], frame: &Frame) -> Result<Frame, TransformError> {
    let height = frame.height();
    let mut out = Frame::with_height(height);
    for name in columns {
        match frame.column(name) {
            Some(column) => {
                if column.values.is_str() {
                    return Err(TransformError::SchemaMismatch(format!(
                        "column '{name}' is still categorical after encoding"
                    )));
                }
                out.push(column.clone())?;
            }
            None => out.push(Column::float_dense(name.clone(), vec![0.0; height]))?,
        }
    }
    Ok(out)
}

/// Run the full reconciliation for one pipeline variant.
pub fn reconcile(
    input: &ReconcileInput<'_>,
    variant: &PipelineVariant,
) -> Result<ReconciledDataset, TransformError> {
    let inference_stores: BTreeSet<u32> = input.test.iter().map(|r| r.store_id).collect();

    let (train_frame, y_train, train_rows_dropped) = featurize_train(
        input.train,
        input.train_calendar,
        input.stores,
        &inference_stores,
        variant,
    )?;
    let test_features = featurize_test(input.test, input.test_calendar, input.stores, variant)?;

    let (x_train, x_test, label_maps) = match variant.encoding {
        EncodingStrategy::OneHot => {
            let x_train = one_hot_expand(train_frame)?;
            let expanded_test = one_hot_expand(test_features.frame)?;
            let columns: Vec<String> =
                x_train.names().iter().map(|n| (*n).to_string()).collect();
            let x_test = align_to_columns(&columns, &expanded_test)?;
            (x_train, x_test, None)
        }
        EncodingStrategy::SharedLabel => {
            let maps = fit_label_maps(&train_frame, &test_features.frame)?;
            let x_train = apply_label_maps(train_frame, &maps)?;
            let x_test = apply_label_maps(test_features.frame, &maps)?;
            (x_train, x_test, Some(maps))
        }
    };

    let columns: Vec<String> = x_train.names().iter().map(|n| (*n).to_string()).collect();
    let test_columns: Vec<String> = x_test.names().iter().map(|n| (*n).to_string()).collect();
    if columns != test_columns {
        return Err(TransformError::SchemaMismatch(format!(
            "training matrix has columns {columns:?}, inference matrix has {test_columns:?}"
        )));
    }
    ensure_dense(&x_train)?;
    ensure_dense(&x_test)?;

    info!(
        variant = %variant.name,
        train_rows = x_train.height(),
        train_rows_dropped,
        test_rows = x_test.height(),
        closed_rows = test_features.closed_ids.len(),
        columns = columns.len(),
        "reconciled modeling matrices"
    );

    Ok(ReconciledDataset {
        columns,
        x_train,
        y_train,
        x_test,
        test_ids: test_features.ids,
        closed_ids: test_features.closed_ids,
        label_maps,
        train_rows_dropped,
    })
}
