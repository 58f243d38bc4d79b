use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{EvaluateResult, PredictResult, RunResult};

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_row(table: &mut Table, label: &str, value: impl ToString) {
    table.add_row(vec![
        Cell::new(label),
        Cell::new(value.to_string()).set_alignment(CellAlignment::Right),
    ]);
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub fn print_run_summary(result: &RunResult) {
    println!("Variant: {}", result.variant);
    println!("Output: {}", result.output.display());
    if let Some(path) = &result.model_path {
        println!("Model: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Rows")]);
    apply_table_style(&mut table);
    count_row(&mut table, "Training rows read", result.train_rows_read);
    count_row(&mut table, "Training rows modeled", result.train_rows_modeled);
    count_row(&mut table, "Training rows dropped", result.train_rows_dropped);
    count_row(&mut table, "Inference rows read", result.test_rows_read);
    count_row(&mut table, "Inference rows scored", result.open_rows);
    count_row(&mut table, "Closed-store rows", result.closed_rows);
    count_row(&mut table, "Stores", result.store_rows);
    count_row(&mut table, "Feature columns", result.feature_columns);
    count_row(&mut table, "Predictions written", result.output_rows);
    println!("{table}");
    println!("In-sample RMSPE: {:.6}", result.train_rmspe);
}

pub fn print_predict_summary(result: &PredictResult) {
    println!("Variant: {}", result.variant);
    println!("Output: {}", result.output.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Rows")]);
    apply_table_style(&mut table);
    count_row(&mut table, "Inference rows read", result.test_rows_read);
    count_row(&mut table, "Inference rows scored", result.open_rows);
    count_row(&mut table, "Closed-store rows", result.closed_rows);
    count_row(&mut table, "Feature columns", result.feature_columns);
    count_row(&mut table, "Predictions written", result.output_rows);
    println!("{table}");
}

pub fn print_evaluate_summary(result: &EvaluateResult) {
    println!("Rows scored: {}", result.rows);
    println!("RMSPE: {:.6}", result.rmspe);
}
