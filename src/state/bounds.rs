use crate::state::data_model::{self, Row, TableSchema};

/// True when `value` lies outside `[lower, upper]`.
pub fn out_of_bounds(value: f64, lower: f64, upper: f64) -> bool {
    value > upper || value < lower
}

/// Checks `column` of `row` against the row's own bound columns.
///
/// Cells without a numeric value or bound pair are never flagged.
pub fn row_out_of_bounds(row: &Row, column: &str, schema: &TableSchema) -> bool {
    let number = |col: &str| row.get(col).and_then(data_model::value_as_f64);
    match (
        number(column),
        number(&schema.lower_bound),
        number(&schema.upper_bound),
    ) {
        (Some(value), Some(lower), Some(upper)) => out_of_bounds(value, lower, upper),
        _ => false,
    }
}

pub fn flag_rows(rows: &[Row], column: &str, schema: &TableSchema) -> Vec<bool> {
    rows.iter()
        .map(|row| row_out_of_bounds(row, column, schema))
        .collect()
}
