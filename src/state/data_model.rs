use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub type Row = BTreeMap<String, Value>;

/// Header under which the focused scenario column is shown in the detail view.
pub const VALUE_HEADER: &str = "Value";

/// What a summary-cell selection focuses on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusMode {
    /// A (well, scenario column) pair; the scenario is edited through [`VALUE_HEADER`].
    #[default]
    Scenario,
    /// A well only; the fixed `editable` columns are edited directly.
    Entity,
}

/// Names of the reserved columns of a well table and how the table is focused.
///
/// Every column not named here (and not prefixed by `label`) is a value column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    pub id: String,
    pub entity: String,
    pub category: Option<String>,
    pub series: String,
    pub control: Option<String>,
    pub lower_bound: String,
    pub upper_bound: String,
    pub label: String,
    pub label_original: String,
    pub default_scenario: Option<String>,
    pub focus_mode: FocusMode,
    pub editable: Vec<String>,
    pub bounded: Option<String>,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::scenarios()
    }
}

impl TableSchema {
    /// Forecast scenarios: one value column per scenario.
    pub fn scenarios() -> Self {
        Self {
            id: "id".to_string(),
            entity: "Well Name".to_string(),
            category: None,
            series: "Time".to_string(),
            control: Some("Well Control".to_string()),
            lower_bound: "Lower Bound".to_string(),
            upper_bound: "Upper Bound".to_string(),
            label: "Variable Name".to_string(),
            label_original: "Variable Name - Original".to_string(),
            default_scenario: Some("Default Scenario".to_string()),
            focus_mode: FocusMode::Scenario,
            editable: vec!["Variable Name".to_string(), VALUE_HEADER.to_string()],
            bounded: Some(VALUE_HEADER.to_string()),
        }
    }

    /// Optimization parameters: a fixed set of editable parameter columns per well.
    pub fn parameters() -> Self {
        Self {
            id: "id".to_string(),
            entity: "Well Name".to_string(),
            category: Some("Well Type".to_string()),
            series: "Time".to_string(),
            control: None,
            lower_bound: "LowerBound".to_string(),
            upper_bound: "UpperBound".to_string(),
            label: "Variable Name".to_string(),
            label_original: "Variable Name - Original".to_string(),
            default_scenario: None,
            focus_mode: FocusMode::Entity,
            editable: vec!["Variable Name".to_string(), "Initial Value".to_string()],
            bounded: Some("Initial Value".to_string()),
        }
    }

    pub fn is_structural(&self, column: &str) -> bool {
        column == self.id
            || column == self.entity
            || column == self.series
            || column == self.lower_bound
            || column == self.upper_bound
            || self.category.as_deref() == Some(column)
            || self.control.as_deref() == Some(column)
            || self.is_label_column(column)
    }

    pub fn is_label_column(&self, column: &str) -> bool {
        column.starts_with(self.label.as_str())
    }

    /// Columns kept as text when loading and editing.
    pub fn is_text_column(&self, column: &str) -> bool {
        column == self.entity
            || self.category.as_deref() == Some(column)
            || self.is_label_column(column)
    }

    pub fn required_columns(&self) -> [&str; 4] {
        [
            self.entity.as_str(),
            self.series.as_str(),
            self.lower_bound.as_str(),
            self.upper_bound.as_str(),
        ]
    }

    /// Label column written when the label of `scenario` is edited.
    pub fn paired_label_column(&self, scenario: &str) -> String {
        format!("{} - {}", self.label, scenario)
    }

    /// Label column read for `scenario`: its paired column, else another label column
    /// naming it, else the original labels.
    pub fn label_column_for(&self, table: &DetailTable, scenario: &str) -> String {
        let paired = self.paired_label_column(scenario);
        if table.has_column(&paired) {
            return paired;
        }
        table
            .columns()
            .iter()
            .find(|col| {
                self.is_label_column(col) && **col != self.label_original && col.contains(scenario)
            })
            .cloned()
            .unwrap_or_else(|| self.label_original.clone())
    }
}

/// The full well table: every row carries exactly `columns`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DetailTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl DetailTable {
    /// Builds a table, filling any column a row lacks with null.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.retain(|key, _| columns.contains(key));
                for col in &columns {
                    row.entry(col.clone()).or_insert(Value::Null);
                }
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|col| col == name)
    }

    pub fn find_column_ignore_case(&self, name: &str) -> Option<&str> {
        let needle = name.to_lowercase();
        self.columns
            .iter()
            .find(|col| col.to_lowercase() == needle)
            .map(String::as_str)
    }

    /// Value (scenario) columns in table order.
    pub fn value_columns(&self, schema: &TableSchema) -> Vec<String> {
        self.columns
            .iter()
            .filter(|col| !schema.is_structural(col))
            .cloned()
            .collect()
    }

    pub fn cell(&self, row_index: usize, column: &str) -> Option<&Value> {
        self.rows.get(row_index)?.get(column)
    }

    pub fn entity_row_indices(&self, schema: &TableSchema, entity: &str) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| {
                (row.get(&schema.entity).map(display_value).as_deref() == Some(entity))
                    .then_some(idx)
            })
            .collect()
    }

    pub fn has_entity(&self, schema: &TableSchema, entity: &str) -> bool {
        !self.entity_row_indices(schema, entity).is_empty()
    }

    /// Finds the row whose id cell displays as `row_key`.
    pub fn row_index_by_id(&self, schema: &TableSchema, row_key: &str) -> Option<usize> {
        let key = row_key.trim();
        self.rows
            .iter()
            .position(|row| row.get(&schema.id).map(display_value).as_deref() == Some(key))
    }

    /// First (entity, series) pair appearing on more than one row.
    pub fn duplicate_key(&self, schema: &TableSchema) -> Option<(String, String)> {
        let mut seen = BTreeSet::new();
        for row in &self.rows {
            let entity = row.get(&schema.entity).map(display_value).unwrap_or_default();
            let series = row.get(&schema.series).map(display_value).unwrap_or_default();
            if !seen.insert((entity.clone(), series.clone())) {
                return Some((entity, series));
            }
        }
        None
    }

    /// First entity whose rows disagree on the category column.
    pub fn mixed_category(&self, schema: &TableSchema) -> Option<String> {
        let category = schema.category.as_deref()?;
        let mut seen: BTreeMap<String, String> = BTreeMap::new();
        for row in &self.rows {
            let entity = row.get(&schema.entity).map(display_value).unwrap_or_default();
            let value = row.get(category).map(display_value).unwrap_or_default();
            match seen.get(&entity) {
                Some(first) if *first != value => return Some(entity),
                Some(_) => {}
                None => {
                    seen.insert(entity, value);
                }
            }
        }
        None
    }

    /// True when every row carries exactly the table's columns.
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|row| {
            row.len() == self.columns.len() && self.columns.iter().all(|col| row.contains_key(col))
        })
    }

    pub(crate) fn set_cell(&mut self, row_index: usize, column: &str, value: Value) -> bool {
        if !self.has_column(column) {
            return false;
        }
        match self.rows.get_mut(row_index) {
            Some(row) => {
                row.insert(column.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Appends `name` with one value per row; missing values become null.
    pub(crate) fn push_column(&mut self, name: &str, values: Vec<Value>) -> bool {
        if self.has_column(name) {
            return false;
        }
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.insert(name.to_string(), values.next().unwrap_or(Value::Null));
        }
        self.columns.push(name.to_string());
        true
    }

    pub(crate) fn remove_column(&mut self, name: &str) -> bool {
        let Some(pos) = self.columns.iter().position(|col| col == name) else {
            return false;
        };
        self.columns.remove(pos);
        for row in &mut self.rows {
            row.remove(name);
        }
        true
    }
}

/// Formats a cell value for display.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => format_number(f),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Exact text of a cell for editors and files; numbers keep every digit.
pub fn edit_text(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        _ => display_value(value),
    }
}

/// Parses raw text from a file cell or input box.
///
/// Empty input is null, numeric input a number, anything else text.
pub fn parse_cell_input(input: &str) -> Value {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    parse_number(trimmed)
        .map(number_value)
        .unwrap_or_else(|| Value::String(input.to_string()))
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Wraps a float as a cell value; integral floats become integers, non-finite floats null.
pub fn number_value(value: f64) -> Value {
    json_number_from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn json_number_from_f64(value: f64) -> Option<Number> {
    if !value.is_finite() {
        return None;
    }

    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        return Some((value as i64).into());
    }

    Number::from_f64(value)
}

fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let mut out = format!("{value:.6}");
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_value_keeps_integers_integral() {
        assert_eq!(number_value(10.0), Value::Number(10.into()));
        assert_eq!(number_value(f64::NAN), Value::Null);
        assert_eq!(display_value(&number_value(2.5)), "2.5");
    }

    #[test]
    fn edit_text_keeps_full_precision() {
        assert_eq!(edit_text(&number_value(0.1234567)), "0.1234567");
        assert_eq!(display_value(&number_value(0.1234567)), "0.123457");
        assert_eq!(edit_text(&Value::Number(12.into())), "12");
        assert_eq!(edit_text(&Value::Null), "");
    }

    #[test]
    fn format_number_trims_trailing_zeros() {
        assert_eq!(format_number(1.25), "1.25");
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
    }

    #[test]
    fn parse_cell_input_classifies_text() {
        assert_eq!(parse_cell_input("  "), Value::Null);
        assert_eq!(parse_cell_input("12"), Value::Number(12.into()));
        assert_eq!(parse_cell_input("P-1"), Value::String("P-1".to_string()));
        assert_eq!(parse_cell_input("inf"), Value::String("inf".to_string()));
    }
}
