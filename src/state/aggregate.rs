use std::collections::BTreeMap;

use serde_json::Value;

use crate::state::data_model::{self, DetailTable, Row, TableSchema};

/// Summary cell marker for a well whose per-step values disagree.
pub const VARYING: &str = "varying";

/// Largest absolute difference still treated as the same value.
pub const TOLERANCE: f64 = 1e-10;

/// One row per well (or well + category), keyed by the schema's id column.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SummaryTable {
    columns: Vec<String>,
    rows: Vec<Row>,
    key_column: String,
}

impl SummaryTable {
    /// Displayed columns; the key column is carried on every row but not listed.
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

    pub fn row_key(&self, index: usize) -> Option<String> {
        self.rows
            .get(index)?
            .get(&self.key_column)
            .map(data_model::display_value)
    }

    pub fn row_by_key(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|row| {
            row.get(&self.key_column)
                .map(data_model::display_value)
                .as_deref()
                == Some(key)
        })
    }

    pub fn cell(&self, key: &str, column: &str) -> Option<&Value> {
        self.row_by_key(key)?.get(column)
    }
}

/// Collapses the detail table into one row per group.
///
/// Groups are ordered by their key. The input table is left untouched.
pub fn summarize(table: &DetailTable, schema: &TableSchema) -> SummaryTable {
    let value_columns = table.value_columns(schema);

    let mut groups: BTreeMap<(String, String), Vec<&Row>> = BTreeMap::new();
    for row in table.rows() {
        let entity = row
            .get(&schema.entity)
            .map(data_model::display_value)
            .unwrap_or_default();
        let category = schema
            .category
            .as_ref()
            .and_then(|col| row.get(col))
            .map(data_model::display_value)
            .unwrap_or_default();
        groups.entry((entity, category)).or_default().push(row);
    }

    let mut columns = vec![schema.entity.clone()];
    if let Some(category) = schema.category.as_ref().filter(|col| table.has_column(col)) {
        columns.push(category.clone());
    }
    columns.extend(value_columns.iter().cloned());

    let rows = groups
        .into_iter()
        .map(|((entity, _), members)| {
            let mut summary = Row::new();
            summary.insert(schema.id.clone(), Value::String(entity));
            if let Some(first) = members.first() {
                summary.insert(
                    schema.entity.clone(),
                    first.get(&schema.entity).cloned().unwrap_or(Value::Null),
                );
                if let Some(category) = schema.category.as_ref() {
                    if let Some(value) = first.get(category) {
                        summary.insert(category.clone(), value.clone());
                    }
                }
            }
            for column in &value_columns {
                let reduced = well_agg(members.iter().filter_map(|row| row.get(column)));
                summary.insert(column.clone(), reduced);
            }
            summary
        })
        .collect();

    SummaryTable {
        columns,
        rows,
        key_column: schema.id.clone(),
    }
}

/// Reduces one well's values for a column: the first value when all agree within
/// [`TOLERANCE`], otherwise the [`VARYING`] marker. An empty group is null.
pub fn well_agg<'a, I>(values: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut values = values.into_iter();
    let Some(first) = values.next() else {
        return Value::Null;
    };

    if values.all(|value| same_value(first, value)) {
        first.clone()
    } else {
        Value::String(VARYING.to_string())
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() <= TOLERANCE,
            _ => x == y,
        },
        _ => a == b,
    }
}
