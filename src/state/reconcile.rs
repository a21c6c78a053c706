use serde_json::Value;
use thiserror::Error;

use crate::state::data_model::{self, DetailTable, FocusMode, TableSchema, VALUE_HEADER};

/// The current selection: a well and, in scenario mode, one of its value columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Focus {
    pub entity: Option<String>,
    pub column: Option<String>,
}

impl Focus {
    pub fn entity(entity: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
            column: None,
        }
    }

    pub fn scenario(entity: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
            column: Some(column.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entity.is_none() && self.column.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    /// Writes `value` into one detail row; `row_key` is the row's id.
    Cell {
        row_key: String,
        column: String,
        value: String,
    },
    /// Writes `constant` into every row of the focused well.
    BulkConstant { column: String, constant: f64 },
    ColumnDelete { column: String },
    ColumnAdd { name: String },
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("select a well before editing")]
    NoFocus,
    #[error("a column named '{0}' already exists")]
    DuplicateColumn(String),
    #[error("'{0}' is not a valid value")]
    InvalidValue(String),
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("unknown row '{0}'")]
    UnknownRow(String),
}

/// Result of a successful edit: the next table and focus plus the rows written.
#[derive(Clone, Debug, PartialEq)]
pub struct Applied {
    pub table: DetailTable,
    pub focus: Focus,
    pub affected: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Target {
    Numeric(String),
    Label { write: String, seed_from: String },
}

/// Applies edits to a detail table without mutating it.
///
/// Every edit either returns a complete next table or an error with nothing changed.
pub struct EditReconciler<'a> {
    schema: &'a TableSchema,
    original: &'a DetailTable,
}

impl<'a> EditReconciler<'a> {
    pub fn new(schema: &'a TableSchema, original: &'a DetailTable) -> Self {
        Self { schema, original }
    }

    pub fn apply(
        &self,
        table: &DetailTable,
        focus: &Focus,
        edit: &Edit,
    ) -> Result<Applied, EditError> {
        match edit {
            Edit::Cell {
                row_key,
                column,
                value,
            } => self.edit_cell(table, focus, row_key, column, value),
            Edit::BulkConstant { column, constant } => {
                self.edit_bulk(table, focus, column, *constant)
            }
            Edit::ColumnDelete { column } => self.delete_column(table, focus, column),
            Edit::ColumnAdd { name } => self.add_column(table, focus, name),
            Edit::Reset => Ok(Applied {
                table: self.original.clone(),
                focus: Focus::default(),
                affected: (0..self.original.len()).collect(),
            }),
        }
    }

    /// Table column written by an edit of the detail column `column`.
    pub fn target_column(
        &self,
        table: &DetailTable,
        focus: &Focus,
        column: &str,
    ) -> Result<String, EditError> {
        self.resolve_target(table, focus, column).map(|target| match target {
            Target::Numeric(col) => col,
            Target::Label { write, .. } => write,
        })
    }

    fn resolve_target(
        &self,
        table: &DetailTable,
        focus: &Focus,
        column: &str,
    ) -> Result<Target, EditError> {
        let entity = focus.entity.as_deref().ok_or(EditError::NoFocus)?;
        if !table.has_entity(self.schema, entity) {
            return Err(EditError::UnknownRow(entity.to_string()));
        }
        if !self.schema.editable.iter().any(|col| col == column) {
            return Err(EditError::UnknownColumn(column.to_string()));
        }

        match self.schema.focus_mode {
            FocusMode::Scenario => {
                let scenario = focus.column.as_deref().ok_or(EditError::NoFocus)?;
                if !table.value_columns(self.schema).iter().any(|c| c == scenario) {
                    return Err(EditError::UnknownColumn(scenario.to_string()));
                }
                if column == VALUE_HEADER {
                    Ok(Target::Numeric(scenario.to_string()))
                } else if column == self.schema.label {
                    Ok(Target::Label {
                        write: self.schema.paired_label_column(scenario),
                        seed_from: self.schema.label_column_for(table, scenario),
                    })
                } else {
                    Err(EditError::UnknownColumn(column.to_string()))
                }
            }
            FocusMode::Entity => {
                if self.schema.is_label_column(column) {
                    Ok(Target::Label {
                        write: column.to_string(),
                        seed_from: column.to_string(),
                    })
                } else if table.has_column(column) {
                    Ok(Target::Numeric(column.to_string()))
                } else {
                    Err(EditError::UnknownColumn(column.to_string()))
                }
            }
        }
    }

    fn edit_cell(
        &self,
        table: &DetailTable,
        focus: &Focus,
        row_key: &str,
        column: &str,
        raw: &str,
    ) -> Result<Applied, EditError> {
        let target = self.resolve_target(table, focus, column)?;
        let entity = focus.entity.as_deref().ok_or(EditError::NoFocus)?;

        let row = table
            .row_index_by_id(self.schema, row_key)
            .filter(|idx| {
                table
                    .cell(*idx, &self.schema.entity)
                    .map(data_model::display_value)
                    .as_deref()
                    == Some(entity)
            })
            .ok_or_else(|| EditError::UnknownRow(row_key.to_string()))?;

        let mut next = table.clone();
        let written = match target {
            Target::Numeric(col) => {
                let value = data_model::parse_number(raw)
                    .ok_or_else(|| EditError::InvalidValue(raw.to_string()))?;
                next.set_cell(row, &col, data_model::number_value(value))
            }
            Target::Label { write, seed_from } => {
                ensure_label_column(&mut next, &write, &seed_from);
                next.set_cell(row, &write, Value::String(raw.to_string()))
            }
        };
        if !written {
            return Err(EditError::UnknownColumn(column.to_string()));
        }

        Ok(Applied {
            table: next,
            focus: focus.clone(),
            affected: vec![row],
        })
    }

    fn edit_bulk(
        &self,
        table: &DetailTable,
        focus: &Focus,
        column: &str,
        constant: f64,
    ) -> Result<Applied, EditError> {
        let Target::Numeric(col) = self.resolve_target(table, focus, column)? else {
            return Err(EditError::UnknownColumn(column.to_string()));
        };
        if !constant.is_finite() {
            return Err(EditError::InvalidValue(constant.to_string()));
        }
        let entity = focus.entity.as_deref().ok_or(EditError::NoFocus)?;

        let rows = table.entity_row_indices(self.schema, entity);
        let mut next = table.clone();
        for idx in &rows {
            next.set_cell(*idx, &col, data_model::number_value(constant));
        }

        Ok(Applied {
            table: next,
            focus: focus.clone(),
            affected: rows,
        })
    }

    fn delete_column(
        &self,
        table: &DetailTable,
        focus: &Focus,
        column: &str,
    ) -> Result<Applied, EditError> {
        if !table.value_columns(self.schema).iter().any(|c| c == column) {
            return Err(EditError::UnknownColumn(column.to_string()));
        }

        let mut next = table.clone();
        next.remove_column(column);
        next.remove_column(&self.schema.paired_label_column(column));

        let focus = if focus.column.as_deref() == Some(column) {
            Focus::default()
        } else {
            focus.clone()
        };

        Ok(Applied {
            affected: (0..next.len()).collect(),
            table: next,
            focus,
        })
    }

    fn add_column(
        &self,
        table: &DetailTable,
        focus: &Focus,
        name: &str,
    ) -> Result<Applied, EditError> {
        let name = name.trim();
        if name.is_empty() || self.schema.is_label_column(name) {
            return Err(EditError::InvalidValue(name.to_string()));
        }
        if let Some(existing) = table.find_column_ignore_case(name) {
            return Err(EditError::DuplicateColumn(existing.to_string()));
        }

        let mut next = table.clone();
        next.push_column(name, default_values(table, self.schema));

        Ok(Applied {
            affected: (0..next.len()).collect(),
            table: next,
            focus: focus.clone(),
        })
    }
}

/// Starting values for a new scenario column: the default scenario when the table has
/// one, otherwise the mean of each row's available bounds.
pub fn default_values(table: &DetailTable, schema: &TableSchema) -> Vec<Value> {
    if let Some(default) = schema
        .default_scenario
        .as_deref()
        .filter(|col| table.has_column(col))
    {
        return table
            .rows()
            .iter()
            .map(|row| row.get(default).cloned().unwrap_or(Value::Null))
            .collect();
    }

    table
        .rows()
        .iter()
        .map(|row| {
            let bounds: Vec<f64> = [&schema.lower_bound, &schema.upper_bound]
                .into_iter()
                .filter_map(|col| row.get(col).and_then(data_model::value_as_f64))
                .collect();
            if bounds.is_empty() {
                Value::Null
            } else {
                data_model::number_value(bounds.iter().sum::<f64>() / bounds.len() as f64)
            }
        })
        .collect()
}

/// Value columns present in the table but missing from the last rendered column list.
///
/// An empty rendered list means nothing was rendered yet and deletes nothing.
pub fn columns_to_delete(
    table: &DetailTable,
    schema: &TableSchema,
    rendered: &[String],
) -> Vec<String> {
    if rendered.is_empty() {
        return Vec::new();
    }
    table
        .value_columns(schema)
        .into_iter()
        .filter(|col| !rendered.contains(col))
        .collect()
}

fn ensure_label_column(table: &mut DetailTable, write: &str, seed_from: &str) {
    if table.has_column(write) {
        return;
    }
    let seed = table
        .rows()
        .iter()
        .map(|row| row.get(seed_from).cloned().unwrap_or(Value::Null))
        .collect();
    table.push_column(write, seed);
}
