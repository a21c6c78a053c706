use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::io::persist::PersistError;
use crate::state::data_model::{self, DetailTable, Row, TableSchema};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("file has no header row")]
    EmptyHeader,
    #[error("column '{0}' appears more than once in the header")]
    DuplicateColumn(String),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("more than one row for well '{entity}' at '{series}'")]
    DuplicateRow { entity: String, series: String },
    #[error("well '{0}' has more than one category")]
    MixedCategory(String),
}

pub fn load_csv(path: &Path, schema: &TableSchema) -> Result<DetailTable, LoadError> {
    let file = File::open(path)?;
    read_csv(file, schema)
}

/// Reads a header-led CSV into a detail table.
///
/// Any `id` column in the file is discarded; ids are the 0-based row positions.
pub fn read_csv<R: Read>(reader: R, schema: &TableSchema) -> Result<DetailTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|header| header.is_empty()) {
        return Err(LoadError::EmptyHeader);
    }

    let mut seen = BTreeSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(LoadError::DuplicateColumn(header.clone()));
        }
    }
    for required in schema.required_columns() {
        if !seen.contains(required) {
            return Err(LoadError::MissingColumn(required.to_string()));
        }
    }

    let mut columns = vec![schema.id.clone()];
    columns.extend(headers.iter().filter(|h| **h != schema.id).cloned());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = Row::new();
        row.insert(schema.id.clone(), Value::Number(index.into()));
        for (header, field) in headers.iter().zip(record.iter()) {
            if *header == schema.id {
                continue;
            }
            row.insert(header.clone(), parse_field(schema, header, field));
        }
        rows.push(row);
    }

    let table = DetailTable::new(columns, rows);
    if let Some((entity, series)) = table.duplicate_key(schema) {
        return Err(LoadError::DuplicateRow { entity, series });
    }
    if let Some(entity) = table.mixed_category(schema) {
        return Err(LoadError::MixedCategory(entity));
    }
    Ok(table)
}

/// Writes the table through a temp file so a failed save never truncates `path`.
pub fn save_csv(path: &Path, table: &DetailTable, schema: &TableSchema) -> Result<(), PersistError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, table, schema)?;
    super::atomic_write(path, &buffer)?;
    Ok(())
}

/// Writes every column except the synthesized id.
pub fn write_csv<W: Write>(
    writer: W,
    table: &DetailTable,
    schema: &TableSchema,
) -> Result<(), PersistError> {
    let columns: Vec<&String> = table
        .columns()
        .iter()
        .filter(|col| **col != schema.id)
        .collect();

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&columns)?;
    for row in table.rows() {
        writer.write_record(columns.iter().map(|col| {
            row.get(col.as_str())
                .map(data_model::edit_text)
                .unwrap_or_default()
        }))?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_field(schema: &TableSchema, header: &str, field: &str) -> Value {
    if !schema.is_text_column(header) {
        return data_model::parse_cell_input(field);
    }
    if field.trim().is_empty() {
        Value::Null
    } else {
        Value::String(field.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_columns_stay_text() {
        let schema = TableSchema::scenarios();
        assert_eq!(
            parse_field(&schema, "Well Name", "101"),
            Value::String("101".to_string())
        );
        assert_eq!(parse_field(&schema, "Time", "3"), Value::Number(3.into()));
        assert_eq!(parse_field(&schema, "Variable Name - Original", ""), Value::Null);
    }
}
