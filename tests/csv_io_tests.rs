mod common;

use pretty_assertions::assert_eq;
use serde_json::Value;

use wellsheet::io::csv_io::{self, LoadError};
use wellsheet::state::data_model::{number_value, TableSchema};

#[test]
fn test_load_fixture() {
    let schema = TableSchema::scenarios();
    let table = common::load_fixture("scenarios.csv", &schema);

    assert_eq!(table.len(), 5);
    assert_eq!(
        table.columns(),
        &[
            "id",
            "Well Name",
            "Time",
            "Well Control",
            "Variable Name - Original",
            "Lower Bound",
            "Upper Bound",
            "Default Scenario",
            "Scenario A",
        ]
    );
    assert_eq!(table.cell(4, "id"), Some(&Value::Number(4.into())));
    assert_eq!(
        table.cell(4, "Well Name"),
        Some(&Value::String("I-1".to_string()))
    );
    assert_eq!(table.cell(4, "Scenario A"), Some(&Value::Number(60.into())));
    assert!(table.is_rectangular());
}

#[test]
fn test_file_id_column_is_replaced() {
    let schema = TableSchema::scenarios();
    let table = common::table_from_csv(
        "Well Name,id,Time,Lower Bound,Upper Bound\n\
         A,17,1,0,1\n\
         A,3,2,0,1\n",
        &schema,
    );

    assert_eq!(
        table.columns(),
        &["id", "Well Name", "Time", "Lower Bound", "Upper Bound"]
    );
    assert_eq!(table.cell(0, "id"), Some(&Value::Number(0.into())));
    assert_eq!(table.cell(1, "id"), Some(&Value::Number(1.into())));
}

#[test]
fn test_text_and_numeric_cells() {
    let schema = TableSchema::parameters();
    let table = common::table_from_csv(
        "Well Name,Well Type,Time,Variable Name,Initial Value,LowerBound,UpperBound\n\
         101,Producer,1,7,0.25,,1\n",
        &schema,
    );

    assert_eq!(
        table.cell(0, "Well Name"),
        Some(&Value::String("101".to_string()))
    );
    assert_eq!(
        table.cell(0, "Variable Name"),
        Some(&Value::String("7".to_string()))
    );
    assert_eq!(table.cell(0, "Initial Value"), Some(&number_value(0.25)));
    assert_eq!(table.cell(0, "LowerBound"), Some(&Value::Null));
}

#[test]
fn test_headers_are_trimmed() {
    let schema = TableSchema::scenarios();
    let table = common::table_from_csv(
        " Well Name , Time ,Lower Bound,Upper Bound, Base \nA,1,0,1,0.5\n",
        &schema,
    );

    assert!(table.has_column("Well Name"));
    assert_eq!(table.value_columns(&schema), vec!["Base"]);
}

#[test]
fn test_missing_required_column() {
    let schema = TableSchema::scenarios();
    let result = csv_io::read_csv(
        "Well Name,Time,Lower Bound,Scenario\nA,1,0,1\n".as_bytes(),
        &schema,
    );

    assert!(matches!(result, Err(LoadError::MissingColumn(col)) if col == "Upper Bound"));
}

#[test]
fn test_duplicate_header() {
    let schema = TableSchema::scenarios();
    let result = csv_io::read_csv(
        "Well Name,Time,Lower Bound,Upper Bound,S1,S1\nA,1,0,1,2,3\n".as_bytes(),
        &schema,
    );

    assert!(matches!(result, Err(LoadError::DuplicateColumn(col)) if col == "S1"));
}

#[test]
fn test_duplicate_well_step() {
    let schema = TableSchema::scenarios();
    let result = csv_io::read_csv(
        "Well Name,Time,Lower Bound,Upper Bound,S1\n\
         A,1,0,1,2\n\
         B,1,0,1,2\n\
         A,1,0,1,3\n"
            .as_bytes(),
        &schema,
    );

    assert!(matches!(
        result,
        Err(LoadError::DuplicateRow { entity, series }) if entity == "A" && series == "1"
    ));
}

#[test]
fn test_empty_input() {
    let schema = TableSchema::scenarios();
    let result = csv_io::read_csv("".as_bytes(), &schema);

    assert!(matches!(result, Err(LoadError::EmptyHeader)));
}

#[test]
fn test_ragged_row() {
    let schema = TableSchema::scenarios();
    let result = csv_io::read_csv(
        "Well Name,Time,Lower Bound,Upper Bound\nA,1,0\n".as_bytes(),
        &schema,
    );

    assert!(matches!(result, Err(LoadError::Csv(_))));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = csv_io::load_csv(&dir.path().join("absent.csv"), &TableSchema::scenarios());

    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn test_write_csv_omits_id() {
    let schema = TableSchema::scenarios();
    let table = common::two_step_table();

    let mut out = Vec::new();
    csv_io::write_csv(&mut out, &table, &schema).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Well Name,Time,Scenario1,Lower Bound,Upper Bound\n\
         A,1,10,5,20\n\
         A,2,12,5,20\n"
    );
}

#[test]
fn test_save_csv_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    std::fs::write(&path, "stale").unwrap();
    let schema = TableSchema::scenarios();
    let table = common::load_fixture("scenarios.csv", &schema);

    csv_io::save_csv(&path, &table, &schema).unwrap();

    let reloaded = csv_io::load_csv(&path, &schema).unwrap();
    assert_eq!(reloaded, table);
}

#[test]
fn test_save_keeps_full_float_precision() {
    let schema = TableSchema::scenarios();
    let table = common::table_from_csv(
        "Well Name,Time,Scenario1,Lower Bound,Upper Bound\n\
         A,1,0.1234567,0,1\n\
         A,2,0.0000001,0,1\n",
        &schema,
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("precise.csv");

    csv_io::save_csv(&path, &table, &schema).unwrap();

    let reloaded = csv_io::load_csv(&path, &schema).unwrap();
    assert_eq!(reloaded.cell(0, "Scenario1"), Some(&number_value(0.1234567)));
    assert_eq!(reloaded.cell(1, "Scenario1"), Some(&number_value(1e-7)));
    assert_eq!(reloaded, table);
}

#[test]
fn test_well_with_two_categories() {
    let schema = TableSchema::parameters();
    let result = csv_io::read_csv(
        "Well Name,Well Type,Time,Variable Name,Initial Value,LowerBound,UpperBound\n\
         W1,Producer,1,w1_t1,0.5,0,1\n\
         W1,Injector,2,w1_t2,0.5,0,1\n"
            .as_bytes(),
        &schema,
    );

    assert!(matches!(result, Err(LoadError::MixedCategory(entity)) if entity == "W1"));
}
