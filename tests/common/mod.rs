#![allow(dead_code)]

use std::path::PathBuf;

use wellsheet::io::csv_io;
use wellsheet::state::data_model::{DetailTable, TableSchema};

pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.join("tests").join("data").join(name)
}

pub fn load_fixture(name: &str, schema: &TableSchema) -> DetailTable {
    csv_io::load_csv(&fixture_path(name), schema).unwrap()
}

pub fn table_from_csv(text: &str, schema: &TableSchema) -> DetailTable {
    csv_io::read_csv(text.as_bytes(), schema).unwrap()
}

/// Two steps of one well with differing scenario values.
pub fn two_step_table() -> DetailTable {
    table_from_csv(
        "Well Name,Time,Scenario1,Lower Bound,Upper Bound\n\
         A,1,10,5,20\n\
         A,2,12,5,20\n",
        &TableSchema::scenarios(),
    )
}
