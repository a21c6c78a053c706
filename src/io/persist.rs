use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::io::csv_io;
use crate::state::data_model::{DetailTable, TableSchema};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no table is loaded")]
    NothingLoaded,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Destination for the Save action.
pub trait Persist {
    fn persist(&mut self, table: &DetailTable) -> Result<(), PersistError>;
}

/// Acknowledges a save without writing anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Acknowledge;

impl Persist for Acknowledge {
    fn persist(&mut self, table: &DetailTable) -> Result<(), PersistError> {
        info!(rows = table.len(), "save acknowledged; no backend configured");
        Ok(())
    }
}

/// Writes the table as CSV to a fixed path.
#[derive(Clone, Debug)]
pub struct CsvFileBackend {
    path: PathBuf,
    schema: TableSchema,
}

impl CsvFileBackend {
    pub fn new(path: impl Into<PathBuf>, schema: TableSchema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persist for CsvFileBackend {
    fn persist(&mut self, table: &DetailTable) -> Result<(), PersistError> {
        csv_io::save_csv(&self.path, table, &self.schema)?;
        info!(path = %self.path.display(), "table written");
        Ok(())
    }
}

/// The CSV backend when a target path is configured, otherwise [`Acknowledge`].
pub fn backend_for(save_to: Option<&Path>, schema: &TableSchema) -> Box<dyn Persist> {
    match save_to {
        Some(path) => Box::new(CsvFileBackend::new(path, schema.clone())),
        None => Box::new(Acknowledge),
    }
}
