use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::persist::{self, Persist};
use crate::state::data_model::TableSchema;

pub const CONFIG_VAR: &str = "WELLSHEET_CONFIG";
pub const OPEN_VAR: &str = "WELLSHEET_OPEN";
pub const LAYOUT_VAR: &str = "WELLSHEET_LAYOUT";
pub const SAVE_TO_VAR: &str = "WELLSHEET_SAVE_TO";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Scenarios,
    Parameters,
}

impl Layout {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "scenarios" => Some(Self::Scenarios),
            "parameters" => Some(Self::Parameters),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Scenarios => "scenarios",
            Self::Parameters => "parameters",
        }
    }

    pub fn schema(self) -> TableSchema {
        match self {
            Self::Scenarios => TableSchema::scenarios(),
            Self::Parameters => TableSchema::parameters(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown layout '{0}' (expected 'scenarios' or 'parameters')")]
    UnknownLayout(String),
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk config; every field is optional and environment variables win.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    layout: Option<Layout>,
    open: Option<PathBuf>,
    save_to: Option<PathBuf>,
    schema: Option<TableSchema>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub open: Option<PathBuf>,
    pub layout: Layout,
    pub save_to: Option<PathBuf>,
    /// A schema from the config file replaces the layout's built-in one.
    pub schema: TableSchema,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            open: None,
            layout: Layout::default(),
            save_to: None,
            schema: Layout::default().schema(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let file = match lookup(CONFIG_VAR) {
            Some(path) => read_config_file(Path::new(&path))?,
            None => ConfigFile::default(),
        };

        let layout = match lookup(LAYOUT_VAR) {
            Some(name) => Layout::from_name(&name).ok_or(ConfigError::UnknownLayout(name))?,
            None => file.layout.unwrap_or_default(),
        };

        Ok(Self {
            open: lookup(OPEN_VAR).map(PathBuf::from).or(file.open),
            layout,
            save_to: lookup(SAVE_TO_VAR).map(PathBuf::from).or(file.save_to),
            schema: file.schema.unwrap_or_else(|| layout.schema()),
        })
    }

    pub fn persist_backend(&self) -> Box<dyn Persist> {
        persist::backend_for(self.save_to.as_deref(), &self.schema)
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
