use std::collections::HashMap;
use std::path::PathBuf;

use pretty_assertions::assert_eq;

use wellsheet::config::{
    AppConfig, ConfigError, Layout, CONFIG_VAR, LAYOUT_VAR, OPEN_VAR, SAVE_TO_VAR,
};
use wellsheet::state::data_model::{FocusMode, TableSchema};

fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    AppConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn test_defaults_without_environment() {
    let config = config_from(&[]).unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.layout, Layout::Scenarios);
    assert_eq!(config.schema, TableSchema::scenarios());
    assert_eq!(config.open, None);
}

#[test]
fn test_layout_from_environment() {
    let config = config_from(&[(LAYOUT_VAR, "Parameters")]).unwrap();

    assert_eq!(config.layout, Layout::Parameters);
    assert_eq!(config.schema.focus_mode, FocusMode::Entity);
    assert_eq!(config.layout.name(), "parameters");
}

#[test]
fn test_unknown_layout() {
    let result = config_from(&[(LAYOUT_VAR, "bogus")]);

    assert!(matches!(result, Err(ConfigError::UnknownLayout(name)) if name == "bogus"));
}

#[test]
fn test_blank_variables_are_unset() {
    let config = config_from(&[(LAYOUT_VAR, " "), (OPEN_VAR, ""), (CONFIG_VAR, "")]).unwrap();

    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_paths_from_environment() {
    let config = config_from(&[(OPEN_VAR, "in.csv"), (SAVE_TO_VAR, "out.csv")]).unwrap();

    assert_eq!(config.open, Some(PathBuf::from("in.csv")));
    assert_eq!(config.save_to, Some(PathBuf::from("out.csv")));
}

#[test]
fn test_config_file_with_partial_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wellsheet.json");
    std::fs::write(
        &path,
        r#"{
            "open": "from-file.csv",
            "save_to": "saved.csv",
            "schema": { "entity": "Well", "default_scenario": null }
        }"#,
    )
    .unwrap();
    let config_path = path.to_string_lossy().to_string();

    let config = config_from(&[
        (CONFIG_VAR, config_path.as_str()),
        (OPEN_VAR, "override.csv"),
    ])
    .unwrap();

    assert_eq!(config.open, Some(PathBuf::from("override.csv")));
    assert_eq!(config.save_to, Some(PathBuf::from("saved.csv")));
    assert_eq!(config.schema.entity, "Well");
    assert_eq!(config.schema.default_scenario, None);
    assert_eq!(config.schema.series, "Time");
    assert_eq!(config.schema.focus_mode, FocusMode::Scenario);
}

#[test]
fn test_config_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wellsheet.json");
    std::fs::write(&path, r#"{ "layout": "parameters" }"#).unwrap();
    let config_path = path.to_string_lossy().to_string();

    let config = config_from(&[(CONFIG_VAR, config_path.as_str())]).unwrap();
    assert_eq!(config.layout, Layout::Parameters);
    assert_eq!(config.schema, TableSchema::parameters());

    let config = config_from(&[
        (CONFIG_VAR, config_path.as_str()),
        (LAYOUT_VAR, "scenarios"),
    ])
    .unwrap();
    assert_eq!(config.layout, Layout::Scenarios);
}

#[test]
fn test_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let config_path = path.to_string_lossy().to_string();

    let result = config_from(&[(CONFIG_VAR, config_path.as_str())]);

    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("absent.json").to_string_lossy().to_string();

    let result = config_from(&[(CONFIG_VAR, config_path.as_str())]);

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}
