mod common;

use pretty_assertions::assert_eq;
use serde_json::Value;

use wellsheet::config::{AppConfig, LAYOUT_VAR, OPEN_VAR, SAVE_TO_VAR};
use wellsheet::io::csv_io;
use wellsheet::state::aggregate::VARYING;
use wellsheet::state::data_model::number_value;
use wellsheet::state::session::{SessionController, UiEvent, ViewState};

fn config_for(vars: Vec<(&'static str, String)>) -> AppConfig {
    AppConfig::from_lookup(|key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.clone())
    })
    .unwrap()
}

#[test]
fn test_e2e_scenario_edit_save_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("scenarios_out.csv");
    let config = config_for(vec![
        (OPEN_VAR, common::fixture_path("scenarios.csv").display().to_string()),
        (SAVE_TO_VAR, out.display().to_string()),
    ]);

    let mut session = SessionController::new(config.schema.clone());
    let table = csv_io::load_csv(config.open.as_deref().unwrap(), &config.schema).unwrap();
    session.load(table);

    session
        .handle(UiEvent::SummaryCellSelected {
            row: Some("P-1".to_string()),
            column: Some("Scenario A".to_string()),
        })
        .unwrap();
    session
        .handle(UiEvent::DetailCellEdited {
            row: Some("1".to_string()),
            column: Some("Value".to_string()),
            value: Some("10".to_string()),
        })
        .unwrap();
    session
        .handle(UiEvent::DetailCellEdited {
            row: Some("0".to_string()),
            column: Some("Variable Name".to_string()),
            value: Some("p1_orat_base".to_string()),
        })
        .unwrap();
    session
        .handle(UiEvent::AddColumnConfirmed {
            name: Some("Scenario B".to_string()),
        })
        .unwrap();
    let frame = session
        .handle(UiEvent::RenderedColumnsChanged {
            columns: vec![
                "Well Name".to_string(),
                "Scenario A".to_string(),
                "Scenario B".to_string(),
            ],
        })
        .unwrap()
        .unwrap();

    assert_eq!(
        frame.summary.columns(),
        &["Well Name", "Scenario A", "Scenario B"]
    );
    assert_eq!(
        frame.summary.cell("P-1", "Scenario A"),
        Some(&Value::Number(10.into()))
    );
    assert_eq!(
        frame.summary.cell("I-1", "Scenario B"),
        Some(&Value::Number(25.into()))
    );

    let mut backend = config.persist_backend();
    session.save(&mut *backend).unwrap();

    let reloaded = csv_io::load_csv(&out, &config.schema).unwrap();
    assert_eq!(Some(&reloaded), session.table());
    assert_eq!(
        reloaded.cell(0, "Variable Name - Scenario A"),
        Some(&Value::String("p1_orat_base".to_string()))
    );
    assert!(!reloaded.has_column("Default Scenario"));
}

#[test]
fn test_e2e_parameter_bulk_update_clears_flags() {
    let config = config_for(vec![(LAYOUT_VAR, "parameters".to_string())]);
    let table = common::load_fixture("parameters.csv", &config.schema);
    let mut session = SessionController::new(config.schema.clone());
    session.load(table);

    let frame = session
        .handle(UiEvent::SummaryCellSelected {
            row: Some("W2".to_string()),
            column: Some("Well Type".to_string()),
        })
        .unwrap()
        .unwrap();
    assert_eq!(frame.detail.unwrap().out_of_bounds, vec![true, false]);

    let frame = session
        .handle(UiEvent::BulkConfirmed {
            column: Some("Initial Value".to_string()),
            value: Some("1.5".to_string()),
        })
        .unwrap()
        .unwrap();
    assert_eq!(frame.detail.unwrap().out_of_bounds, vec![false, false]);
    assert_eq!(
        frame.summary.cell("W2", "Initial Value"),
        Some(&number_value(1.5))
    );

    session.handle(UiEvent::ResetConfirmed).unwrap();
    let frame = session.frame();
    assert_eq!(frame.view, ViewState::BrowsingSummary);
    assert_eq!(
        frame.summary.cell("W2", "Initial Value"),
        Some(&Value::String(VARYING.to_string()))
    );
}

#[test]
fn test_e2e_save_without_target_is_acknowledged() {
    let config = config_for(Vec::new());
    let table = common::load_fixture("scenarios.csv", &config.schema);
    let mut session = SessionController::new(config.schema.clone());
    session.load(table);

    let mut backend = config.persist_backend();
    assert!(session.save(&mut *backend).is_ok());
}
