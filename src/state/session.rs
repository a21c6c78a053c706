use serde_json::Value;
use tracing::{debug, info, warn};

use crate::io::persist::{Persist, PersistError};
use crate::state::aggregate::{self, SummaryTable};
use crate::state::bounds;
use crate::state::data_model::{self, DetailTable, FocusMode, Row, TableSchema, VALUE_HEADER};
use crate::state::reconcile::{self, Edit, EditError, EditReconciler, Focus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    Initial,
    BrowsingSummary,
    EditingDetail(Focus),
}

/// Inbound presentation events. Every payload field may be missing.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    SummaryCellSelected {
        row: Option<String>,
        column: Option<String>,
    },
    DetailCellEdited {
        row: Option<String>,
        column: Option<String>,
        value: Option<String>,
    },
    BulkConfirmed {
        column: Option<String>,
        value: Option<String>,
    },
    AddColumnConfirmed {
        name: Option<String>,
    },
    /// The column names the summary table currently renders.
    RenderedColumnsChanged {
        columns: Vec<String>,
    },
    ResetConfirmed,
}

/// The focused well's rows as the detail editor shows them.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub entity: String,
    pub scenario: Option<String>,
    pub columns: Vec<String>,
    pub editable: Vec<String>,
    /// Projected rows; each keeps the table's id column as its row key.
    pub rows: Vec<Row>,
    pub flagged_column: Option<String>,
    pub out_of_bounds: Vec<bool>,
}

impl DetailView {
    pub fn is_flagged(&self, row_index: usize, column: &str) -> bool {
        self.flagged_column.as_deref() == Some(column)
            && self.out_of_bounds.get(row_index).copied().unwrap_or(false)
    }
}

/// Everything the presentation layer needs to draw one state.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderFrame {
    pub view: ViewState,
    pub summary: SummaryTable,
    pub detail: Option<DetailView>,
    pub focus: Focus,
}

/// The table and selection owned by one session.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SessionState {
    pub table: DetailTable,
    pub focus: Focus,
}

#[derive(Clone, Debug)]
struct Loaded {
    original: DetailTable,
    state: SessionState,
}

/// Drives one session: turns UI events into edits and edits into frames.
#[derive(Clone, Debug)]
pub struct SessionController {
    schema: TableSchema,
    loaded: Option<Loaded>,
    view: ViewState,
}

impl SessionController {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            loaded: None,
            view: ViewState::Initial,
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.loaded.as_ref().map(|loaded| &loaded.state)
    }

    pub fn table(&self) -> Option<&DetailTable> {
        self.state().map(|state| &state.table)
    }

    pub fn focus(&self) -> Focus {
        self.state()
            .map(|state| state.focus.clone())
            .unwrap_or_default()
    }

    /// Starts (or restarts) the session from a freshly loaded table.
    pub fn load(&mut self, table: DetailTable) -> RenderFrame {
        info!(
            rows = table.len(),
            columns = table.columns().len(),
            "session loaded"
        );
        self.loaded = Some(Loaded {
            original: table.clone(),
            state: SessionState {
                table,
                focus: Focus::default(),
            },
        });
        self.view = ViewState::BrowsingSummary;
        self.frame()
    }

    /// Handles one event. `Ok(None)` means the event was not actionable; on `Err` the
    /// session is left exactly as it was.
    pub fn handle(&mut self, event: UiEvent) -> Result<Option<RenderFrame>, EditError> {
        debug!(?event, "ui event");
        if self.loaded.is_none() {
            return Ok(None);
        }

        match event {
            UiEvent::SummaryCellSelected { row, column } => self.select(row, column),
            UiEvent::DetailCellEdited { row, column, value } => {
                let (Some(row), Some(column), Some(value)) = (row, column, value) else {
                    return Ok(None);
                };
                if !self.schema.editable.contains(&column)
                    || self.unchanged(&row, &column, &value)
                {
                    return Ok(None);
                }
                self.apply(vec![Edit::Cell {
                    row_key: row,
                    column,
                    value,
                }])
            }
            UiEvent::BulkConfirmed { column, value } => {
                let Some(raw) = value.filter(|raw| !raw.trim().is_empty()) else {
                    return Ok(None);
                };
                let column = match (column, self.schema.focus_mode) {
                    (Some(column), _) => column,
                    (None, FocusMode::Scenario) => VALUE_HEADER.to_string(),
                    (None, FocusMode::Entity) => return Ok(None),
                };
                let constant = parse_constant(&raw).ok_or(EditError::InvalidValue(raw))?;
                self.apply(vec![Edit::BulkConstant { column, constant }])
            }
            UiEvent::AddColumnConfirmed { name } => {
                let Some(name) = name.filter(|name| !name.trim().is_empty()) else {
                    return Ok(None);
                };
                self.apply(vec![Edit::ColumnAdd { name }])
            }
            UiEvent::RenderedColumnsChanged { columns } => {
                let Some(table) = self.table() else {
                    return Ok(None);
                };
                let doomed = reconcile::columns_to_delete(table, &self.schema, &columns);
                if doomed.is_empty() {
                    return Ok(None);
                }
                self.apply(
                    doomed
                        .into_iter()
                        .map(|column| Edit::ColumnDelete { column })
                        .collect(),
                )
            }
            UiEvent::ResetConfirmed => self.apply(vec![Edit::Reset]),
        }
    }

    /// Whether the add-column dialog may be confirmed with `name`.
    pub fn can_add_column(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.schema.is_label_column(name) {
            return false;
        }
        self.table()
            .map(|table| table.find_column_ignore_case(name).is_none())
            .unwrap_or(false)
    }

    pub fn frame(&self) -> RenderFrame {
        let summary = self
            .table()
            .map(|table| aggregate::summarize(table, &self.schema))
            .unwrap_or_default();
        RenderFrame {
            view: self.view.clone(),
            summary,
            detail: self.detail_view(),
            focus: self.focus(),
        }
    }

    pub fn detail_view(&self) -> Option<DetailView> {
        let state = self.state()?;
        let entity = state.focus.entity.clone()?;
        let rows = state.table.entity_row_indices(&self.schema, &entity);

        match self.schema.focus_mode {
            FocusMode::Scenario => {
                let scenario = state.focus.column.clone()?;
                Some(self.scenario_view(&state.table, entity, scenario, &rows))
            }
            FocusMode::Entity => Some(self.entity_view(&state.table, entity, &rows)),
        }
    }

    /// Hands the current table to a persistence backend.
    pub fn save(&self, backend: &mut dyn Persist) -> Result<(), PersistError> {
        let table = self.table().ok_or(PersistError::NothingLoaded)?;
        backend.persist(table)?;
        info!(rows = table.len(), "session saved");
        Ok(())
    }

    fn select(
        &mut self,
        row: Option<String>,
        column: Option<String>,
    ) -> Result<Option<RenderFrame>, EditError> {
        let Some(table) = self.table() else {
            return Ok(None);
        };
        let Some(entity) = row else {
            return Ok(None);
        };

        let focus = match self.schema.focus_mode {
            FocusMode::Scenario => {
                let Some(column) = column else {
                    return Ok(None);
                };
                if self.schema.is_structural(&column) {
                    return Ok(None);
                }
                if !table.value_columns(&self.schema).contains(&column) {
                    return Err(EditError::UnknownColumn(column));
                }
                Focus::scenario(entity, column)
            }
            FocusMode::Entity => Focus::entity(entity),
        };

        if let Some(entity) = focus.entity.as_deref() {
            if !table.has_entity(&self.schema, entity) {
                return Err(EditError::UnknownRow(entity.to_string()));
            }
        }

        debug!(?focus, "focus changed");
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.state.focus = focus.clone();
        }
        self.view = ViewState::EditingDetail(focus);
        Ok(Some(self.frame()))
    }

    /// Applies `edits` in order to a working copy and commits only if all succeed.
    fn apply(&mut self, edits: Vec<Edit>) -> Result<Option<RenderFrame>, EditError> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Ok(None);
        };

        let reconciler = EditReconciler::new(&self.schema, &loaded.original);
        let mut next = loaded.state.clone();
        for edit in &edits {
            let applied = reconciler
                .apply(&next.table, &next.focus, edit)
                .inspect_err(|err| warn!(?edit, %err, "edit rejected"))?;
            match edit {
                Edit::Reset => info!("table reset to original"),
                Edit::ColumnAdd { name } => info!(column = %name.trim(), "column added"),
                Edit::ColumnDelete { column } => info!(%column, "column deleted"),
                Edit::Cell { .. } | Edit::BulkConstant { .. } => {
                    debug!(rows = applied.affected.len(), "cells written")
                }
            }
            next.table = applied.table;
            next.focus = applied.focus;
        }

        self.view = view_for(&self.schema, &next.focus);
        loaded.state = next;
        Ok(Some(self.frame()))
    }

    /// True when the focused detail row already shows exactly `raw` in `column`.
    fn unchanged(&self, row_key: &str, column: &str, raw: &str) -> bool {
        let Some(detail) = self.detail_view() else {
            return false;
        };
        let key = row_key.trim();
        detail
            .rows
            .iter()
            .find(|row| {
                row.get(&self.schema.id).map(data_model::display_value).as_deref() == Some(key)
            })
            .and_then(|row| row.get(column))
            .map(|current| data_model::edit_text(current) == raw)
            .unwrap_or(false)
    }

    fn scenario_view(
        &self,
        table: &DetailTable,
        entity: String,
        scenario: String,
        rows: &[usize],
    ) -> DetailView {
        let schema = &self.schema;
        let label_column = schema.label_column_for(table, &scenario);

        let mut columns = vec![schema.label.clone(), schema.series.clone()];
        if let Some(control) = schema.control.as_ref().filter(|col| table.has_column(col)) {
            columns.push(control.clone());
        }
        columns.push(VALUE_HEADER.to_string());

        let projected: Vec<Row> = rows
            .iter()
            .filter_map(|idx| table.rows().get(*idx))
            .map(|source| {
                let mut row = Row::new();
                row.insert(schema.id.clone(), cell_or_null(source, &schema.id));
                row.insert(schema.label.clone(), cell_or_null(source, &label_column));
                row.insert(schema.series.clone(), cell_or_null(source, &schema.series));
                if let Some(control) = schema.control.as_ref() {
                    row.insert(control.clone(), cell_or_null(source, control));
                }
                row.insert(VALUE_HEADER.to_string(), cell_or_null(source, &scenario));
                row.insert(schema.lower_bound.clone(), cell_or_null(source, &schema.lower_bound));
                row.insert(schema.upper_bound.clone(), cell_or_null(source, &schema.upper_bound));
                row
            })
            .collect();

        self.finish_view(entity, Some(scenario), columns, projected)
    }

    fn entity_view(&self, table: &DetailTable, entity: String, rows: &[usize]) -> DetailView {
        let schema = &self.schema;

        let mut columns = Vec::new();
        if table.has_column(&schema.label) {
            columns.push(schema.label.clone());
        }
        columns.push(schema.series.clone());
        columns.extend(table.value_columns(schema));
        columns.push(schema.lower_bound.clone());
        columns.push(schema.upper_bound.clone());

        let projected = rows
            .iter()
            .filter_map(|idx| table.rows().get(*idx).cloned())
            .collect();

        self.finish_view(entity, None, columns, projected)
    }

    fn finish_view(
        &self,
        entity: String,
        scenario: Option<String>,
        columns: Vec<String>,
        rows: Vec<Row>,
    ) -> DetailView {
        let flagged_column = self.schema.bounded.clone();
        let out_of_bounds = flagged_column
            .as_deref()
            .map(|col| bounds::flag_rows(&rows, col, &self.schema))
            .unwrap_or_else(|| vec![false; rows.len()]);
        let editable = self
            .schema
            .editable
            .iter()
            .filter(|col| columns.contains(col))
            .cloned()
            .collect();

        DetailView {
            entity,
            scenario,
            columns,
            editable,
            rows,
            flagged_column,
            out_of_bounds,
        }
    }
}

/// Parses the bulk-update constant; only finite numbers qualify.
pub fn parse_constant(raw: &str) -> Option<f64> {
    data_model::parse_number(raw)
}

fn cell_or_null(row: &Row, column: &str) -> Value {
    row.get(column).cloned().unwrap_or(Value::Null)
}

fn view_for(schema: &TableSchema, focus: &Focus) -> ViewState {
    let focused = match schema.focus_mode {
        FocusMode::Scenario => focus.entity.is_some() && focus.column.is_some(),
        FocusMode::Entity => focus.entity.is_some(),
    };
    if focused {
        ViewState::EditingDetail(focus.clone())
    } else {
        ViewState::BrowsingSummary
    }
}
