use dioxus::prelude::*;
use std::path::PathBuf;
use tracing::warn;

use crate::config::AppConfig;
use crate::io::csv_io;
use crate::state::session::{SessionController, UiEvent};

pub fn load_path(
    mut session: Signal<SessionController>,
    mut file_path: Signal<Option<PathBuf>>,
    mut error_message: Signal<Option<String>>,
    path: PathBuf,
) {
    let schema = session.peek().schema().clone();
    match csv_io::load_csv(&path, &schema) {
        Ok(table) => {
            session.with_mut(|state| {
                state.load(table);
            });
            file_path.set(Some(path));
            error_message.set(None);
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load table");
            error_message.set(Some(e.to_string()));
        }
    }
}

pub async fn open_file(
    session: Signal<SessionController>,
    file_path: Signal<Option<PathBuf>>,
    error_message: Signal<Option<String>>,
) {
    let task = rfd::AsyncFileDialog::new()
        .add_filter("CSV", &["csv"])
        .pick_file()
        .await;

    if let Some(handle) = task {
        load_path(session, file_path, error_message, handle.path().to_path_buf());
    }
}

pub fn save_file(
    session: Signal<SessionController>,
    config: Signal<AppConfig>,
    mut error_message: Signal<Option<String>>,
) -> bool {
    let mut backend = config.read().persist_backend();
    let result = session.read().save(&mut *backend);
    match result {
        Ok(()) => {
            error_message.set(None);
            true
        }
        Err(err) => {
            error_message.set(Some(err.to_string()));
            false
        }
    }
}

/// Feeds one event to the session; returns whether anything changed.
pub fn dispatch(
    mut session: Signal<SessionController>,
    mut error_message: Signal<Option<String>>,
    event: UiEvent,
) -> bool {
    match session.with_mut(|state| state.handle(event)) {
        Ok(Some(_)) => {
            error_message.set(None);
            true
        }
        Ok(None) => false,
        Err(err) => {
            error_message.set(Some(err.to_string()));
            false
        }
    }
}
