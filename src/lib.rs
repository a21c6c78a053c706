//! Well scenario table editor: a per-well summary over a detailed time-step table,
//! with cell, bulk and column edits reconciled back into one session state.

pub mod config;
pub mod io;
pub mod state;
pub mod ui;
