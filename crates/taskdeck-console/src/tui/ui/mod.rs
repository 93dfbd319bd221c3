/*
[INPUT]:  TUI app state and store snapshots for UI components
[OUTPUT]: UI component render functions and module exports
[POS]:    TUI UI module root
[UPDATE]: When adding panels or overlays
*/

mod chrome;
mod crash;
mod logs;
mod task_table;

pub mod modal;

pub(in crate::tui) use chrome::{draw_footer, draw_header, draw_status};
pub(in crate::tui) use crash::draw_failure_screen;
pub(in crate::tui) use logs::draw_logs;
pub(in crate::tui) use task_table::draw_task_table;
