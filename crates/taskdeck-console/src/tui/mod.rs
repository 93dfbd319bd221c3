/*
[INPUT]:  Console configuration, shared TaskStore, and the log buffer
[OUTPUT]: Ratatui-based TUI for browsing, editing, and executing tasks
[POS]:    TUI module for the taskdeck binary
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

mod app;
mod events;
mod runtime;
mod terminal;
mod ui;

pub(crate) use runtime::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory, run_tui};
