/*
[INPUT]:  Console configuration, log buffer, key presses, and store operation results
[OUTPUT]: Supervised TUI sessions, frame rendering, and the in-memory log sink
[POS]:    TUI runtime loop and shared helpers
[UPDATE]: When changing the session loop, crash handling, or layout
*/

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use anyhow::{Context, Result, anyhow};
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::MakeWriter;

use taskdeck_adapter::TaskClient;
use taskdeck_console::{ConsoleConfig, TaskStore};

use super::app::{AppState, OpEvent, StatusLevel};
use super::events::handle_key_event;
use super::terminal::TerminalGuard;
use super::ui::modal::{draw_confirm_delete, draw_history, draw_task_form};
use super::ui::*;

pub(crate) const LOG_BUFFER_CAPACITY: usize = 2000;

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// The most recent `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let start = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(start).cloned().collect()
    }
}

/// `MakeWriter` that turns formatted tracing output into buffer lines.
#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl LogWriter {
    fn push(&self, line: String) {
        let mut guard = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push_line(line);
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial.drain(..=pos);
            self.push(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.push(line);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

pub(super) enum UiEvent {
    Key(KeyEvent),
    Redraw,
    Op(OpEvent),
}

/// Run the TUI until the user quits.
///
/// Each session runs in its own task. A panic inside a session tears down
/// only that session; the user then sees a failure screen whose only action
/// is a full reload with a fresh store.
pub async fn run_tui(config: ConsoleConfig, log_buffer: LogBufferHandle) -> Result<()> {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|panic| {
        error!(panic = %panic, "ui session panicked");
    }));

    let result = supervise_sessions(config, log_buffer).await;

    std::panic::set_hook(previous_hook);
    result
}

async fn supervise_sessions(config: ConsoleConfig, log_buffer: LogBufferHandle) -> Result<()> {
    loop {
        let session = tokio::spawn(run_session(config.clone(), log_buffer.clone()));
        match session.await {
            Ok(result) => return result,
            Err(err) if err.is_panic() => {
                warn!("ui session crashed");
                if !show_failure_screen().await? {
                    return Ok(());
                }
                info!("reloading ui session");
            }
            Err(err) => return Err(anyhow!(err)).context("ui session aborted"),
        }
    }
}

async fn run_session(config: ConsoleConfig, log_buffer: LogBufferHandle) -> Result<()> {
    let client = TaskClient::with_config(config.client_config()).context("create task client")?;
    let store = Arc::new(TaskStore::new(Arc::new(client)));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut terminal = TerminalGuard::new(event_tx.clone())?;
    let mut app = AppState::new(store, event_tx, log_buffer, &config);
    app.refresh();

    let mut tick = tokio::time::interval(config.tick_interval());
    while !app.should_quit {
        tokio::select! {
            _ = tick.tick() => {}
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(UiEvent::Key(key)) => handle_key_event(&mut app, key),
                    Some(UiEvent::Op(op)) => app.apply_op(op),
                    Some(UiEvent::Redraw) => {}
                    None => break,
                }
            }
        }

        app.sync_snapshot();
        terminal.draw(|frame| draw_ui(frame, &mut app))?;
    }

    info!("ui session closed");
    Ok(())
}

/// Returns `true` when the user asked for a reload.
async fn show_failure_screen() -> Result<bool> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut terminal = TerminalGuard::new(event_tx)?;

    loop {
        terminal.draw(draw_failure_screen)?;
        match event_rx.recv().await {
            Some(UiEvent::Key(key)) => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => return Ok(true),
                KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
                _ => {}
            },
            Some(_) => {}
            None => return Ok(false),
        }
    }
}

fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(frame, layout[0], app);

    if app.show_logs {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(layout[1]);
        draw_task_table(frame, body[0], app);
        draw_logs(frame, body[1], &app.log_buffer);
    } else {
        draw_task_table(frame, layout[1], app);
    }

    draw_status(frame, layout[2], app);
    draw_footer(frame, layout[3], app);

    if app.viewer.is_visible() {
        draw_history(frame, centered_rect(area, 80, 80), &app.viewer);
    }
    if app.form.is_open() {
        draw_task_form(frame, centered_rect(area, 60, 50), &app.form);
    }
    if let Some(pending) = app.pending_delete.as_ref() {
        draw_confirm_delete(frame, centered_rect(area, 50, 25), pending);
    }
}

pub(super) fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn key_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub(super) fn status_style(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => Style::default().fg(Color::Gray),
        StatusLevel::Success => Style::default().fg(Color::Green),
        StatusLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}
