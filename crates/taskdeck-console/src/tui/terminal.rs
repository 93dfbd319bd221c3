/*
[INPUT]:  Crossterm stdout, raw mode, and the session's UI event sender
[OUTPUT]: TerminalGuard owning the alternate screen and the input pump
[POS]:    TUI terminal lifecycle guard
[UPDATE]: When changing how the terminal is entered, polled, or restored
*/

use std::io;
use std::time::Duration;

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::crossterm::{ExecutableCommand, terminal};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::runtime::UiEvent;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Raw-mode alternate screen plus a blocking thread that forwards key
/// presses. Dropping the guard (including while unwinding) stops the pump
/// and restores the terminal.
pub(super) struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    input_shutdown: CancellationToken,
}

impl TerminalGuard {
    pub(super) fn new(events: UnboundedSender<UiEvent>) -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let input_shutdown = CancellationToken::new();
        spawn_input_pump(events, input_shutdown.clone());
        Ok(Self {
            terminal,
            input_shutdown,
        })
    }

    pub(super) fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.input_shutdown.cancel();
        let _ = self.terminal.show_cursor();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn spawn_input_pump(events: UnboundedSender<UiEvent>, shutdown: CancellationToken) {
    tokio::task::spawn_blocking(move || {
        while !shutdown.is_cancelled() {
            if !event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                continue;
            }
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if events.send(UiEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    let _ = events.send(UiEvent::Redraw);
                }
                _ => {}
            }
        }
    });
}
