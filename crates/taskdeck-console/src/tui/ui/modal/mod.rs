/*
[INPUT]:  Form, viewer, and pending-delete state from AppState
[OUTPUT]: Overlay rendering for the task form, history, and delete confirmation
[POS]:    TUI UI modal module root
[UPDATE]: When adding overlays or changing the shared modal frame
*/

mod confirm;
mod history;
mod task_form;

pub(in crate::tui) use confirm::draw_confirm_delete;
pub(in crate::tui) use history::draw_history;
pub(in crate::tui) use task_form::draw_task_form;

use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Clear};

use crate::tui::runtime::border_style;

/// Clear `area`, draw a titled border, and return the inner area.
fn draw_modal_frame(frame: &mut ratatui::Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(format!(" {title} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}
