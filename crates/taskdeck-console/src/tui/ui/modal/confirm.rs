/*
[INPUT]:  Task pending deletion
[OUTPUT]: Delete confirmation overlay
[POS]:    TUI UI modal delete confirmation
[UPDATE]: When changing the confirmation wording
*/

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::draw_modal_frame;
use crate::tui::app::PendingDelete;
use crate::tui::runtime::key_style;

pub(in crate::tui) fn draw_confirm_delete(
    frame: &mut ratatui::Frame,
    area: Rect,
    pending: &PendingDelete,
) {
    let inner = draw_modal_frame(frame, area, "Delete Task");
    let lines = vec![
        Line::from(vec![
            Span::raw("Delete "),
            Span::styled(
                pending.name.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" ({})?", pending.id)),
        ]),
        Line::from(Span::styled(
            "This action cannot be undone.",
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", key_style()),
            Span::raw(" Delete  "),
            Span::styled("[n]", key_style()),
            Span::raw(" Cancel"),
        ]),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, inner);
}
