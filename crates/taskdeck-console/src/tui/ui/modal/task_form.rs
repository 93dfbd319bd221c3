/*
[INPUT]:  FormController fields, focus, violations, and submit phase
[OUTPUT]: Create/edit task form overlay
[POS]:    TUI UI modal task form
[UPDATE]: When changing form fields or error presentation
*/

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use taskdeck_console::{FormController, TaskField};

use super::draw_modal_frame;
use crate::tui::runtime::key_style;

pub(in crate::tui) fn draw_task_form(frame: &mut ratatui::Frame, area: Rect, form: &FormController) {
    let inner = draw_modal_frame(frame, area, form.title());
    let mut lines = Vec::new();

    for field in TaskField::ALL {
        let focused = field == form.focus();
        let violation = form.violation_for(field);
        let range = field.length();

        let label_style = match violation {
            Some(_) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            None => Style::default().add_modifier(Modifier::BOLD),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} *", field.label()), label_style),
            Span::styled(
                format!("  ({}-{} characters)", range.start(), range.end()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        let value = form.fields().get(field);
        let value_style = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let cursor = if focused && !form.is_submitting() { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{value}{cursor}"), value_style),
        ]));

        if let Some(message) = violation {
            lines.push(Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(""));
    }

    if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    if form.is_submitting() {
        lines.push(Line::from(Span::styled(
            "Saving...",
            Style::default().fg(Color::Cyan),
        )));
    } else {
        let action = if form.mode().is_edit() { " Update  " } else { " Create  " };
        lines.push(Line::from(vec![
            Span::styled("[Enter]", key_style()),
            Span::raw(action),
            Span::styled("[Tab]", key_style()),
            Span::raw(" Next field  "),
            Span::styled("[Esc]", key_style()),
            Span::raw(" Cancel"),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
