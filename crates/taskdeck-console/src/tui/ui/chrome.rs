/*
[INPUT]:  AppState service location, search line, loading flag, status message
[OUTPUT]: Header, status line, and hotkey footer rendered into Ratatui frame
[POS]:    TUI UI frame chrome around the task table
[UPDATE]: When changing hotkeys or status presentation
*/

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::AppState;
use crate::tui::runtime::{border_style, header_style, key_style, status_style};

pub(in crate::tui) fn draw_header(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let mut spans = vec![
        Span::styled(" Task Manager ", header_style()),
        Span::raw("  "),
        Span::styled(app.base_url.as_str(), Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
    ];

    if app.search.editing {
        spans.push(Span::raw("Search: "));
        spans.push(Span::styled(
            format!("{}_", app.search.input),
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    } else if let Some(query) = app.snapshot.last_query.as_deref() {
        spans.push(Span::styled(
            format!("Filter: \"{query}\" (Esc clears)"),
            Style::default().fg(Color::Yellow),
        ));
    }

    if app.snapshot.loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "Loading...",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style()),
    );
    frame.render_widget(widget, area);
}

pub(in crate::tui) fn draw_status(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let widget = Paragraph::new(Span::styled(
        app.status.text.as_str(),
        status_style(app.status.level),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Status"),
    );
    frame.render_widget(widget, area);
}

pub(in crate::tui) fn draw_footer(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let bindings: &[(&str, &str)] = if app.form.is_submitting() {
        &[("[Ctrl-C]", "Quit")]
    } else if app.form.is_open() {
        &[
            ("[Tab]", "Next field"),
            ("[Enter]", "Save"),
            ("[Esc]", "Cancel"),
        ]
    } else if app.pending_delete.is_some() {
        &[("[y]", "Delete"), ("[n]", "Keep")]
    } else if app.viewer.is_visible() {
        &[("[Left/Right]", "Page"), ("[Esc]", "Close")]
    } else if app.search.editing {
        &[("[Enter]", "Search"), ("[Esc]", "Stop editing")]
    } else {
        &[
            ("[Up/Down]", "Select"),
            ("[Left/Right]", "Page"),
            ("[/]", "Search"),
            ("[n]", "New"),
            ("[e]", "Edit"),
            ("[d]", "Delete"),
            ("[x]", "Execute"),
            ("[h]", "History"),
            ("[r]", "Refresh"),
            ("[l]", "Logs"),
            ("[q]", "Quit"),
        ]
    };

    let spans = bindings
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(*key, key_style()),
                Span::raw(format!(" {label}  ")),
            ]
        })
        .collect::<Vec<_>>();

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Hotkeys"),
    );
    frame.render_widget(widget, area);
}
