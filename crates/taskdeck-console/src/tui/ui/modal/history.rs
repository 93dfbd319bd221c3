/*
[INPUT]:  ExecutionViewer snapshot and current page
[OUTPUT]: Execution history overlay with summary and paged records
[POS]:    TUI UI modal execution history
[UPDATE]: When changing execution record presentation
*/

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use taskdeck_console::ExecutionViewer;

use super::draw_modal_frame;
use crate::display::{fit, one_line};
use crate::tui::runtime::border_style;

const OUTPUT_PREVIEW_LINES: usize = 3;

pub(in crate::tui) fn draw_history(frame: &mut ratatui::Frame, area: Rect, viewer: &ExecutionViewer) {
    let Some(summary) = viewer.summary() else {
        return;
    };
    let inner = draw_modal_frame(frame, area, &format!("Execution History: {}", summary.name));

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(inner);

    let dim = Style::default().fg(Color::DarkGray);
    let header = vec![
        Line::from(vec![Span::styled("Task ID: ", dim), Span::raw(summary.task_id.clone())]),
        Line::from(vec![Span::styled("Owner: ", dim), Span::raw(summary.owner.clone())]),
        Line::from(vec![
            Span::styled("Command: ", dim),
            Span::styled(
                fit(&one_line(&summary.command), inner.width.saturating_sub(10) as usize),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("Total Executions: ", dim),
            Span::raw(summary.total_executions.to_string()),
        ]),
    ];
    frame.render_widget(Paragraph::new(header), layout[0]);

    let page = viewer.page();
    let rows = viewer.page_rows();
    let mut lines = Vec::new();
    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "No executions yet. Press [x] on the task to run it.",
            dim,
        )));
    }
    for row in rows {
        lines.push(Line::from(vec![
            Span::styled(
                format!("#{} ", row.number),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{} -> {}", row.started, row.ended)),
            Span::styled(format!("  {}", row.duration), Style::default().fg(Color::Yellow)),
            Span::styled(format!("  {} chars", row.output_len), dim),
        ]));
        let output_lines = row.output.lines().collect::<Vec<_>>();
        for line in output_lines.iter().take(OUTPUT_PREVIEW_LINES) {
            lines.push(Line::from(format!("    {line}")));
        }
        if output_lines.len() > OUTPUT_PREVIEW_LINES {
            lines.push(Line::from(Span::styled(
                format!("    ... {} more line(s)", output_lines.len() - OUTPUT_PREVIEW_LINES),
                dim,
            )));
        }
    }

    let title = format!(
        "{} | page {}/{}",
        page.label("executions"),
        page.index() + 1,
        page.count()
    );
    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(border_style())
            .title(title),
    );
    frame.render_widget(widget, layout[1]);
}
