/*
[INPUT]:  None (static content)
[OUTPUT]: Generic failure screen shown after a UI session crashed
[POS]:    TUI UI top-level error screen
[UPDATE]: When changing the crash recovery wording
*/

use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::tui::runtime::{centered_rect, key_style};

pub(in crate::tui) fn draw_failure_screen(frame: &mut ratatui::Frame) {
    let area = centered_rect(frame.area(), 60, 40);
    let lines = vec![
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("The interface hit an unexpected error and was stopped."),
        Line::from("Reloading starts over with a fresh task list from the server."),
        Line::from(""),
        Line::from(vec![
            Span::styled("[r]", key_style()),
            Span::raw(" Reload  "),
            Span::styled("[q]", key_style()),
            Span::raw(" Quit"),
        ]),
    ];

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Error"),
        );
    frame.render_widget(widget, area);
}
