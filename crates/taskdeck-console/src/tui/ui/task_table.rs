/*
[INPUT]:  AppState store snapshot, selection, and page size
[OUTPUT]: Paged task table rendered into Ratatui frame
[POS]:    TUI UI task table rendering
[UPDATE]: When changing task columns or paging display
*/

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::display::{fit, one_line};
use crate::tui::app::AppState;
use crate::tui::runtime::{border_style, header_style};

const COMMAND_WIDTH: usize = 40;

pub(in crate::tui) fn draw_task_table(frame: &mut ratatui::Frame, area: Rect, app: &mut AppState) {
    let page = app.page();
    let tasks = page.slice(&app.snapshot.tasks);

    let header = Row::new(vec![
        Cell::from("Name / ID"),
        Cell::from("Owner"),
        Cell::from("Command"),
        Cell::from("Executions"),
    ])
    .style(header_style());

    let mut rows = tasks
        .iter()
        .map(|task| {
            let name_cell = Cell::from(vec![
                Line::from(Span::styled(
                    one_line(&task.name),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("ID: {}", task.id),
                    Style::default().fg(Color::DarkGray),
                )),
            ]);
            let executions = if app.snapshot.is_executing(&task.id) {
                Span::styled("running...", Style::default().fg(Color::Yellow))
            } else {
                Span::raw(task.execution_count().to_string())
            };
            Row::new(vec![
                name_cell,
                Cell::from(one_line(&task.owner)),
                Cell::from(Span::styled(
                    fit(&one_line(&task.command), COMMAND_WIDTH),
                    Style::default().fg(Color::Green),
                )),
                Cell::from(executions),
            ])
            .height(2)
        })
        .collect::<Vec<_>>();

    if rows.is_empty() {
        let text = if app.snapshot.loading {
            "Loading tasks..."
        } else if app.snapshot.last_query.is_some() {
            "No tasks match the current search"
        } else {
            "No tasks found. Press [n] to create one."
        };
        rows.push(Row::new(vec![Cell::from(text)]));
    }

    let title = format!("Tasks | {}", page.label("tasks"));
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(15),
            Constraint::Percentage(40),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(title),
    )
    .row_highlight_style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut app.table_state);
}
