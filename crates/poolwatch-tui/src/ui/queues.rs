//! Queue view: approximate message depths per SQS queue.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::app::App;

/// Render the queue-metrics table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref snapshot) = app.queues else {
        let placeholder = Paragraph::new("Waiting for the first queue poll...")
            .style(app.theme.dim)
            .block(block.title("Queues"));
        frame.render_widget(placeholder, area);
        return;
    };

    let header = Row::new(vec![
        Cell::from("Queue"),
        Cell::from("Available"),
        Cell::from("In flight"),
        Cell::from("Delayed"),
        Cell::from("Total"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = snapshot
        .queues
        .iter()
        .skip(app.scroll)
        .map(|q| {
            // Anything sitting in a queue is worth a glance; empty queues
            // stay dim.
            let style = if q.total() > 0 {
                Style::default()
            } else {
                app.theme.dim
            };
            Row::new(vec![
                Cell::from(q.name.clone()),
                Cell::from(q.available.to_string()),
                Cell::from(q.in_flight.to_string()),
                Cell::from(q.delayed.to_string()),
                Cell::from(q.total().to_string()),
            ])
            .style(style)
        })
        .collect();

    let title = format!("Queues ({})", snapshot.queues.len());
    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(block.title(title));

    frame.render_widget(table, area);
}
