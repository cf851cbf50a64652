//! Work-pool view: every item with its expiration status.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::app::App;

/// Render the work-pool table with status-colored rows.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref snapshot) = app.pool else {
        let placeholder = Paragraph::new("Waiting for the first scan...")
            .style(app.theme.dim)
            .block(titled_block(app, "Work Pool"));
        frame.render_widget(placeholder, area);
        return;
    };

    let header = Row::new(vec![
        Cell::from("Entity"),
        Cell::from("UID"),
        Cell::from("Expires (UTC)"),
        Cell::from("Elapsed"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = snapshot
        .rows
        .iter()
        .skip(app.scroll)
        .map(|row| {
            Row::new(vec![
                Cell::from(row.item.entity_name.clone()),
                Cell::from(row.item.uid.clone()),
                Cell::from(format_expiry(row.item.expires)),
                Cell::from(row.elapsed.clone()),
                Cell::from(row.status.label()),
            ])
            .style(app.theme.status_style(row.status))
        })
        .collect();

    let title = format!("Work Pool ({} items)", snapshot.rows.len());
    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(24),
            Constraint::Length(20),
            Constraint::Length(10),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(titled_block(app, &title));

    // Reserve one line for the skipped-record warning when there is one.
    if snapshot.invalid.is_empty() {
        frame.render_widget(table, area);
    } else {
        let table_area = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        let warn_area = Rect {
            y: area.y + table_area.height,
            height: area.height - table_area.height,
            ..area
        };

        frame.render_widget(table, table_area);

        let first = &snapshot.invalid[0];
        let warning = Paragraph::new(Line::from(format!(
            "{} record(s) skipped, e.g. {}: {}",
            snapshot.invalid.len(),
            first.key,
            first.reason
        )))
        .style(app.theme.warning);
        frame.render_widget(warning, warn_area);
    }
}

fn titled_block(app: &App, title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(title.to_string())
}

/// Format the expiry instant, UTC.
fn format_expiry(epoch: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "invalid".to_string())
}
