//! Rendering for the monitor UI: tab bar, active view, status footer.

mod queues;
mod theme;
mod workpool;

pub use theme::Theme;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};

use crate::app::{App, View};

/// Render the whole frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    match app.view {
        View::WorkPool => workpool::render(frame, app, chunks[1]),
        View::Queues => queues::render(frame, app, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = [View::WorkPool, View::Queues]
        .iter()
        .map(|v| Line::from(format!(" {} ", v.label())))
        .collect::<Vec<_>>();

    let selected = match app.view {
        View::WorkPool => 0,
        View::Queues => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active);

    frame.render_widget(tabs, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let (source, observed_at, error) = match app.view {
        View::WorkPool => (
            app.pool_source.as_str(),
            app.pool.as_ref().map(|s| s.observed_at),
            app.pool_error.as_deref(),
        ),
        View::Queues => (
            app.queue_source.as_str(),
            app.queues.as_ref().map(|s| s.observed_at),
            app.queue_error.as_deref(),
        ),
    };

    let mut status = vec![Span::styled(source.to_string(), app.theme.dim)];
    if let Some(at) = observed_at {
        status.push(Span::styled(
            format!("  observed {}", at.format("%H:%M:%S UTC")),
            app.theme.dim,
        ));
    }
    if let Some(error) = error {
        status.push(Span::styled(
            format!("  last tick failed: {error}"),
            app.theme.error_banner,
        ));
    }

    let hints = Line::from(Span::styled(
        "q quit | Tab/1/2 view | j/k scroll",
        app.theme.dim,
    ));

    let footer = Paragraph::new(vec![Line::from(status), hints]);
    frame.render_widget(footer, area);
}
