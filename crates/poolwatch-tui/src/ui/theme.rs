//! Color theme for the monitor UI.

use ratatui::style::{Color, Modifier, Style};

use poolwatch_core::ExpiryStatus;

/// Color and style theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Style for items that have not expired.
    pub fresh: Style,
    /// Style for items expired within the warning window.
    pub warning: Style,
    /// Style for items expired beyond the warning window.
    pub expired: Style,
    /// Style for header rows in tables.
    pub header: Style,
    /// Color for borders.
    pub border: Color,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Style for the tick-failure banner.
    pub error_banner: Style,
    /// Dim style for hints and metadata.
    pub dim: Style,
}

impl Theme {
    /// Default dark theme.
    pub fn dark() -> Self {
        Self {
            fresh: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            expired: Style::default().fg(Color::Red),
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border: Color::Gray,
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            error_banner: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
        }
    }

    /// Row style for an expiration status.
    ///
    /// The fixed mapping: fresh is green, recently expired yellow, long
    /// expired red.
    pub fn status_style(&self, status: ExpiryStatus) -> Style {
        match status {
            ExpiryStatus::Fresh => self.fresh,
            ExpiryStatus::RecentlyExpired => self.warning,
            ExpiryStatus::LongExpired => self.expired,
        }
    }
}
