use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, View};

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // View switching
        KeyCode::Tab => app.next_view(),
        KeyCode::Char('1') => app.set_view(View::WorkPool),
        KeyCode::Char('2') => app.set_view(View::Queues),

        // Scrolling
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Home => app.scroll = 0,

        _ => {}
    }
}
