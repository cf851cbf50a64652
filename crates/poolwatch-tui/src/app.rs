//! Application state for the monitor UI.

use poolwatch_core::{ClassifiedSnapshot, QueueSnapshot};
use poolwatch_poller::PollEvent;

use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Work-pool items with expiration status.
    WorkPool,
    /// SQS queue depths.
    Queues,
}

impl View {
    /// Cycle to the other view.
    pub fn next(self) -> Self {
        match self {
            View::WorkPool => View::Queues,
            View::Queues => View::WorkPool,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::WorkPool => "Work Pool",
            View::Queues => "Queues",
        }
    }
}

/// Main application state.
///
/// Each data plane keeps its last good snapshot and its last tick error
/// separately: a failed tick leaves the previous snapshot on screen and
/// raises an inline banner instead of blanking the table.
pub struct App {
    pub running: bool,
    pub view: View,

    pub pool: Option<ClassifiedSnapshot>,
    pub pool_error: Option<String>,
    pub pool_source: String,

    pub queues: Option<QueueSnapshot>,
    pub queue_error: Option<String>,
    pub queue_source: String,

    pub scroll: usize,
    pub theme: Theme,
}

impl App {
    pub fn new(view: View, pool_source: String, queue_source: String) -> Self {
        Self {
            running: true,
            view,
            pool: None,
            pool_error: None,
            pool_source,
            queues: None,
            queue_error: None,
            queue_source,
            scroll: 0,
            theme: Theme::dark(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn next_view(&mut self) {
        self.view = self.view.next();
        self.scroll = 0;
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.scroll = 0;
        }
    }

    /// Apply one work-pool poll event.
    pub fn apply_pool_event(&mut self, event: PollEvent<ClassifiedSnapshot>) {
        match event {
            PollEvent::Update(snapshot) => {
                self.pool = Some(snapshot);
                self.pool_error = None;
            }
            PollEvent::Failed { observed_at, error } => {
                self.pool_error =
                    Some(format!("{} ({})", error, observed_at.format("%H:%M:%S UTC")));
            }
        }
        self.clamp_scroll();
    }

    /// Apply one queue-metrics poll event.
    pub fn apply_queue_event(&mut self, event: PollEvent<QueueSnapshot>) {
        match event {
            PollEvent::Update(snapshot) => {
                self.queues = Some(snapshot);
                self.queue_error = None;
            }
            PollEvent::Failed { observed_at, error } => {
                self.queue_error =
                    Some(format!("{} ({})", error, observed_at.format("%H:%M:%S UTC")));
            }
        }
        self.clamp_scroll();
    }

    /// Number of rows in the active view's table.
    pub fn row_count(&self) -> usize {
        match self.view {
            View::WorkPool => self.pool.as_ref().map_or(0, |s| s.rows.len()),
            View::Queues => self.queues.as_ref().map_or(0, |s| s.queues.len()),
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll += 1;
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let max = self.row_count().saturating_sub(1);
        if self.scroll > max {
            self.scroll = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use poolwatch_core::{CoreError, Snapshot, WorkItem};

    use super::*;

    fn classified(uid: &str) -> ClassifiedSnapshot {
        Snapshot::new(
            Utc::now(),
            vec![WorkItem {
                entity_name: "converter".into(),
                uid: uid.into(),
                expires: Utc::now().timestamp() + 60,
            }],
            Vec::new(),
        )
        .classify()
    }

    #[test]
    fn update_replaces_snapshot_and_clears_error() {
        let mut app = App::new(View::WorkPool, "test".into(), "test".into());
        app.pool_error = Some("stale error".into());

        app.apply_pool_event(PollEvent::Update(classified("a")));

        assert!(app.pool_error.is_none());
        assert_eq!(app.pool.as_ref().unwrap().rows[0].item.uid, "a");
    }

    #[test]
    fn failed_tick_keeps_last_good_snapshot() {
        let mut app = App::new(View::WorkPool, "test".into(), "test".into());
        app.apply_pool_event(PollEvent::Update(classified("a")));

        app.apply_pool_event(PollEvent::Failed {
            observed_at: Utc::now(),
            error: CoreError::Unavailable("dynamodb down".into()),
        });

        assert_eq!(app.pool.as_ref().unwrap().rows[0].item.uid, "a");
        assert!(app.pool_error.as_ref().unwrap().contains("dynamodb down"));
    }

    #[test]
    fn view_cycles_and_resets_scroll() {
        let mut app = App::new(View::WorkPool, "test".into(), "test".into());
        app.scroll = 3;

        app.next_view();
        assert_eq!(app.view, View::Queues);
        assert_eq!(app.scroll, 0);

        app.next_view();
        assert_eq!(app.view, View::WorkPool);
    }

    #[test]
    fn scroll_clamps_to_rows() {
        let mut app = App::new(View::WorkPool, "test".into(), "test".into());
        app.apply_pool_event(PollEvent::Update(classified("a")));

        app.scroll_down();
        app.scroll_down();
        assert_eq!(app.scroll, 0);

        app.scroll_up();
        assert_eq!(app.scroll, 0);
    }
}
