use chrono::{DateTime, Utc};

use poolwatch_core::CoreError;

/// One structured event per poll tick, published to the presentation layer.
///
/// Deliveries are strictly sequential: the loop produces exactly one event
/// per tick and never overlaps batches.
#[derive(Debug)]
pub enum PollEvent<T> {
    /// The tick succeeded; carries the full new batch.
    Update(T),

    /// The tick failed; the previous good batch stays on screen.
    Failed {
        observed_at: DateTime<Utc>,
        error: CoreError,
    },
}
