use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WorkItem
// ---------------------------------------------------------------------------

/// A work-pool item as read from DynamoDB.
///
/// The monitor only observes these; it never writes them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Name of the entity being converted.
    pub entity_name: String,

    /// Unique item identifier (the table's primary key).
    pub uid: String,

    /// Unix epoch seconds at which the item's lease expires.
    pub expires: i64,
}

/// A per-record problem found while decoding a scan page.
///
/// The record itself is dropped from the snapshot; the warning travels with
/// the batch so the UI can say how many rows were skipped and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordWarning {
    /// Primary key of the offending item, or `<unknown>` if even that was
    /// missing.
    pub key: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One point-in-time batch of work-pool items.
///
/// Produced once per poll tick and never mutated afterwards; every tick
/// replaces the previous snapshot wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the scan completed, in UTC.
    pub observed_at: DateTime<Utc>,

    /// Items sorted by `expires` ascending (closest to expiring first).
    pub items: Vec<WorkItem>,

    /// Records that could not be decoded and were skipped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid: Vec<RecordWarning>,
}

impl Snapshot {
    /// Build a snapshot from decoded items, sorting by expiry.
    pub fn new(observed_at: DateTime<Utc>, mut items: Vec<WorkItem>, invalid: Vec<RecordWarning>) -> Self {
        items.sort_by_key(|item| item.expires);
        Self {
            observed_at,
            items,
            invalid,
        }
    }

    /// Derive the status of every item against `observed_at`.
    pub fn classify(self) -> ClassifiedSnapshot {
        let now = self.observed_at.timestamp();
        let rows = self
            .items
            .into_iter()
            .map(|item| {
                let status = ExpiryStatus::classify(item.expires, now);
                let elapsed = format_elapsed(now, item.expires);
                ClassifiedItem {
                    item,
                    status,
                    elapsed,
                }
            })
            .collect();

        ClassifiedSnapshot {
            observed_at: self.observed_at,
            rows,
            invalid: self.invalid,
        }
    }
}

// ---------------------------------------------------------------------------
// ExpiryStatus (derived, not stored)
// ---------------------------------------------------------------------------

/// How long an item may stay expired before it counts as long-expired.
pub const RECENT_EXPIRY_WINDOW_SECS: i64 = 10;

/// Derived expiration status -- not stored anywhere.
///
/// - `Fresh`: `now <= expires`
/// - `RecentlyExpired`: expired for at most [`RECENT_EXPIRY_WINDOW_SECS`]
/// - `LongExpired`: expired for longer than that
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Fresh,
    RecentlyExpired,
    LongExpired,
}

impl ExpiryStatus {
    /// Derive the status of an item at a given point in time.
    ///
    /// Pure function of its two arguments; an item observed exactly at its
    /// expiry instant is still `Fresh`, and the window boundary is inclusive
    /// (expired for exactly 10 seconds is `RecentlyExpired`).
    pub fn classify(expires: i64, now: i64) -> Self {
        if now <= expires {
            Self::Fresh
        } else if now - expires <= RECENT_EXPIRY_WINDOW_SECS {
            Self::RecentlyExpired
        } else {
            Self::LongExpired
        }
    }

    /// Short display label for table cells.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::RecentlyExpired => "recently expired",
            Self::LongExpired => "expired",
        }
    }
}

/// Format the time elapsed since expiry as `HH:MM:SS`.
///
/// Items that have not yet expired clamp to `00:00:00`. Hours pad to two
/// digits but are not truncated beyond that.
pub fn format_elapsed(now: i64, expires: i64) -> String {
    let elapsed = (now - expires).max(0);
    let hours = elapsed / 3600;
    let minutes = (elapsed % 3600) / 60;
    let seconds = elapsed % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

// ---------------------------------------------------------------------------
// ClassifiedSnapshot
// ---------------------------------------------------------------------------

/// A work-pool item together with its derived status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedItem {
    #[serde(flatten)]
    pub item: WorkItem,
    pub status: ExpiryStatus,
    /// Time since expiry, `HH:MM:SS`, clamped to zero pre-expiry.
    pub elapsed: String,
}

/// The full classified batch handed to the presentation layer, one per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedSnapshot {
    pub observed_at: DateTime<Utc>,
    pub rows: Vec<ClassifiedItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid: Vec<RecordWarning>,
}

// ---------------------------------------------------------------------------
// Queue metrics
// ---------------------------------------------------------------------------

/// Approximate message counts for one SQS queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub name: String,
    pub url: String,
    /// `ApproximateNumberOfMessages`.
    pub available: u64,
    /// `ApproximateNumberOfMessagesNotVisible`.
    pub in_flight: u64,
    /// `ApproximateNumberOfMessagesDelayed`.
    pub delayed: u64,
}

impl QueueStats {
    /// Sum of all message counts.
    pub fn total(&self) -> u64 {
        self.available + self.in_flight + self.delayed
    }
}

/// One point-in-time batch of queue metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub observed_at: DateTime<Utc>,
    pub queues: Vec<QueueStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // -- ExpiryStatus tests --

    /// 12:00:00 UTC on an arbitrary day, as epoch seconds.
    fn noon() -> i64 {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap().timestamp()
    }

    #[test]
    fn not_yet_expired_is_fresh() {
        assert_eq!(ExpiryStatus::classify(noon() + 30, noon()), ExpiryStatus::Fresh);
    }

    #[test]
    fn exactly_at_expiry_is_fresh() {
        assert_eq!(ExpiryStatus::classify(noon(), noon()), ExpiryStatus::Fresh);
    }

    #[test]
    fn five_seconds_past_is_recently_expired() {
        assert_eq!(
            ExpiryStatus::classify(noon(), noon() + 5),
            ExpiryStatus::RecentlyExpired
        );
    }

    #[test]
    fn window_boundary_is_inclusive() {
        assert_eq!(
            ExpiryStatus::classify(noon(), noon() + RECENT_EXPIRY_WINDOW_SECS),
            ExpiryStatus::RecentlyExpired
        );
    }

    #[test]
    fn eleven_seconds_past_is_long_expired() {
        assert_eq!(
            ExpiryStatus::classify(noon(), noon() + 11),
            ExpiryStatus::LongExpired
        );
    }

    #[test]
    fn classify_is_deterministic() {
        let first = ExpiryStatus::classify(noon(), noon() + 7);
        for _ in 0..10 {
            assert_eq!(ExpiryStatus::classify(noon(), noon() + 7), first);
        }
    }

    // -- format_elapsed tests --

    #[test]
    fn elapsed_clamps_before_expiry() {
        assert_eq!(format_elapsed(noon(), noon() + 120), "00:00:00");
    }

    #[test]
    fn elapsed_at_expiry_is_zero() {
        assert_eq!(format_elapsed(noon(), noon()), "00:00:00");
    }

    #[test]
    fn elapsed_seconds() {
        assert_eq!(format_elapsed(noon() + 5, noon()), "00:00:05");
        assert_eq!(format_elapsed(noon() + 11, noon()), "00:00:11");
    }

    #[test]
    fn elapsed_rolls_over_minutes_and_hours() {
        assert_eq!(format_elapsed(noon() + 61, noon()), "00:01:01");
        assert_eq!(format_elapsed(noon() + 3600 + 23 * 60 + 45, noon()), "01:23:45");
    }

    #[test]
    fn elapsed_hours_can_exceed_two_digits() {
        assert_eq!(format_elapsed(noon() + 100 * 3600, noon()), "100:00:00");
    }

    // -- Snapshot tests --

    fn item(uid: &str, expires: i64) -> WorkItem {
        WorkItem {
            entity_name: format!("entity-{uid}"),
            uid: uid.into(),
            expires,
        }
    }

    #[test]
    fn snapshot_sorts_by_expiry() {
        let observed = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let snapshot = Snapshot::new(
            observed,
            vec![item("c", 300), item("a", 100), item("b", 200)],
            Vec::new(),
        );
        let uids: Vec<&str> = snapshot.items.iter().map(|i| i.uid.as_str()).collect();
        assert_eq!(uids, ["a", "b", "c"]);
    }

    #[test]
    fn classify_covers_whole_batch() {
        let observed = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let now = observed.timestamp();
        let snapshot = Snapshot::new(
            observed,
            vec![item("gone", now - 60), item("warn", now - 5), item("live", now + 60)],
            vec![RecordWarning {
                key: "bad".into(),
                reason: "missing expires".into(),
            }],
        );

        let classified = snapshot.classify();
        assert_eq!(classified.rows.len(), 3);
        assert_eq!(classified.rows[0].status, ExpiryStatus::LongExpired);
        assert_eq!(classified.rows[0].elapsed, "00:01:00");
        assert_eq!(classified.rows[1].status, ExpiryStatus::RecentlyExpired);
        assert_eq!(classified.rows[1].elapsed, "00:00:05");
        assert_eq!(classified.rows[2].status, ExpiryStatus::Fresh);
        assert_eq!(classified.rows[2].elapsed, "00:00:00");
        assert_eq!(classified.invalid.len(), 1);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ExpiryStatus::RecentlyExpired).unwrap(),
            "\"recently_expired\""
        );
        assert_eq!(serde_json::to_string(&ExpiryStatus::Fresh).unwrap(), "\"fresh\"");
    }

    // -- QueueStats tests --

    #[test]
    fn queue_total_sums_all_counts() {
        let stats = QueueStats {
            name: "jobs".into(),
            url: "https://sqs.eu-west-1.amazonaws.com/123/jobs".into(),
            available: 10,
            in_flight: 3,
            delayed: 2,
        };
        assert_eq!(stats.total(), 15);
    }
}
