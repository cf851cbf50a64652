use std::time::Duration;

/// Parse a poll interval into a [`Duration`].
///
/// Accepts either:
/// - Human-readable shorthand via `humantime` (e.g. "5s", "1m", "2m30s")
/// - Raw seconds as a plain integer (e.g. "30")
pub fn parse_interval(s: &str) -> Option<Duration> {
    if let Ok(d) = humantime::parse_duration(s) {
        return Some(d);
    }

    if let Ok(secs) = s.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    None
}
