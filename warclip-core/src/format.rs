//! Formatting helpers shared across front ends.

use chrono::{DateTime, Utc};

use crate::analytics::{ResultLabel, RoleCount};

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    format_relative_time_from(ts, Utc::now())
}

/// Same as [`format_relative_time`] against an explicit "now".
pub fn format_relative_time_from(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d").to_string()
    }
}

/// Result text with the pull number, e.g. "Wipe (Pull 4)".
///
/// A pull number of 0 means none applies and only the result is shown.
pub fn pull_caption(result: ResultLabel, pull: u32) -> String {
    if pull == 0 {
        result.as_str().to_string()
    } else {
        format!("{} (Pull {})", result.as_str(), pull)
    }
}

/// Compact role composition, e.g. "T2 H4 D14".
pub fn role_summary(count: &RoleCount) -> String {
    format!("T{} H{} D{}", count.tank, count.healer, count.damage)
}

/// Tag text for list output; an empty tag shows as a dash.
pub fn tag_label(tag: Option<&str>) -> &str {
    match tag {
        Some(t) if !t.is_empty() => t,
        _ => "-",
    }
}
