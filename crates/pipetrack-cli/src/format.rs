//! Human-readable formatting for ages, durations and conditions.

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use pipetrack_core::Condition;

/// Placeholder for values that are not known yet.
pub const NONE: &str = "---";

/// Format how long ago `then` was.
pub fn format_age(now: DateTime<Utc>, then: Option<DateTime<Utc>>) -> String {
    let Some(then) = then else {
        return NONE.to_string();
    };

    let duration = now.signed_duration_since(then);
    if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds().max(0))
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else {
        format!("{}d ago", duration.num_days())
    }
}

/// Format the time between start and completion.
pub fn format_duration(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return NONE.to_string();
    };

    let seconds = end.signed_duration_since(start).num_seconds().max(0);
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

/// Format a condition, adding the reason when it says more than the state.
pub fn format_condition(condition: Condition, reason: Option<&str>) -> String {
    let label = match condition {
        Condition::True => "Succeeded",
        Condition::False => "Failed",
        Condition::Unknown => "Running",
    };

    match reason {
        Some(reason) if !reason.is_empty() && reason != label => format!("{}({})", label, reason),
        _ => label.to_string(),
    }
}

/// Write rows as left-aligned columns separated by three spaces.
pub fn write_table<W: Write>(out: &mut W, header: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header).chain(rows) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        writeln!(out, "{}", line.join("   ").trim_end())?;
    }
    Ok(())
}
