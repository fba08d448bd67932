//! Human-readable formatting helpers for record output.

use chrono::{Local, TimeZone};

/// Wall-clock timestamp with nanosecond precision, local time.
pub fn format_timestamp(timestamp_ns: u64) -> String {
    let secs = (timestamp_ns / 1_000_000_000) as i64;
    let nanos = (timestamp_ns % 1_000_000_000) as u32;
    match Local.timestamp_opt(secs, nanos) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S%.9f").to_string(),
        _ => format!("{timestamp_ns}ns"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_nanosecond_precision() {
        let formatted = format_timestamp(1_700_000_000_000_000_042);
        assert!(formatted.ends_with(".000000042"), "{formatted}");
    }
}
