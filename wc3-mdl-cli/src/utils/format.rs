//! Formatting utilities

use chrono::{DateTime, Local};
use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Header comment stamped on converted files
pub fn generation_comment(now: DateTime<Local>) -> String {
    format!(
        "MDL file generated by wc3mdl {} on {}",
        env!("CARGO_PKG_VERSION"),
        now.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Format a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Share of keys removed by an optimization pass
pub fn format_reduction(before: usize, after: usize) -> String {
    if before == 0 {
        "N/A".to_string()
    } else {
        let ratio = 100.0 - (after as f64 / before as f64 * 100.0);
        format_percentage(ratio)
    }
}

/// Milliseconds as seconds, `1.333s`
pub fn format_millis(ms: u32) -> String {
    format!("{:.3}s", f64::from(ms) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1024), "1.02 kB");
        assert_eq!(format_bytes(1048576), "1.05 MB");
    }

    #[test]
    fn test_format_reduction() {
        assert_eq!(format_reduction(1000, 500), "50.0%");
        assert_eq!(format_reduction(101, 2), "98.0%");
        assert_eq!(format_reduction(10, 10), "0.0%");
        assert_eq!(format_reduction(0, 0), "N/A");
    }

    #[test]
    fn test_generation_comment() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let comment = generation_comment(now);
        assert!(comment.starts_with("MDL file generated by wc3mdl "));
        assert!(comment.ends_with(" on 2024-03-01 12:30:00"));
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(3333), "3.333s");
        assert_eq!(format_millis(0), "0.000s");
    }
}
