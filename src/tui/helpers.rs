use chrono::{DateTime, Local, Utc};

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with two decimals, e.g. `1.50 MB`
pub fn format_file_size(size: u64) -> String {
    let mut value = size as f64;
    for unit in SIZE_UNITS {
        if value < 1024.0 {
            return format!("{:.2} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2} TB", value)
}

/// Local-time rendering used in the header
pub fn format_timestamp(when: &DateTime<Utc>) -> String {
    when.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Fraction of files decided, in `[0, 1]`
pub fn calculate_progress(decided: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (decided as f64 / total as f64).clamp(0.0, 1.0)
}
