//! Human-readable durations, sizes and timestamps for presentation code.

/// `850ms`, `1.50s`, `1m 05s`.
pub fn format_duration_ms(ms: f64) -> String {
    let ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
    if ms < 1000.0 {
        return format!("{}ms", ms.round() as u64);
    }
    let secs = ms / 1000.0;
    if secs < 60.0 {
        return format!("{:.2}s", secs);
    }
    let total = secs.round() as u64;
    format!("{}m {:02}s", total / 60, total % 60)
}

/// Base-1024 size with up to two decimals: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2.35 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// `m:ss` for a position in seconds (fractions are truncated).
pub fn format_timestamp(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let total = secs as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
