//! Human-readable formatting for elapsed times, memory and progress bars

use std::time::Duration;

/// Format an elapsed time with a unit fitting its magnitude
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2} µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2} ms", secs * 1000.0)
    } else {
        format!("{:.2} s", secs)
    }
}

/// Format a (possibly negative) memory amount given in megabytes
pub fn format_memory_mb(mb: f64) -> String {
    let magnitude = mb.abs();
    if magnitude < 1.0 {
        format!("{:.2} KB", mb * 1024.0)
    } else if magnitude < 1024.0 {
        format!("{:.2} MB", mb)
    } else {
        format!("{:.2} GB", mb / 1024.0)
    }
}

/// Render a fixed-width text progress bar
pub fn render_bar(percent: f64, width: usize) -> String {
    let percent = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    format!(
        "[{}{}] {:>5.1}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        percent
    )
}
