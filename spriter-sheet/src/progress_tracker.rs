//! Batch progress with ETA estimation

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Tracks how many files of a batch are done and estimates the remaining time
pub struct ProgressTracker {
    total: u64,
    processed: Cell<u64>,
    start_time: Instant,
    label: String,
}

impl ProgressTracker {
    /// Creates a new progress tracker
    pub fn new(total: u64, label: &str) -> Self {
        Self {
            total,
            processed: Cell::new(0),
            start_time: Instant::now(),
            label: label.to_string(),
        }
    }

    /// Number of finished items
    pub fn processed(&self) -> u64 {
        self.processed.get()
    }

    /// Marks one more item as finished and returns a status line
    pub fn advance(&self) -> String {
        let current = (self.processed.get() + 1).min(self.total);
        self.processed.set(current);
        self.status_line(current, self.start_time.elapsed())
    }

    /// Formats progress for `current` finished items after `elapsed`
    fn status_line(&self, current: u64, elapsed: Duration) -> String {
        let elapsed_secs = elapsed.as_secs_f64();

        let percent = if self.total > 0 {
            (current as f64 / self.total as f64) * 100.0
        } else {
            100.0
        };

        if current > 0 && current < self.total && elapsed_secs > 0.0 {
            let rate = current as f64 / elapsed_secs;
            let remaining = (self.total - current) as f64 / rate;
            format!(
                "{} {}/{} ({:.1}%) - elapsed: {} - ETA: {}",
                self.label,
                current,
                self.total,
                percent,
                format_duration(elapsed_secs),
                format_duration(remaining),
            )
        } else if current >= self.total {
            format!(
                "{} {}/{} (100.0%) - completed in {}",
                self.label,
                current,
                self.total,
                format_duration(elapsed_secs),
            )
        } else {
            format!("{} {}/{} ({:.1}%)", self.label, current, self.total, percent)
        }
    }
}

/// Formats seconds as `4.3s`, `2m 5s` or `1h 2m 5s`
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        return format!("{secs:.1}s");
    }

    let total = secs.round() as u64;
    let (hours, mins, rest) = (total / 3600, total % 3600 / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {mins}m {rest}s")
    } else {
        format!("{mins}m {rest}s")
    }
}
