//! Common utilities and helpers

use std::time::Duration;

pub mod logging;
pub mod path;

/// Display helpers
pub struct Utils;

impl Utils {
    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        let milliseconds = duration.subsec_millis();

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }

    /// Format seconds, tolerating negative or non-finite probe values
    pub fn format_seconds(seconds: f64) -> String {
        if seconds.is_finite() && seconds > 0.0 {
            Self::format_duration(Duration::from_secs_f64(seconds))
        } else {
            Self::format_duration(Duration::ZERO)
        }
    }

    /// Format file size for display
    pub fn format_file_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Format a bitrate in kb/s
    pub fn format_bitrate(bps: u64) -> String {
        if bps == 0 {
            "unknown".to_string()
        } else {
            format!("{} kb/s", bps / 1000)
        }
    }
}
