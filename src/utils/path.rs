//! Unique file naming for staged inputs and outputs

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Suffix unique across concurrent requests and processes:
/// UTC time with microseconds, process id and a process-wide sequence number.
pub fn unique_suffix() -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}_{}_{}",
        Utc::now().format("%Y%m%d_%H%M%S_%6f"),
        std::process::id(),
        sequence
    )
}

/// File name with anything but `[A-Za-z0-9._-]` replaced by `_`
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Stem of a path, sanitized; `video` when there is none
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| sanitize_file_name(&s.to_string_lossy()))
        .unwrap_or_else(|| "video".to_string())
}

/// Final file name of a path, sanitized
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| sanitize_file_name(&s.to_string_lossy()))
        .unwrap_or_else(|| "file".to_string())
}

/// `<output_dir>/processed_<stem>_<suffix>.mp4`
pub fn processed_output_path(output_dir: &Path, source: &Path) -> PathBuf {
    output_dir.join(format!(
        "processed_{}_{}.mp4",
        file_stem(source),
        unique_suffix()
    ))
}
