// Check interactor - Reports whether the external engine binaries are usable

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::ports::*;

/// Availability of one external binary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolStatus {
    pub installed: bool,
    /// Resolved location, when the binary could be found
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    pub error: Option<String>,
}

/// Availability of both engine binaries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResponse {
    pub ffmpeg: ToolStatus,
    pub ffprobe: ToolStatus,
    pub video_processing_available: bool,
}

/// Interactor for the engine availability check
pub struct CheckInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl CheckInteractor {
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        ffmpeg_path: impl Into<PathBuf>,
        ffprobe_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    pub async fn execute(&self) -> CheckResponse {
        let ffmpeg = status(self.execute_port.version().await, &self.ffmpeg_path);
        let ffprobe = status(self.probe_port.version().await, &self.ffprobe_path);
        let available = ffmpeg.installed && ffprobe.installed;
        if available {
            info!("ffmpeg and ffprobe are available");
        } else {
            warn!(
                ffmpeg = ffmpeg.installed,
                ffprobe = ffprobe.installed,
                "Video processing is not available"
            );
        }
        CheckResponse {
            ffmpeg,
            ffprobe,
            video_processing_available: available,
        }
    }
}

fn status<E: std::fmt::Display>(version: Result<String, E>, program: &Path) -> ToolStatus {
    match version {
        Ok(version) => ToolStatus {
            installed: true,
            path: resolve_program(program),
            version: Some(version),
            error: None,
        },
        Err(e) => ToolStatus {
            installed: false,
            path: None,
            version: None,
            error: Some(e.to_string()),
        },
    }
}

/// Locate a program the way the shell would: paths with a separator are
/// taken as given, bare names are searched on `PATH`
pub fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
