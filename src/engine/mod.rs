//! Transcode job description and engine invocation

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::model::TrimWindow;
use crate::planner::CompiledGraph;

pub mod command;

pub use command::build_ffmpeg_args;

/// Encoder settings applied to every transcode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    /// Video codec passed to `-c:v`
    pub video_codec: String,
    /// Encoder preset
    pub preset: String,
    /// Output pixel format
    pub pixel_format: String,
    /// Move the index to the front of the file for progressive playback
    pub faststart: bool,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "fast".to_string(),
            pixel_format: "yuv420p".to_string(),
            faststart: true,
        }
    }
}

/// Everything needed for one engine invocation
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    /// Primary video, engine input 0
    pub primary: PathBuf,
    pub trim: TrimWindow,
    /// Compiled graph; its auxiliary inputs become engine inputs 1..
    pub graph: CompiledGraph,
    pub output: PathBuf,
}

impl TranscodeJob {
    pub fn new(
        primary: impl Into<PathBuf>,
        trim: TrimWindow,
        graph: CompiledGraph,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            primary: primary.into(),
            trim,
            graph,
            output: output.into(),
        }
    }
}

/// Successful transcode summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodeReport {
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub elapsed_secs: f64,
}
