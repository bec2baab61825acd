// Inspect interactor - Orchestrates media file inspection use case

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::Utils;

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Execute media file inspection
    pub async fn execute(&self, request: InspectRequest) -> Result<InspectResponse, DomainError> {
        info!(input = %request.input.display(), "Starting media file inspection");

        let metadata = self.probe_port.probe_media(&request.input).await?;
        let summary = match request.format {
            OutputFormat::Json => serde_json::to_string_pretty(&metadata).map_err(|e| {
                DomainError::BadArgs(format!("JSON serialization failed: {}", e))
            })?,
            OutputFormat::Yaml => serde_yaml::to_string(&metadata).map_err(|e| {
                DomainError::BadArgs(format!("YAML serialization failed: {}", e))
            })?,
            OutputFormat::Text => format_as_text(&metadata, &request),
        };

        Ok(InspectResponse { metadata, summary })
    }
}

fn format_as_text(metadata: &MediaMetadata, request: &InspectRequest) -> String {
    let video = &metadata.video;
    let mut output = String::new();
    output.push_str("Media File Information:\n");
    output.push_str(&format!("  File: {}\n", request.input.display()));
    output.push_str(&format!("  Container: {}\n", metadata.format_name));
    output.push_str(&format!(
        "  Duration: {} ({:.3}s)\n",
        Utils::format_seconds(metadata.duration),
        metadata.duration
    ));
    output.push_str(&format!(
        "  File Size: {}\n",
        Utils::format_file_size(metadata.size_bytes)
    ));
    output.push_str(&format!(
        "  Bitrate: {}\n",
        Utils::format_bitrate(metadata.bitrate_bps)
    ));
    output.push_str("\nVideo Stream:\n");
    output.push_str(&format!(
        "  {}x{} @ {:.2}fps, {}, aspect {}\n",
        video.width, video.height, video.fps, video.codec, video.aspect_ratio
    ));
    output
}

/// Rendering of an inspection result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(format!(
                "Invalid output format: {}. Valid formats: text, json, yaml",
                other
            )),
        }
    }
}

/// Request for media file inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input: PathBuf,
    pub format: OutputFormat,
}

impl InspectRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            format: OutputFormat::default(),
        }
    }

    pub fn with_format(input: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            input: input.into(),
            format,
        }
    }
}

/// Response from media file inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub metadata: MediaMetadata,
    pub summary: String,
}
