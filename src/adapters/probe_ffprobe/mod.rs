//! FFprobe adapter for media file probing
//!
//! Runs the external `ffprobe` binary with JSON output and maps the first
//! video stream and the container section onto [`MediaMetadata`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Frame rate assumed when the stream does not report a usable one
pub const FALLBACK_FPS: f64 = 30.0;

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    program: PathBuf,
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FFprobeAdapter {
    /// Create an adapter running the given ffprobe binary
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn unavailable(&self, err: std::io::Error) -> DomainError {
        DomainError::EngineUnavailable {
            program: self.program.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_media(&self, file_path: &Path) -> Result<MediaMetadata, DomainError> {
        if !file_path.exists() {
            return Err(DomainError::InputNotFound {
                path: file_path.display().to_string(),
            });
        }

        debug!(program = %self.program.display(), file = %file_path.display(), "Running ffprobe");
        let output = Command::new(&self.program)
            .args(["-v", "error", "-select_streams", "v:0"])
            .args([
                "-show_entries",
                "stream=width,height,codec_name,r_frame_rate,display_aspect_ratio",
            ])
            .args(["-show_entries", "format=duration,size,bit_rate,format_name"])
            .args(["-of", "json"])
            .arg(file_path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            let diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(code = ?output.status.code(), "ffprobe failed: {}", diagnostics);
            return Err(DomainError::ProbeFailure { diagnostics });
        }

        let metadata = parse_probe_output(&output.stdout)?;
        info!(
            width = metadata.video.width,
            height = metadata.video.height,
            duration = metadata.duration,
            codec = %metadata.video.codec,
            "Media probed"
        );
        Ok(metadata)
    }

    async fn version(&self) -> Result<String, DomainError> {
        engine_version(&self.program).await
    }
}

/// First line of `<program> -version`
pub(crate) async fn engine_version(program: &Path) -> Result<String, DomainError> {
    let unavailable = |message: String| DomainError::EngineUnavailable {
        program: program.display().to_string(),
        message,
    };
    let output = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    if !output.status.success() {
        return Err(unavailable(format!(
            "-version exited with {:?}",
            output.status.code()
        )));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    display_aspect_ratio: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeFormat {
    duration: Option<Numeric>,
    size: Option<Numeric>,
    bit_rate: Option<Numeric>,
    format_name: Option<String>,
}

/// ffprobe prints most numbers as strings, but not always
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Numeric::Number(n) => Some(*n),
            Numeric::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }

    fn as_u64(&self) -> Option<u64> {
        self.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64)
    }
}

/// Map ffprobe JSON onto metadata, applying defaults for missing fields
pub fn parse_probe_output(stdout: &[u8]) -> Result<MediaMetadata, DomainError> {
    let parsed: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| DomainError::ProbeParseFailure(e.to_string()))?;

    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or(DomainError::NoVideoStream)?;
    let format = parsed.format.unwrap_or_default();

    Ok(MediaMetadata {
        duration: format.duration.as_ref().and_then(Numeric::as_f64).unwrap_or(0.0),
        size_bytes: format.size.as_ref().and_then(Numeric::as_u64).unwrap_or(0),
        bitrate_bps: format.bit_rate.as_ref().and_then(Numeric::as_u64).unwrap_or(0),
        format_name: format.format_name.unwrap_or_else(|| "unknown".to_string()),
        video: VideoStreamMetadata {
            codec: stream.codec_name.unwrap_or_else(|| "unknown".to_string()),
            width: stream.width.unwrap_or(0),
            height: stream.height.unwrap_or(0),
            fps: stream
                .r_frame_rate
                .as_deref()
                .and_then(parse_frame_rate)
                .unwrap_or(FALLBACK_FPS),
            aspect_ratio: stream
                .display_aspect_ratio
                .unwrap_or_else(|| "16:9".to_string()),
        },
    })
}

/// Parse an `N/D` rational; zero denominators and garbage yield `None`
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = rate.split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    if den == 0.0 || !num.is_finite() || !den.is_finite() {
        return None;
    }
    Some(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "programs": [],
        "streams": [{
            "codec_name": "h264",
            "width": 1920,
            "height": 1080,
            "r_frame_rate": "30000/1001",
            "display_aspect_ratio": "16:9"
        }],
        "format": {
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "12.345000",
            "size": "1048576",
            "bit_rate": "679000"
        }
    }"#;

    #[test]
    fn test_parse_full_output() {
        let metadata = parse_probe_output(SAMPLE.as_bytes()).unwrap();
        assert_eq!(metadata.resolution(), (1920, 1080));
        assert_eq!(metadata.video.codec, "h264");
        assert!((metadata.video.fps - 29.97).abs() < 0.01);
        assert_eq!(metadata.duration, 12.345);
        assert_eq!(metadata.size_bytes, 1_048_576);
        assert_eq!(metadata.bitrate_bps, 679_000);
        assert_eq!(metadata.format_name, "mov,mp4,m4a,3gp,3g2,mj2");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let metadata = parse_probe_output(br#"{"streams": [{}]}"#).unwrap();
        assert_eq!(metadata.duration, 0.0);
        assert_eq!(metadata.size_bytes, 0);
        assert_eq!(metadata.format_name, "unknown");
        assert_eq!(metadata.video.codec, "unknown");
        assert_eq!(metadata.resolution(), (0, 0));
        assert_eq!(metadata.video.fps, FALLBACK_FPS);
        assert_eq!(metadata.video.aspect_ratio, "16:9");
    }

    #[test]
    fn test_no_streams_is_no_video_stream() {
        assert_eq!(
            parse_probe_output(br#"{"streams": [], "format": {}}"#),
            Err(DomainError::NoVideoStream)
        );
        assert_eq!(
            parse_probe_output(br#"{"format": {}}"#),
            Err(DomainError::NoVideoStream)
        );
    }

    #[test]
    fn test_bad_json_is_parse_failure() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(DomainError::ProbeParseFailure(_))
        ));
    }

    #[test]
    fn test_frame_rate_parsing() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("30"), None);
        assert_eq!(parse_frame_rate("a/b"), None);
    }

    #[tokio::test]
    async fn test_missing_input_checked_before_spawn() {
        let adapter = FFprobeAdapter::new("/definitely/not/ffprobe");
        let err = adapter
            .probe_media(Path::new("/no/such/video.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InputNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_binary_is_engine_unavailable() {
        let adapter = FFprobeAdapter::new("/definitely/not/ffprobe");
        let err = adapter.version().await.unwrap_err();
        assert!(matches!(err, DomainError::EngineUnavailable { .. }));
    }
}
