//! FFmpeg execution adapter
//!
//! Spawns the external `ffmpeg` binary with an argument vector built from a
//! [`TranscodeJob`], waits for it and classifies the outcome.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::adapters::probe_ffprobe::engine_version;
use crate::domain::errors::*;
use crate::engine::{build_ffmpeg_args, EncodeSettings, TranscodeJob, TranscodeReport};
use crate::ports::*;

/// FFmpeg-based execution adapter
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    program: PathBuf,
    settings: EncodeSettings,
    timeout: Option<Duration>,
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FFmpegAdapter {
    /// Create an adapter running the given ffmpeg binary with default encoder settings
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            settings: EncodeSettings::default(),
            timeout: None,
        }
    }

    pub fn with_settings(mut self, settings: EncodeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Kill the engine and fail if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn execute(&self, job: &TranscodeJob) -> Result<TranscodeReport, DomainError> {
        let started = Instant::now();
        let args = build_ffmpeg_args(job, &self.settings);
        debug!(program = %self.program.display(), args = ?args, "Spawning ffmpeg");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DomainError::EngineUnavailable {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;

        // Dropping the pending wait kills the child
        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(seconds = limit.as_secs(), "ffmpeg timed out and was killed");
                    return Err(DomainError::TranscodeTimeout {
                        seconds: limit.as_secs(),
                    });
                }
            },
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|e| DomainError::EngineUnavailable {
            program: self.program.display().to_string(),
            message: format!("failed to wait for process: {}", e),
        })?;

        if !output.status.success() {
            let diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(code = ?output.status.code(), "ffmpeg failed:\n{}", diagnostics);
            return Err(DomainError::TranscodeFailure {
                exit_code: output.status.code(),
                diagnostics,
            });
        }

        let size = match tokio::fs::metadata(&job.output).await {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                return Err(DomainError::OutputMissingAfterSuccessExit {
                    path: job.output.display().to_string(),
                })
            }
        };

        let elapsed = started.elapsed();
        info!(
            output = %job.output.display(),
            size,
            elapsed_secs = elapsed.as_secs_f64(),
            "Transcode completed"
        );
        Ok(TranscodeReport {
            output_path: job.output.clone(),
            output_size_bytes: size,
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    async fn run(&self, job: &TranscodeJob) -> Result<TranscodeReport, DomainError> {
        let result = self.execute(job).await;
        if result.is_err() {
            remove_partial_output(&job.output).await;
        }
        result
    }

    async fn version(&self) -> Result<String, DomainError> {
        engine_version(&self.program).await
    }
}

async fn remove_partial_output(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed partial output"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), "Failed to remove partial output: {}", e),
    }
}
