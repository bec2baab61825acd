// Process interactor - Orchestrates the edit-and-transcode use case

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapters::fs_local::{ensure_dir, StagingArea};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{TranscodeJob, TranscodeReport};
use crate::planner::{CompileInput, FilterGraphCompiler};
use crate::ports::*;
use crate::utils::path::processed_output_path;

/// Interactor for the process use case: validate, stage, probe, compile, transcode
pub struct ProcessInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    compiler: FilterGraphCompiler,
    staging: StagingArea,
    output_dir: PathBuf,
}

impl ProcessInteractor {
    /// Create new process interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        compiler: FilterGraphCompiler,
        staging: StagingArea,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            compiler,
            staging,
            output_dir: output_dir.into(),
        }
    }

    /// Run one request end to end.
    ///
    /// Staged inputs are removed on every exit path unless the staging area
    /// retains them.
    pub async fn execute(&self, request: ProcessRequest) -> Result<ProcessResponse, DomainError> {
        request.validate()?;
        info!(
            input = %request.input.display(),
            trim_start = request.trim.start,
            trim_duration = ?request.trim.duration,
            text_overlays = request.text_overlays.len(),
            image_overlays = request.image_overlays.len(),
            "Processing video"
        );

        self.execute_port.version().await?;

        if !request.image_overlays.is_empty() && request.logos.is_empty() {
            warn!(
                count = request.image_overlays.len(),
                "Logo overlays were given without any logo files, they will be skipped"
            );
        }

        let staged = self
            .staging
            .stage_request(&request.input, &request.logos)
            .await?;
        let primary = match staged.primary.as_ref() {
            Some(file) => file.path().to_path_buf(),
            None => {
                return Err(DomainError::FsFail(
                    "Primary input was not staged".to_string(),
                ))
            }
        };

        let metadata = self.probe_port.probe_media(&primary).await?;
        let (width, height) = metadata.resolution();

        let graph = self.compiler.compile(&CompileInput {
            adjustment: request.adjustment,
            trim_start: request.trim.start,
            text_overlays: &request.text_overlays,
            image_overlays: &request.image_overlays,
            resolved_sources: &staged.sources,
            video_width: width,
            video_height: height,
        });
        let filter_complex = graph.to_filter_complex();
        debug!(filter_complex = %filter_complex, "Compiled filter graph");
        let skipped_overlays: Vec<String> = graph.diagnostics.iter().map(|d| d.to_string()).collect();

        ensure_dir(&self.output_dir)?;
        let output = processed_output_path(&self.output_dir, &request.input);
        let job = TranscodeJob::new(primary, request.trim, graph, output);
        let report = self.execute_port.run(&job).await?;

        info!(output = %report.output_path.display(), "Video processed");
        Ok(ProcessResponse {
            output_path: report.output_path.clone(),
            report,
            metadata,
            filter_complex,
            skipped_overlays,
        })
    }
}

/// Request for the process use case
#[derive(Debug, Clone, Default)]
pub struct ProcessRequest {
    pub input: PathBuf,
    pub trim: TrimWindow,
    pub adjustment: AdjustmentParams,
    pub text_overlays: Vec<TextOverlay>,
    pub image_overlays: Vec<ImageOverlay>,
    /// Overlay source reference and the image file it names
    pub logos: Vec<(String, PathBuf)>,
}

impl ProcessRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Check every field before any file is touched
    pub fn validate(&self) -> Result<(), DomainError> {
        TrimWindow::new(self.trim.start, self.trim.duration)?;
        self.adjustment.validate()?;
        for (index, overlay) in self.text_overlays.iter().enumerate() {
            overlay.validate(index)?;
        }
        for (index, overlay) in self.image_overlays.iter().enumerate() {
            overlay.validate(index)?;
        }
        for (name, _) in &self.logos {
            if name.is_empty() {
                return Err(DomainError::BadArgs(
                    "Logo source names must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Response from the process use case
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub output_path: PathBuf,
    pub report: TranscodeReport,
    pub metadata: MediaMetadata,
    pub filter_complex: String,
    /// Image overlays left out of the graph, with the reason
    pub skipped_overlays: Vec<String>,
}
