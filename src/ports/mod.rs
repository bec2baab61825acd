// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{TranscodeJob, TranscodeReport};

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a media file for container and primary video stream metadata
    async fn probe_media(&self, file_path: &Path) -> Result<MediaMetadata, DomainError>;

    /// Version banner of the probing tool, or `EngineUnavailable`
    async fn version(&self) -> Result<String, DomainError>;
}

/// Port for running a compiled transcode
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Run the job to completion and classify the outcome.
    ///
    /// On any error no partial output is left at `job.output`.
    async fn run(&self, job: &TranscodeJob) -> Result<TranscodeReport, DomainError>;

    /// Version banner of the execution engine, or `EngineUnavailable`
    async fn version(&self) -> Result<String, DomainError>;
}
