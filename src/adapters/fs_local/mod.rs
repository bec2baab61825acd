// Local filesystem adapter - Staging of request inputs with scoped cleanup

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempPath};
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::utils::path::{file_name, unique_suffix};

/// A file copied into the staging directory.
///
/// The copy is deleted when this value is dropped unless the staging area
/// retains files.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    guard: Option<TempPath>,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file survives this value
    pub fn is_retained(&self) -> bool {
        self.guard.is_none()
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.guard.is_some() {
            debug!(path = %self.path.display(), "Removing staged file");
        }
    }
}

/// Staged inputs of one request
#[derive(Debug, Default)]
pub struct StagedInputs {
    pub primary: Option<StagedFile>,
    pub logos: Vec<StagedFile>,
    /// Overlay source reference to staged path
    pub sources: HashMap<String, PathBuf>,
}

/// Directory where request inputs are copied before processing
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
    retain: bool,
}

impl StagingArea {
    /// Create a staging area; `retain` keeps staged files after the request for debugging
    pub fn new(dir: impl Into<PathBuf>, retain: bool) -> Self {
        Self {
            dir: dir.into(),
            retain,
        }
    }

    /// Copy the primary video as `proc_<suffix>_<name>`
    pub async fn stage_primary(&self, source: &Path) -> Result<StagedFile, DomainError> {
        if !source.is_file() {
            return Err(DomainError::InputNotFound {
                path: source.display().to_string(),
            });
        }
        let prefix = format!("proc_{}_", unique_suffix());
        self.stage(source, &prefix).await
    }

    /// Copy an overlay image as `logo_<index>_<suffix>_<name>`
    pub async fn stage_logo(&self, index: usize, source: &Path) -> Result<StagedFile, DomainError> {
        if !source.is_file() {
            return Err(DomainError::FsFail(format!(
                "Logo file not found: {}",
                source.display()
            )));
        }
        let prefix = format!("logo_{}_{}_", index, unique_suffix());
        self.stage(source, &prefix).await
    }

    /// Stage the primary video and every `(source_ref, path)` logo.
    ///
    /// A logo whose file is missing is left out of the source map, so
    /// overlays naming it are skipped at compile time.
    pub async fn stage_request(
        &self,
        primary: &Path,
        logos: &[(String, PathBuf)],
    ) -> Result<StagedInputs, DomainError> {
        let mut staged = StagedInputs {
            primary: Some(self.stage_primary(primary).await?),
            ..StagedInputs::default()
        };
        for (index, (source_ref, path)) in logos.iter().enumerate() {
            if !path.is_file() {
                warn!(
                    source_ref = %source_ref,
                    path = %path.display(),
                    "Logo file not found, overlays using it will be skipped"
                );
                continue;
            }
            let file = self.stage_logo(index, path).await?;
            staged.sources.insert(source_ref.clone(), file.path().to_path_buf());
            staged.logos.push(file);
        }
        info!(
            dir = %self.dir.display(),
            logos = staged.logos.len(),
            retain = self.retain,
            "Inputs staged"
        );
        Ok(staged)
    }

    async fn stage(&self, source: &Path, prefix: &str) -> Result<StagedFile, DomainError> {
        ensure_dir(&self.dir)?;
        let name = file_name(source);
        let fs_fail = |e: io::Error| {
            DomainError::FsFail(format!("Failed to stage {}: {}", source.display(), e))
        };

        // Reserve the name with a guard before the copy lands in it
        let temp_path = Builder::new()
            .prefix(prefix)
            .suffix(&name)
            .rand_bytes(0)
            .tempfile_in(&self.dir)
            .map_err(fs_fail)?
            .into_temp_path();
        let path = temp_path.to_path_buf();
        tokio::fs::copy(source, &path).await.map_err(fs_fail)?;
        debug!(from = %source.display(), to = %path.display(), "Staged file");

        if self.retain {
            let kept = temp_path.keep().map_err(|e| fs_fail(e.error))?;
            warn!(path = %kept.display(), "Keeping staged file for debugging");
            Ok(StagedFile {
                path: kept,
                guard: None,
            })
        } else {
            Ok(StagedFile {
                path,
                guard: Some(temp_path),
            })
        }
    }
}

/// Create a directory and its parents if missing
pub fn ensure_dir(dir: &Path) -> Result<(), DomainError> {
    fs::create_dir_all(dir).map_err(|e| {
        DomainError::FsFail(format!(
            "Failed to create directory {}: {}",
            dir.display(),
            e
        ))
    })
}
