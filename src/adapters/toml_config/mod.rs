// TOML config adapter - Typed application configuration loaded from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::rules::REFERENCE_PREVIEW_WIDTH;
use crate::engine::EncodeSettings;
use crate::utils::logging::LoggingConfig;

/// Config files tried, in order, when none is given explicitly
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["vidfx.toml", "config/vidfx.toml"];

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineSection,
    pub encode: EncodeSettings,
    pub paths: PathsSection,
    pub overlay: OverlaySection,
    pub debug: DebugSection,
    pub logging: LoggingConfig,
}

/// External binaries and their limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    /// Kill a transcode running longer than this; unbounded when absent
    pub timeout_secs: Option<u64>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            timeout_secs: None,
        }
    }
}

impl EngineSection {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("outputs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySection {
    /// Width of the preview overlays were authored against
    pub reference_width: u32,
}

impl Default for OverlaySection {
    fn default() -> Self {
        Self {
            reference_width: REFERENCE_PREVIEW_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSection {
    pub keep_temp_files: bool,
}

impl AppConfig {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.overlay.reference_width == 0 {
            return Err(DomainError::BadArgs(
                "overlay.reference_width must be greater than 0".to_string(),
            ));
        }
        for (name, path) in [
            ("engine.ffmpeg_path", &self.engine.ffmpeg_path),
            ("engine.ffprobe_path", &self.engine.ffprobe_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(DomainError::BadArgs(format!("{} must not be empty", name)));
            }
        }
        if self.engine.timeout_secs == Some(0) {
            return Err(DomainError::BadArgs(
                "engine.timeout_secs must be greater than 0 when set".to_string(),
            ));
        }
        for (name, value) in [
            ("encode.video_codec", &self.encode.video_codec),
            ("encode.preset", &self.encode.preset),
            ("encode.pixel_format", &self.encode.pixel_format),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::BadArgs(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration text; missing keys take their defaults
    pub fn parse(content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::BadArgs(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<AppConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::parse(&content)?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// First existing default config file under `base`
    pub fn discover(base: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(|candidate| base.join(candidate))
            .find(|candidate| candidate.is_file())
    }

    /// Load the explicit file, else a discovered one, else defaults
    pub fn load_or_default(explicit: Option<&Path>, base: &Path) -> Result<AppConfig, DomainError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::discover(base) {
            Some(path) => Self::load(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}
