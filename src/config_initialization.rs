//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter};
use crate::domain::errors::DomainError;
use crate::utils::logging::{LogFormat, LogLevel};

/// Values given on the command line; `None` leaves lower layers in place
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
    pub output_dir: Option<PathBuf>,
    pub keep_temp: bool,
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(
    cli: &CliOverrides,
    base_dir: &Path,
) -> Result<AppConfig, DomainError> {
    initialize_with_env(cli, base_dir, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an explicit environment lookup
pub fn initialize_with_env<F>(
    cli: &CliOverrides,
    base_dir: &Path,
    env: F,
) -> Result<AppConfig, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = TomlConfigAdapter::load_or_default(cli.config_path.as_deref(), base_dir)?;

    let env_overrides = apply_environment(&mut config, &env)?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    let cli_overrides = apply_cli(&mut config, cli);
    if cli_overrides > 0 {
        debug!("Applied {} CLI configuration overrides", cli_overrides);
    }

    config.validate()?;
    Ok(config)
}

fn apply_environment<F>(config: &mut AppConfig, env: &F) -> Result<usize, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;
    let mut read = |key: &str| {
        let value = env(key).filter(|v| !v.trim().is_empty());
        if value.is_some() {
            debug!("Found environment override: {}", key);
            applied += 1;
        }
        value
    };

    if let Some(v) = read("VIDFX_FFMPEG_PATH") {
        config.engine.ffmpeg_path = PathBuf::from(v);
    }
    if let Some(v) = read("VIDFX_FFPROBE_PATH") {
        config.engine.ffprobe_path = PathBuf::from(v);
    }
    if let Some(v) = read("VIDFX_TIMEOUT_SECS") {
        config.engine.timeout_secs = Some(parse_env("VIDFX_TIMEOUT_SECS", &v)?);
    }
    if let Some(v) = read("VIDFX_VIDEO_CODEC") {
        config.encode.video_codec = v;
    }
    if let Some(v) = read("VIDFX_PRESET") {
        config.encode.preset = v;
    }
    if let Some(v) = read("VIDFX_STAGING_DIR") {
        config.paths.staging_dir = PathBuf::from(v);
    }
    if let Some(v) = read("VIDFX_OUTPUT_DIR") {
        config.paths.output_dir = PathBuf::from(v);
    }
    if let Some(v) = read("VIDFX_REFERENCE_WIDTH") {
        config.overlay.reference_width = parse_env("VIDFX_REFERENCE_WIDTH", &v)?;
    }
    if let Some(v) = read("VIDFX_KEEP_TEMP_FILES") {
        config.debug.keep_temp_files = is_true(&v);
    }
    // Older deployments set this instead
    if let Some(v) = read("DEBUG_KEEP_UPLOADS") {
        config.debug.keep_temp_files = config.debug.keep_temp_files || is_true(&v);
    }
    if let Some(v) = read("VIDFX_LOG_LEVEL") {
        config.logging.level = v.parse().map_err(DomainError::BadArgs)?;
    }
    if let Some(v) = read("VIDFX_LOG_FORMAT") {
        config.logging.format = v.parse().map_err(DomainError::BadArgs)?;
    }

    Ok(applied)
}

fn apply_cli(config: &mut AppConfig, cli: &CliOverrides) -> usize {
    let mut applied = 0;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
        applied += 1;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
        applied += 1;
    }
    if let Some(dir) = &cli.output_dir {
        config.paths.output_dir = dir.clone();
        applied += 1;
    }
    if cli.keep_temp {
        config.debug.keep_temp_files = true;
        applied += 1;
    }
    applied
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::BadArgs(format!("Invalid value for {}: {}", key, value)))
}

fn is_true(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_any_layer() {
        let dir = TempDir::new().unwrap();
        let config = initialize_with_env(&CliOverrides::default(), dir.path(), env(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("vidfx.toml"),
            "[paths]\noutput_dir = \"from-file\"\nstaging_dir = \"stage-file\"\n[logging]\nlevel = \"warn\"",
        )
        .unwrap();

        let vars = env(&[("VIDFX_OUTPUT_DIR", "from-env"), ("VIDFX_LOG_LEVEL", "debug")]);
        let cli = CliOverrides {
            output_dir: Some(PathBuf::from("from-cli")),
            ..CliOverrides::default()
        };
        let config = initialize_with_env(&cli, dir.path(), vars).unwrap();

        assert_eq!(config.paths.output_dir, PathBuf::from("from-cli"));
        assert_eq!(config.paths.staging_dir, PathBuf::from("stage-file"));
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_legacy_keep_uploads_variable() {
        let dir = TempDir::new().unwrap();
        let config = initialize_with_env(
            &CliOverrides::default(),
            dir.path(),
            env(&[("DEBUG_KEEP_UPLOADS", "TRUE")]),
        )
        .unwrap();
        assert!(config.debug.keep_temp_files);

        let config = initialize_with_env(
            &CliOverrides::default(),
            dir.path(),
            env(&[("DEBUG_KEEP_UPLOADS", "false")]),
        )
        .unwrap();
        assert!(!config.debug.keep_temp_files);
    }

    #[test]
    fn test_bad_env_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let cli = CliOverrides::default();
        assert!(initialize_with_env(&cli, dir.path(), env(&[("VIDFX_TIMEOUT_SECS", "soon")])).is_err());
        assert!(initialize_with_env(&cli, dir.path(), env(&[("VIDFX_REFERENCE_WIDTH", "0")])).is_err());
        assert!(initialize_with_env(&cli, dir.path(), env(&[("VIDFX_LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn test_explicit_config_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[overlay]\nreference_width = 1280").unwrap();
        let cli = CliOverrides {
            config_path: Some(path),
            keep_temp: true,
            ..CliOverrides::default()
        };
        let config = initialize_with_env(&cli, dir.path(), env(&[])).unwrap();
        assert_eq!(config.overlay.reference_width, 1280);
        assert!(config.debug.keep_temp_files);
    }
}
