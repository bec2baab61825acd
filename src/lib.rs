//! vidfx video editing library
//!
//! Compiles a declarative edit (trim window, color adjustment, timed text and
//! logo overlays) into an ffmpeg filter graph and drives the external
//! `ffmpeg`/`ffprobe` binaries to produce the edited video.

use std::path::Path;

use anyhow::Result;
use tracing::info;

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use adapters::toml_config::AppConfig;
pub use domain::errors::DomainError;
pub use domain::model::{
    AdjustmentParams, ImageOverlay, MediaMetadata, TextOverlay, TimeWindow, TrimWindow,
};
pub use error::{VidfxError, VidfxResult};
pub use planner::{CompiledGraph, FilterGraphCompiler};

use app::container::DefaultAppContainer;
use cli::{Cli, Commands};
use config_initialization::{initialize_configuration_hierarchy, CliOverrides};
use utils::logging::LoggingSystem;

/// Collect the configuration overrides carried by the command line
pub fn cli_overrides(cli: &Cli) -> CliOverrides {
    let (output_dir, keep_temp) = match &cli.command {
        Commands::Process(args) => (args.output_dir.clone(), args.keep_temp),
        _ => (None, false),
    };
    CliOverrides {
        config_path: cli.config.clone(),
        log_level: cli.log_level,
        log_format: cli.log_format,
        output_dir,
        keep_temp,
    }
}

/// Resolve configuration relative to `base_dir`
pub fn load_config(overrides: &CliOverrides, base_dir: &Path) -> VidfxResult<AppConfig> {
    initialize_configuration_hierarchy(overrides, base_dir).map_err(|e| VidfxError::Config {
        message: e.to_string(),
    })
}

/// Run a parsed command line to completion
pub async fn run(cli: Cli) -> Result<()> {
    let base_dir = std::env::current_dir()?;
    let config = load_config(&cli_overrides(&cli), &base_dir)?;
    LoggingSystem::new(config.logging.clone()).initialize();

    let container = DefaultAppContainer::new(&config).map_err(VidfxError::from)?;

    match cli.command {
        Commands::Process(args) => {
            info!("Executing process command");
            cli::commands::process(&container, args).await
        }
        Commands::Info(args) => {
            info!("Executing info command");
            cli::commands::info(&container, args).await
        }
        Commands::Check(args) => {
            info!("Executing check command");
            cli::commands::check(&container, args).await
        }
    }
}

/// Process exit code for an error returned by [`run`]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(vidfx) = cause.downcast_ref::<VidfxError>() {
            return vidfx.exit_code();
        }
        if let Some(domain) = cause.downcast_ref::<DomainError>() {
            return VidfxError::from(domain.clone()).exit_code();
        }
    }
    1
}
