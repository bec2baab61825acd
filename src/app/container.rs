use std::sync::Arc;

use crate::adapters::toml_config::AppConfig;
use crate::adapters::{FFmpegAdapter, FFprobeAdapter, StagingArea};
use crate::app::{
    check_interactor::CheckInteractor, inspect_interactor::InspectInteractor,
    process_interactor::ProcessInteractor,
};
use crate::domain::errors::DomainError;
use crate::domain::rules::ScalingCalculator;
use crate::planner::FilterGraphCompiler;
use crate::ports::{ExecutePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn process_interactor(&self) -> Arc<ProcessInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn check_interactor(&self) -> Arc<CheckInteractor>;
}

pub struct DefaultAppContainer {
    process_interactor: Arc<ProcessInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    check_interactor: Arc<CheckInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffprobe/ffmpeg adapters from configuration
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let probe_port: Arc<dyn ProbePort> =
            Arc::new(FFprobeAdapter::new(&config.engine.ffprobe_path));
        let execute_port: Arc<dyn ExecutePort> = Arc::new(
            FFmpegAdapter::new(&config.engine.ffmpeg_path)
                .with_settings(config.encode.clone())
                .with_timeout(config.engine.timeout()),
        );
        Ok(Self::with_ports(config, probe_port, execute_port))
    }

    /// Wire interactors around the given ports
    pub fn with_ports(
        config: &AppConfig,
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
    ) -> Self {
        let compiler = FilterGraphCompiler::new(ScalingCalculator::new(
            config.overlay.reference_width,
        ))
        .with_pixel_format(config.encode.pixel_format.clone());
        let staging = StagingArea::new(
            &config.paths.staging_dir,
            config.debug.keep_temp_files,
        );

        let process_interactor = Arc::new(ProcessInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            compiler,
            staging,
            &config.paths.output_dir,
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(Arc::clone(&probe_port)));

        let check_interactor = Arc::new(CheckInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            &config.engine.ffmpeg_path,
            &config.engine.ffprobe_path,
        ));

        Self {
            process_interactor,
            inspect_interactor,
            check_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn process_interactor(&self) -> Arc<ProcessInteractor> {
        Arc::clone(&self.process_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn check_interactor(&self) -> Arc<CheckInteractor> {
        Arc::clone(&self.check_interactor)
    }
}
