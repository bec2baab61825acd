use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use vidfx_cli::app::container::{AppContainer, DefaultAppContainer};
use vidfx_cli::app::inspect_interactor::{InspectRequest, OutputFormat};
use vidfx_cli::app::process_interactor::ProcessRequest;
use vidfx_cli::domain::model::VideoStreamMetadata;
use vidfx_cli::engine::{TranscodeJob, TranscodeReport};
use vidfx_cli::planner::StageKind;
use vidfx_cli::ports::{ExecutePort, ProbePort};
use vidfx_cli::*;

/// Test doubles for the engine ports
mod test_utils {
    use super::*;

    pub struct FakeProbe {
        pub width: u32,
    }

    #[async_trait]
    impl ProbePort for FakeProbe {
        async fn probe_media(&self, file_path: &Path) -> Result<MediaMetadata, DomainError> {
            if !file_path.exists() {
                return Err(DomainError::InputNotFound {
                    path: file_path.display().to_string(),
                });
            }
            Ok(MediaMetadata {
                duration: 30.0,
                size_bytes: 4,
                bitrate_bps: 1_000_000,
                format_name: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
                video: VideoStreamMetadata {
                    codec: "h264".to_string(),
                    width: self.width,
                    height: self.width * 9 / 16,
                    fps: 30.0,
                    aspect_ratio: "16:9".to_string(),
                },
            })
        }

        async fn version(&self) -> Result<String, DomainError> {
            Ok("ffprobe version test".to_string())
        }
    }

    /// Records every job; writes the output unless told to fail
    #[derive(Default)]
    pub struct FakeEngine {
        pub jobs: Mutex<Vec<TranscodeJob>>,
        pub fail_with: Option<DomainError>,
    }

    #[async_trait]
    impl ExecutePort for FakeEngine {
        async fn run(&self, job: &TranscodeJob) -> Result<TranscodeReport, DomainError> {
            // staged inputs must still exist while the engine runs
            assert!(job.primary.exists());
            for aux in &job.graph.aux_inputs {
                assert!(aux.exists());
            }
            self.jobs.lock().unwrap().push(job.clone());

            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            fs::write(&job.output, b"mp4").unwrap();
            Ok(TranscodeReport {
                output_path: job.output.clone(),
                output_size_bytes: 3,
                elapsed_secs: 0.01,
            })
        }

        async fn version(&self) -> Result<String, DomainError> {
            Ok("ffmpeg version test".to_string())
        }
    }

    pub struct Fixture {
        pub dir: TempDir,
        pub config: AppConfig,
        pub engine: Arc<FakeEngine>,
        pub container: DefaultAppContainer,
    }

    impl Fixture {
        pub fn new(width: u32, engine: FakeEngine, keep_temp: bool) -> Self {
            let dir = TempDir::new().unwrap();
            let mut config = AppConfig::default();
            config.paths.staging_dir = dir.path().join("uploads");
            config.paths.output_dir = dir.path().join("outputs");
            config.debug.keep_temp_files = keep_temp;

            let engine = Arc::new(engine);
            let container = DefaultAppContainer::with_ports(
                &config,
                Arc::new(FakeProbe { width }),
                Arc::clone(&engine) as Arc<dyn ExecutePort>,
            );
            Self {
                dir,
                config,
                engine,
                container,
            }
        }

        pub fn file(&self, name: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            fs::write(&path, b"data").unwrap();
            path
        }

        pub fn staged_files(&self) -> Vec<PathBuf> {
            match fs::read_dir(&self.config.paths.staging_dir) {
                Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
                Err(_) => Vec::new(),
            }
        }
    }
}

use test_utils::*;

#[tokio::test]
async fn test_process_with_text_and_logo() {
    let fixture = Fixture::new(1280, FakeEngine::default(), false);
    let mut request = ProcessRequest::new(fixture.file("clip.mp4"));
    request.trim = TrimWindow::new(5.0, Some(10.0)).unwrap();
    request.text_overlays = vec![TextOverlay::new("Hello", 50.0, 90.0).with_window(Some(6.0), None)];
    request.image_overlays =
        vec![ImageOverlay::new("logo.png", 5.0, 5.0).with_window(Some(3.0), Some(8.0))];
    request.logos = vec![("logo.png".to_string(), fixture.file("logo.png"))];

    let response = fixture
        .container
        .process_interactor()
        .execute(request)
        .await
        .unwrap();

    assert!(response.output_path.exists());
    assert!(response.output_path.starts_with(&fixture.config.paths.output_dir));
    let name = response.output_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("processed_clip_"));
    assert!(response.skipped_overlays.is_empty());
    assert!(response
        .filter_complex
        .contains("[1:v]scale=200:200[logo0]"));
    assert!(response
        .filter_complex
        .contains("enable='between(t,0,3)'"));
    assert!(response.filter_complex.contains("fontsize=48"));
    assert!(response.filter_complex.contains("enable='between(t,1,INF)'"));

    let jobs = fixture.engine.jobs.lock().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].trim.start, 5.0);
    assert_eq!(jobs[0].graph.aux_inputs.len(), 1);
    drop(jobs);

    // staged copies are gone once the request finishes
    assert!(fixture.staged_files().is_empty());
}

#[tokio::test]
async fn test_unresolved_logo_is_reported_not_fatal() {
    let fixture = Fixture::new(640, FakeEngine::default(), false);
    let mut request = ProcessRequest::new(fixture.file("clip.mp4"));
    request.image_overlays = vec![
        ImageOverlay::new("missing.png", 0.0, 0.0),
        ImageOverlay::new("logo.png", 10.0, 10.0),
    ];
    request.logos = vec![("logo.png".to_string(), fixture.file("logo.png"))];

    let response = fixture
        .container
        .process_interactor()
        .execute(request)
        .await
        .unwrap();

    assert_eq!(response.skipped_overlays.len(), 1);
    assert!(response.skipped_overlays[0].contains("missing.png"));

    let jobs = fixture.engine.jobs.lock().unwrap();
    assert_eq!(jobs[0].graph.aux_inputs.len(), 1);
    assert_eq!(jobs[0].graph.count(StageKind::Overlay), 1);
}

#[tokio::test]
async fn test_engine_failure_propagates_and_cleans_staging() {
    let engine = FakeEngine {
        fail_with: Some(DomainError::TranscodeFailure {
            exit_code: Some(1),
            diagnostics: "Invalid argument".to_string(),
        }),
        ..FakeEngine::default()
    };
    let fixture = Fixture::new(640, engine, false);
    let request = ProcessRequest::new(fixture.file("clip.mp4"));

    let err = fixture
        .container
        .process_interactor()
        .execute(request)
        .await
        .unwrap_err();

    match err {
        DomainError::TranscodeFailure { diagnostics, .. } => {
            assert_eq!(diagnostics, "Invalid argument")
        }
        other => panic!("expected TranscodeFailure, got {:?}", other),
    }
    assert!(fixture.staged_files().is_empty());
}

#[tokio::test]
async fn test_retained_staging_survives_request() {
    let fixture = Fixture::new(640, FakeEngine::default(), true);
    let request = ProcessRequest::new(fixture.file("clip.mp4"));

    fixture
        .container
        .process_interactor()
        .execute(request)
        .await
        .unwrap();

    let staged = fixture.staged_files();
    assert_eq!(staged.len(), 1);
    assert!(staged[0]
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("proc_"));
}

#[tokio::test]
async fn test_missing_logo_file_skips_its_overlay() {
    let fixture = Fixture::new(640, FakeEngine::default(), false);
    let mut request = ProcessRequest::new(fixture.file("clip.mp4"));
    request.image_overlays = vec![ImageOverlay::new("gone.png", 0.0, 0.0)];
    request.logos = vec![("gone.png".to_string(), fixture.dir.path().join("gone.png"))];

    let response = fixture
        .container
        .process_interactor()
        .execute(request)
        .await
        .unwrap();

    assert_eq!(response.skipped_overlays.len(), 1);
    assert!(response.skipped_overlays[0].contains("gone.png"));
    let jobs = fixture.engine.jobs.lock().unwrap();
    assert!(jobs[0].graph.aux_inputs.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_requests_for_same_source_give_distinct_outputs() {
    let fixture = Fixture::new(640, FakeEngine::default(), false);
    let input = fixture.file("clip.mp4");
    let interactor = fixture.container.process_interactor();

    let (first, second) = tokio::join!(
        interactor.execute(ProcessRequest::new(&input)),
        interactor.execute(ProcessRequest::new(&input)),
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_ne!(first.output_path, second.output_path);
    assert!(first.output_path.exists());
    assert!(second.output_path.exists());
}

#[tokio::test]
async fn test_invalid_overlay_rejected_before_engine() {
    let fixture = Fixture::new(640, FakeEngine::default(), false);
    let mut request = ProcessRequest::new(fixture.file("clip.mp4"));
    request.text_overlays = vec![TextOverlay::default()];

    let err = fixture
        .container
        .process_interactor()
        .execute(request)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidOverlayField { .. }));
    assert!(fixture.engine.jobs.lock().unwrap().is_empty());
    assert!(fixture.staged_files().is_empty());
}

#[tokio::test]
async fn test_missing_input_is_reported() {
    let fixture = Fixture::new(640, FakeEngine::default(), false);
    let request = ProcessRequest::new(fixture.dir.path().join("nope.mp4"));

    let err = fixture
        .container
        .process_interactor()
        .execute(request)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InputNotFound { .. }));
}

#[tokio::test]
async fn test_inspect_formats() {
    let fixture = Fixture::new(1920, FakeEngine::default(), false);
    let input = fixture.file("clip.mp4");
    let interactor = fixture.container.inspect_interactor();

    let text = interactor
        .execute(InspectRequest::new(&input))
        .await
        .unwrap();
    assert!(text.summary.contains("1920x1080"));

    let json = interactor
        .execute(InspectRequest::with_format(&input, OutputFormat::Json))
        .await
        .unwrap();
    let parsed: MediaMetadata = serde_json::from_str(&json.summary).unwrap();
    assert_eq!(parsed, json.metadata);

    let yaml = interactor
        .execute(InspectRequest::with_format(&input, OutputFormat::Yaml))
        .await
        .unwrap();
    assert!(yaml.summary.contains("width: 1920"));
}

#[tokio::test]
async fn test_check_reports_both_tools() {
    let fixture = Fixture::new(640, FakeEngine::default(), false);
    let response = fixture.container.check_interactor().execute().await;
    assert!(response.video_processing_available);
    assert_eq!(
        response.ffmpeg.version.as_deref(),
        Some("ffmpeg version test")
    );
}
