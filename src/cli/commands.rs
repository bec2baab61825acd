//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::inspect_interactor::InspectRequest;
use crate::app::process_interactor::{ProcessRequest, ProcessResponse};
use crate::cli::args::{CheckArgs, InfoArgs, ProcessArgs};
use crate::domain::errors::DomainError;
use crate::domain::model::{AdjustmentParams, TrimWindow};
use crate::error::VidfxResult;
use crate::utils::Utils;

/// Execute the process command
pub async fn process(container: &DefaultAppContainer, args: ProcessArgs) -> Result<()> {
    let request = build_process_request(&args)?;
    ensure_exists(&request.input)?;
    let response = container
        .process_interactor()
        .execute(request)
        .await
        .context("Video processing failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_process_summary(&response);
    }
    Ok(())
}

/// Turn parsed arguments into a validated request
pub fn build_process_request(args: &ProcessArgs) -> Result<ProcessRequest> {
    let trim = TrimWindow::new(args.trim_start, args.trim_duration)
        .context("Invalid trim window")?;
    let adjustment = AdjustmentParams::new(args.brightness, args.contrast, args.saturation)
        .context("Invalid color adjustment")?;

    let text_overlays = match &args.text_overlays {
        Some(source) => parse_overlays(source).context("Invalid text overlays")?,
        None => Vec::new(),
    };
    let image_overlays = match &args.logo_overlays {
        Some(source) => parse_overlays(source).context("Invalid logo overlays")?,
        None => Vec::new(),
    };
    let logos = args
        .logos
        .iter()
        .map(|spec| parse_logo_spec(spec))
        .collect::<Result<Vec<_>>>()?;

    let request = ProcessRequest {
        input: args.input.clone(),
        trim,
        adjustment,
        text_overlays,
        image_overlays,
        logos,
    };
    request.validate().context("Invalid overlay data")?;
    Ok(request)
}

/// Decode an overlay list given inline or as `@path`
pub fn parse_overlays<T: DeserializeOwned>(source: &str) -> VidfxResult<Vec<T>> {
    let text = match source.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)?,
        None => source.to_string(),
    };
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&text)?)
}

/// Split `NAME=PATH`; a bare path is named after its file name
pub fn parse_logo_spec(spec: &str) -> Result<(String, PathBuf)> {
    let (name, path) = match spec.split_once('=') {
        Some((name, path)) => (name.trim().to_string(), PathBuf::from(path.trim())),
        None => {
            let path = PathBuf::from(spec.trim());
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            (name, path)
        }
    };
    if name.is_empty() || path.as_os_str().is_empty() {
        anyhow::bail!("Invalid logo '{}', expected NAME=PATH", spec);
    }
    Ok((name, path))
}

fn print_process_summary(response: &ProcessResponse) {
    println!("{}", response.output_path.display());
    for skipped in &response.skipped_overlays {
        eprintln!("skipped overlay: {}", skipped);
    }
    info!(
        size = %Utils::format_file_size(response.report.output_size_bytes),
        elapsed = %Utils::format_seconds(response.report.elapsed_secs),
        "Output written"
    );
}

/// Execute the info command
pub async fn info(container: &DefaultAppContainer, args: InfoArgs) -> Result<()> {
    ensure_exists(&args.input)?;
    let response = container
        .inspect_interactor()
        .execute(InspectRequest::with_format(&args.input, args.format))
        .await
        .context("Failed to inspect input file")?;
    print!("{}", response.summary);
    if !response.summary.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Execute the check command; fails when either binary is unusable
pub async fn check(container: &DefaultAppContainer, args: CheckArgs) -> Result<()> {
    let response = container.check_interactor().execute().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        for (name, status) in [("ffmpeg", &response.ffmpeg), ("ffprobe", &response.ffprobe)] {
            match (&status.version, &status.error) {
                (Some(version), _) => println!(
                    "{}: installed ({}) {}",
                    name,
                    status
                        .path
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "path unknown".to_string()),
                    version
                ),
                (None, error) => println!(
                    "{}: not available ({})",
                    name,
                    error.as_deref().unwrap_or("unknown error")
                ),
            }
        }
    }

    if !response.video_processing_available {
        anyhow::bail!("Video processing is not available");
    }
    Ok(())
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DomainError::InputNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ImageOverlay, TextOverlay};
    use crate::error::VidfxError;

    fn args() -> ProcessArgs {
        ProcessArgs {
            input: PathBuf::from("in.mp4"),
            trim_start: 0.0,
            trim_duration: None,
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            text_overlays: None,
            logo_overlays: None,
            logos: Vec::new(),
            output_dir: None,
            keep_temp: false,
            json: false,
        }
    }

    #[test]
    fn test_logo_spec_parsing() {
        assert_eq!(
            parse_logo_spec("brand=/tmp/a.png").unwrap(),
            ("brand".to_string(), PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            parse_logo_spec("/tmp/a.png").unwrap(),
            ("a.png".to_string(), PathBuf::from("/tmp/a.png"))
        );
        assert!(parse_logo_spec("=/tmp/a.png").is_err());
        assert!(parse_logo_spec("brand=").is_err());
    }

    #[test]
    fn test_overlays_from_inline_and_file() {
        let inline: Vec<TextOverlay> = parse_overlays(r#"[{"text": "hi"}]"#).unwrap();
        assert_eq!(inline.len(), 1);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logos.json");
        std::fs::write(&path, r#"[{"filename": "a.png", "width": 50}]"#).unwrap();
        let from_file: Vec<ImageOverlay> =
            parse_overlays(&format!("@{}", path.display())).unwrap();
        assert_eq!(from_file[0].size(), (50, 100));

        let empty: Vec<TextOverlay> = parse_overlays("  ").unwrap();
        assert!(empty.is_empty());
        assert!(parse_overlays::<TextOverlay>("{not json").is_err());
    }

    #[test]
    fn test_overlay_errors_map_to_exit_codes() {
        let err = parse_overlays::<TextOverlay>("[{\"text\": ").unwrap_err();
        assert!(matches!(err, VidfxError::Json(_)));
        assert_eq!(err.exit_code(), 2);

        let err = parse_overlays::<ImageOverlay>("@/no/such/overlays.json").unwrap_err();
        assert!(matches!(err, VidfxError::Io(_)));

        let mut bad = args();
        bad.logo_overlays = Some("[1, 2".to_string());
        let err = build_process_request(&bad).unwrap_err();
        assert_eq!(crate::exit_code_for(&err), 2);
    }

    #[test]
    fn test_request_validation_happens_before_processing() {
        let mut bad = args();
        bad.text_overlays = Some(r#"[{"text": "a", "x": 150}]"#.to_string());
        assert!(build_process_request(&bad).is_err());

        let mut bad = args();
        bad.brightness = 2.0;
        assert!(build_process_request(&bad).is_err());

        let mut good = args();
        good.trim_start = 5.0;
        good.trim_duration = Some(10.0);
        good.logos = vec!["logo.png=/tmp/logo.png".to_string()];
        let request = build_process_request(&good).unwrap();
        assert_eq!(request.trim.duration, Some(10.0));
        assert_eq!(request.logos[0].0, "logo.png");
    }
}
