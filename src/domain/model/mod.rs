// Domain models - Request, overlay and media metadata types

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::rules::aliases;

/// Default overlay position, as a percentage of the frame
pub const DEFAULT_POSITION_PERCENT: f64 = 50.0;

/// Default font size in reference-preview pixels
pub const DEFAULT_FONT_SIZE: u32 = 24;

/// Default font color
pub const DEFAULT_FONT_COLOR: &str = "white";

/// Default image overlay edge length in reference-preview pixels
pub const DEFAULT_IMAGE_EDGE: u32 = 100;

/// Primary video stream attributes reported by the probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamMetadata {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub aspect_ratio: String,
}

/// Container and primary video stream metadata of a media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Duration in seconds
    pub duration: f64,
    pub size_bytes: u64,
    pub bitrate_bps: u64,
    pub format_name: String,
    pub video: VideoStreamMetadata,
}

impl MediaMetadata {
    /// Frame dimensions of the primary video stream
    pub fn resolution(&self) -> (u32, u32) {
        (self.video.width, self.video.height)
    }
}

/// Brightness, contrast and saturation adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentParams {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
}

impl Default for AdjustmentParams {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

impl AdjustmentParams {
    /// Create adjustment parameters with range validation
    pub fn new(brightness: f64, contrast: f64, saturation: f64) -> Result<Self, DomainError> {
        let params = Self {
            brightness,
            contrast,
            saturation,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every component against its accepted range
    pub fn validate(&self) -> Result<(), DomainError> {
        check_range("brightness", self.brightness, -1.0, 1.0)?;
        check_range("contrast", self.contrast, 0.0, 4.0)?;
        check_range("saturation", self.saturation, 0.0, 4.0)?;
        Ok(())
    }
}

/// Sub-interval of the source selected for output
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrimWindow {
    /// Seek position in seconds
    pub start: f64,
    /// Duration to keep; `None` keeps everything until the end of the source
    pub duration: Option<f64>,
}

impl TrimWindow {
    /// Create a trim window, rejecting negative or non-finite values
    pub fn new(start: f64, duration: Option<f64>) -> Result<Self, DomainError> {
        if !start.is_finite() || start < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Trim start must be a non-negative number of seconds, got {}",
                start
            )));
        }
        if let Some(duration) = duration {
            if !duration.is_finite() || duration < 0.0 {
                return Err(DomainError::BadArgs(format!(
                    "Trim duration must be a non-negative number of seconds, got {}",
                    duration
                )));
            }
        }
        Ok(Self { start, duration })
    }
}

/// Overlay timing after alias resolution, on the untrimmed source timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawWindow {
    pub start: f64,
    pub end: Option<f64>,
}

/// Overlay timing re-based onto the output timeline
///
/// `end == None` means the overlay stays active until the clip ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: Option<f64>,
}

impl TimeWindow {
    pub fn is_unbounded(&self) -> bool {
        self.end.is_none()
    }

    /// A window that can never render (it ended at or before it began)
    pub fn is_inert(&self) -> bool {
        matches!(self.end, Some(end) if end <= self.start)
    }
}

/// Timed text overlay as authored against the preview
///
/// Both the current and the legacy field names are accepted. Use the
/// accessor methods to read canonical values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextOverlay {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_position")]
    pub x: f64,
    #[serde(default = "default_position")]
    pub y: f64,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default, rename = "startTime")]
    pub start_time: Option<f64>,
    #[serde(default, rename = "endTime")]
    pub end_time: Option<f64>,
    #[serde(default, rename = "fontSize")]
    pub font_size: Option<i64>,
    #[serde(default, rename = "fontsize")]
    pub legacy_font_size: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, rename = "fontcolor")]
    pub legacy_color: Option<String>,
}

impl TextOverlay {
    /// Create a text overlay at the given position with default styling
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: Some(text.into()),
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_window(mut self, start: Option<f64>, end: Option<f64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Canonical font size in reference-preview pixels
    pub fn font_size(&self) -> u32 {
        aliases::resolve_font_size(self.font_size, self.legacy_font_size)
    }

    /// Canonical font color
    pub fn color(&self) -> &str {
        aliases::resolve_color(self.color.as_deref(), self.legacy_color.as_deref())
    }

    /// Canonical timing on the source timeline
    pub fn raw_window(&self) -> RawWindow {
        aliases::resolve_window(self.start, self.start_time, self.end, self.end_time)
    }

    /// Validate the overlay at position `index` of the request
    pub fn validate(&self, index: usize) -> Result<(), DomainError> {
        let field = |name: &str| format!("textOverlays[{}].{}", index, name);

        match self.text.as_deref() {
            None => {
                return Err(DomainError::invalid_field(field("text"), "field is required"))
            }
            Some(text) if text.trim().is_empty() => {
                return Err(DomainError::invalid_field(
                    field("text"),
                    "must not be empty or only whitespace",
                ))
            }
            Some(_) => {}
        }

        check_percent(&field("x"), self.x)?;
        check_percent(&field("y"), self.y)?;
        check_times(&field, self.start, self.end, self.start_time, self.end_time)?;
        check_min_size(&field("fontSize"), self.font_size)?;
        check_min_size(&field("fontsize"), self.legacy_font_size)?;
        Ok(())
    }
}

/// Timed image overlay (logo) as authored against the preview
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageOverlay {
    /// Key into the staged-file map
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default = "default_position")]
    pub x: f64,
    #[serde(default = "default_position")]
    pub y: f64,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default, rename = "startTime")]
    pub start_time: Option<f64>,
    #[serde(default, rename = "endTime")]
    pub end_time: Option<f64>,
}

impl ImageOverlay {
    /// Create an image overlay at the given position with the default size
    pub fn new(source_ref: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            filename: Some(source_ref.into()),
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_window(mut self, start: Option<f64>, end: Option<f64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn source_ref(&self) -> &str {
        self.filename.as_deref().unwrap_or_default()
    }

    /// Canonical size in reference-preview pixels
    pub fn size(&self) -> (u32, u32) {
        (
            aliases::resolve_dimension(self.width),
            aliases::resolve_dimension(self.height),
        )
    }

    /// Canonical timing on the source timeline
    pub fn raw_window(&self) -> RawWindow {
        aliases::resolve_window(self.start, self.start_time, self.end, self.end_time)
    }

    /// Validate the overlay at position `index` of the request
    pub fn validate(&self, index: usize) -> Result<(), DomainError> {
        let field = |name: &str| format!("logoOverlays[{}].{}", index, name);

        match self.filename.as_deref() {
            None => {
                return Err(DomainError::invalid_field(
                    field("filename"),
                    "field is required",
                ))
            }
            Some(name) if name.is_empty() => {
                return Err(DomainError::invalid_field(
                    field("filename"),
                    "must not be empty",
                ))
            }
            Some(_) => {}
        }

        check_percent(&field("x"), self.x)?;
        check_percent(&field("y"), self.y)?;
        check_min_size(&field("width"), self.width)?;
        check_min_size(&field("height"), self.height)?;
        check_times(&field, self.start, self.end, self.start_time, self.end_time)?;
        Ok(())
    }
}

fn default_position() -> f64 {
    DEFAULT_POSITION_PERCENT
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < min || value > max {
        return Err(DomainError::BadArgs(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

fn check_percent(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(DomainError::invalid_field(
            field,
            format!("must be a percentage between 0 and 100, got {}", value),
        ));
    }
    Ok(())
}

fn check_min_size(field: &str, value: Option<i64>) -> Result<(), DomainError> {
    match value {
        Some(v) if v < 1 => Err(DomainError::invalid_field(
            field,
            format!("must be at least 1, got {}", v),
        )),
        _ => Ok(()),
    }
}

fn check_times(
    field: &dyn Fn(&str) -> String,
    start: Option<f64>,
    end: Option<f64>,
    start_time: Option<f64>,
    end_time: Option<f64>,
) -> Result<(), DomainError> {
    let named = [
        ("start", start),
        ("end", end),
        ("startTime", start_time),
        ("endTime", end_time),
    ];
    for (name, value) in named {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(DomainError::invalid_field(
                    field(name),
                    format!("must be a non-negative number of seconds, got {}", v),
                ));
            }
        }
    }
    Ok(())
}
