// Domain rules - Alias precedence, geometry scaling, overlay timing and filter escaping

use crate::domain::model::*;

/// Width of the preview overlays are authored against
pub const REFERENCE_PREVIEW_WIDTH: u32 = 640;

/// Precedence resolution for fields accepted under two names.
///
/// Every canonical value is `primary ?? secondary ?? default`. The compiler
/// only ever sees resolved values.
pub mod aliases {
    use super::*;

    /// First value that is present
    pub fn first_present<T>(primary: Option<T>, secondary: Option<T>) -> Option<T> {
        primary.or(secondary)
    }

    /// `fontSize` before `fontsize`, then the default size
    pub fn resolve_font_size(primary: Option<i64>, legacy: Option<i64>) -> u32 {
        first_present(primary, legacy)
            .map(clamp_to_u32)
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// `color` before `fontcolor`, then white. Empty strings count as absent.
    pub fn resolve_color<'a>(primary: Option<&'a str>, legacy: Option<&'a str>) -> &'a str {
        let non_empty = |c: Option<&'a str>| c.filter(|c| !c.trim().is_empty());
        first_present(non_empty(primary), non_empty(legacy)).unwrap_or(DEFAULT_FONT_COLOR)
    }

    /// Image edge length, defaulting to 100 reference pixels
    pub fn resolve_dimension(value: Option<i64>) -> u32 {
        value.map(clamp_to_u32).unwrap_or(DEFAULT_IMAGE_EDGE)
    }

    /// `start` before `startTime` (default 0); `end` before `endTime` (default unbounded)
    pub fn resolve_window(
        start: Option<f64>,
        start_time: Option<f64>,
        end: Option<f64>,
        end_time: Option<f64>,
    ) -> RawWindow {
        RawWindow {
            start: first_present(start, start_time).unwrap_or(0.0),
            end: first_present(end, end_time),
        }
    }

    fn clamp_to_u32(value: i64) -> u32 {
        value.clamp(1, i64::from(u32::MAX)) as u32
    }
}

/// Maps preview-relative sizes onto the probed source resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingCalculator {
    reference_width: u32,
}

impl Default for ScalingCalculator {
    fn default() -> Self {
        Self::new(REFERENCE_PREVIEW_WIDTH)
    }
}

impl ScalingCalculator {
    /// Create a calculator for overlays authored against `reference_width`
    pub fn new(reference_width: u32) -> Self {
        Self {
            reference_width: reference_width.max(1),
        }
    }

    pub fn reference_width(&self) -> u32 {
        self.reference_width
    }

    /// Ratio between the source width and the reference width.
    ///
    /// An unknown (zero) source width keeps overlays at their authored size.
    pub fn ratio(&self, video_width: u32) -> f64 {
        if video_width == 0 {
            return 1.0;
        }
        f64::from(video_width) / f64::from(self.reference_width)
    }

    /// Scale a declared size, rounding half to even and never below one pixel
    pub fn scale(&self, declared: u32, video_width: u32) -> u32 {
        let scaled = (f64::from(declared) * self.ratio(video_width)).round_ties_even();
        scaled.clamp(1.0, f64::from(u32::MAX)) as u32
    }
}

/// Re-bases overlay timing from the source timeline onto the trimmed output timeline
pub struct TimeWindowResolver;

impl TimeWindowResolver {
    /// Shift a window by the trim start, clamping at zero.
    ///
    /// Windows that end before the trim point collapse but are not rejected.
    pub fn resolve(raw: RawWindow, trim_start: f64) -> TimeWindow {
        TimeWindow {
            start: (raw.start - trim_start).max(0.0),
            end: raw.end.map(|end| (end - trim_start).max(0.0)),
        }
    }
}

/// Escaping for values embedded in a filter graph description.
///
/// ffmpeg unescapes a filter graph twice: once when splitting the graph
/// into filters and once when splitting a filter's arguments into options.
/// drawtext additionally expands `%{...}` sequences in its text.
pub struct FilterEscaper;

impl FilterEscaper {
    /// Escape text for drawtext's `text` option
    pub fn drawtext_text(text: &str) -> String {
        Self::graph_level(&Self::option_level(&Self::expansion_level(text)))
    }

    /// Escape a plain option value such as a color
    pub fn option_value(value: &str) -> String {
        Self::graph_level(&Self::option_level(value))
    }

    fn expansion_level(text: &str) -> String {
        escape_chars(text, &['\\', '%'])
    }

    fn option_level(text: &str) -> String {
        escape_edge_whitespace(&escape_chars(text, &['\\', '\'', ':']))
    }

    fn graph_level(text: &str) -> String {
        escape_chars(text, &['\\', '\'', '[', ']', ',', ';'])
    }
}

/// Whitespace the option tokenizer trims from unescaped value ends
const TRIMMED_WHITESPACE: [char; 4] = [' ', '\t', '\n', '\r'];

fn escape_edge_whitespace(text: &str) -> String {
    let body_start = text.len() - text.trim_start_matches(&TRIMMED_WHITESPACE[..]).len();
    let body_end = text.trim_end_matches(&TRIMMED_WHITESPACE[..]).len().max(body_start);

    let mut escaped = String::with_capacity(text.len() + 8);
    escaped.push_str(&escape_chars(&text[..body_start], &TRIMMED_WHITESPACE));
    escaped.push_str(&text[body_start..body_end]);
    escaped.push_str(&escape_chars(&text[body_end..], &TRIMMED_WHITESPACE));
    escaped
}

fn escape_chars(text: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        if special.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
