// Domain errors - Error taxonomy for probing, compiling and transcoding

use thiserror::Error;

/// Domain-specific error types
///
/// Everything except [`DomainError::UnresolvedOverlaySource`] aborts the
/// request. Unresolved overlay sources are recorded as compile diagnostics
/// and the overlay is dropped from the graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// Input media file does not exist
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    /// The probing tool exited non-zero
    #[error("ffprobe failed: {diagnostics}")]
    ProbeFailure { diagnostics: String },

    /// The probing tool produced output that could not be parsed
    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParseFailure(String),

    /// No video stream entry in the probe output
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A required overlay field is present but malformed
    #[error("Invalid overlay field '{field}': {reason}")]
    InvalidOverlayField { field: String, reason: String },

    /// An image overlay references a source that was not staged
    #[error("Overlay source '{source_ref}' could not be resolved: {reason}")]
    UnresolvedOverlaySource { source_ref: String, reason: String },

    /// The execution engine could not be started at all
    #[error("Failed to execute {program}: {message}")]
    EngineUnavailable { program: String, message: String },

    /// The execution engine exited non-zero
    #[error("FFmpeg failed with exit code {}: {diagnostics}", exit_code_label(.exit_code))]
    TranscodeFailure {
        exit_code: Option<i32>,
        diagnostics: String,
    },

    /// The execution engine reported success but left no output behind
    #[error("FFmpeg completed but output file was not created: {path}")]
    OutputMissingAfterSuccessExit { path: String },

    /// The execution engine exceeded the configured time budget and was killed
    #[error("FFmpeg did not finish within {seconds}s and was terminated")]
    TranscodeTimeout { seconds: u64 },

    /// Filesystem operation failed
    #[error("Filesystem error: {0}")]
    FsFail(String),
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl DomainError {
    /// Whether processing may continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DomainError::UnresolvedOverlaySource { .. })
    }

    pub(crate) fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidOverlayField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unresolved_source_is_recoverable() {
        let skip = DomainError::UnresolvedOverlaySource {
            source_ref: "logo.png".to_string(),
            reason: "not staged".to_string(),
        };
        assert!(skip.is_recoverable());
        assert!(!DomainError::NoVideoStream.is_recoverable());
        assert!(!DomainError::TranscodeTimeout { seconds: 5 }.is_recoverable());
    }

    #[test]
    fn test_transcode_failure_display_carries_diagnostics() {
        let err = DomainError::TranscodeFailure {
            exit_code: Some(1),
            diagnostics: "Invalid argument".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "FFmpeg failed with exit code 1: Invalid argument"
        );

        let signalled = DomainError::TranscodeFailure {
            exit_code: None,
            diagnostics: String::new(),
        };
        assert!(signalled.to_string().contains("exit code none"));
    }

    #[test]
    fn test_missing_output_is_distinct_from_engine_failure() {
        let err = DomainError::OutputMissingAfterSuccessExit {
            path: "outputs/a.mp4".to_string(),
        };
        assert!(!matches!(err, DomainError::TranscodeFailure { .. }));
    }
}
