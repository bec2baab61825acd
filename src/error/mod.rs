//! Error handling module for vidfx

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Crate-level error type
#[derive(Error, Debug)]
pub enum VidfxError {
    /// Failure in probing, compiling or transcoding
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Overlay JSON could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VidfxError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            VidfxError::Domain(DomainError::BadArgs(_))
            | VidfxError::Domain(DomainError::InvalidOverlayField { .. })
            | VidfxError::Config { .. }
            | VidfxError::Json(_) => 2,
            VidfxError::Domain(DomainError::InputNotFound { .. }) => 3,
            VidfxError::Domain(DomainError::EngineUnavailable { .. }) => 4,
            _ => 1,
        }
    }
}

/// Result type alias for vidfx operations
pub type VidfxResult<T> = std::result::Result<T, VidfxError>;
