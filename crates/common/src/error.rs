//! Error types shared across Slidecast crates.

use std::path::PathBuf;

/// Top-level error type for Slidecast operations.
#[derive(Debug, thiserror::Error)]
pub enum SlidecastError {
    /// The presentation editor could not open, export, or rasterize the deck.
    #[error("Automation error: {message}")]
    Automation { message: String },

    /// A required input was not provided or does not exist.
    #[error("Missing {what}: {path}")]
    MissingInput { what: String, path: PathBuf },

    /// The external encoder failed to start or exited unsuccessfully.
    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Transcript error: {message}")]
    Transcript { message: String },

    #[error("Timed out after {waited_ms}ms waiting for {what}")]
    Timeout { what: String, waited_ms: u64 },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Timeline error: {message}")]
    Timeline { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SlidecastError.
pub type SlidecastResult<T> = Result<T, SlidecastError>;

impl SlidecastError {
    pub fn automation(msg: impl Into<String>) -> Self {
        Self::Automation {
            message: msg.into(),
        }
    }

    pub fn missing_input(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingInput {
            what: what.into(),
            path: path.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn transcript(msg: impl Into<String>) -> Self {
        Self::Transcript {
            message: msg.into(),
        }
    }

    pub fn timeout(what: impl Into<String>, waited_ms: u64) -> Self {
        Self::Timeout {
            what: what.into(),
            waited_ms,
        }
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline {
            message: msg.into(),
        }
    }

    /// Whether the failure happened before the run touched the filesystem.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. } | Self::InvalidParameter { .. }
        )
    }
}
