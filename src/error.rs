//! Error types for the pod_colors library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pod_colors operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types for color extraction, matching and reporting
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image file could not be opened or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Decoded image has no pixels
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Hex color string could not be parsed
    #[error("Invalid hex color: {value}")]
    InvalidHex { value: String },

    /// Invalid configuration or input parameter
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Extraction strategy name not recognized
    #[error("Unknown extraction strategy: {name}")]
    UnknownStrategy { name: String },

    /// Scan root is missing or unreadable
    #[error("Cannot scan directory {}: {source}", path.display())]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Report could not be read or written
    #[error("Report error: {message}")]
    ReportError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnalysisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a report error with context
    pub fn report<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ReportError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error only affects a single file.
    ///
    /// Batch scans skip files failing with a recoverable error and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::ImageLoadError { .. } | AnalysisError::EmptyImage { .. }
        )
    }

    /// Short reason used in skip lists and log lines
    pub fn skip_reason(&self) -> String {
        match self {
            AnalysisError::ImageLoadError { .. } => "decode error".to_string(),
            AnalysisError::EmptyImage { .. } => "empty image".to_string(),
            other => other.to_string(),
        }
    }
}
