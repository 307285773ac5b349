/*!
 * Error types for the sccfix application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Terminal failures of a single caption correction job.
///
/// None of these are retried: a job either produces a fully corrected file
/// or reports exactly one of these kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrectionError {
    /// Missing or malformed job fields, raised before any processing
    #[error("Validation error: {0}")]
    Validation(String),

    /// A timecode could not be parsed at the deduced frame rate
    #[error("Timecode format error: {0}")]
    Format(String),

    /// Starting timecodes fall outside the supported correction window
    #[error("Out of spec: {0}")]
    OutOfSpec(String),

    /// No defect was detected
    #[error("No correction needed: {0}")]
    NoCorrectionNeeded(String),
}

impl CorrectionError {
    /// Stable identifier reported on the result channel
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Format(_) => "format",
            Self::OutOfSpec(_) => "out_of_spec",
            Self::NoCorrectionNeeded(_) => "no_correction_needed",
        }
    }
}

/// Errors raised by object storage backends
#[derive(Error, Debug)]
pub enum StorageError {
    /// The object URL could not be understood
    #[error("Invalid object url: {0}")]
    InvalidUrl(String),

    /// The requested object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The object exists but is not valid UTF-8 text
    #[error("Object is not valid text: {0}")]
    NotText(String),

    /// Underlying I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while publishing result records
#[derive(Error, Debug)]
pub enum ResultChannelError {
    /// The record could not be serialized
    #[error("Failed to serialize result record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The webhook endpoint rejected the record
    #[error("Result endpoint responded with error: {status_code} - {message}")]
    Rejected {
        /// HTTP status code
        status_code: u16,
        /// Response body
        message: String,
    },

    /// Transport failure
    #[error("Failed to deliver result record: {0}")]
    Delivery(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the correction engine
    #[error("Correction error: {0}")]
    Correction(#[from] CorrectionError),

    /// Error from object storage
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error from the result channel
    #[error("Result channel error: {0}")]
    ResultChannel(#[from] ResultChannelError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Stable identifier reported on the result channel
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Correction(inner) => inner.kind(),
            Self::Storage(_) => "storage",
            Self::ResultChannel(_) => "result_channel",
            Self::Config(_) => "config",
            Self::File(_) => "file",
            Self::Unknown(_) => "unknown",
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
