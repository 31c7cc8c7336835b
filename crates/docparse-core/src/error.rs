//! Error types for docparse.
//!
//! [`ParseError`] is the single failure contract of the pipeline. Extraction
//! capabilities report [`ExtractError`], which the dispatch layer re-wraps as
//! [`ParseError::ExtractionFailed`] before anything reaches a caller.

use thiserror::Error;

use crate::formats::supported_list;

/// Failure outcome of a pipeline invocation.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A required input (URL, filename) was missing or blank
    #[error("{0}")]
    InvalidInput(String),

    /// The name has no derivable extension
    #[error("Cannot determine file type from {name}")]
    UndeterminedFormat { name: String },

    /// The extension is present but not supported
    #[error("Unsupported file type: {extension}. Supported formats: {supported}", supported = supported_list())]
    UnsupportedFormat { extension: String },

    #[error("File download timed out")]
    TransferTimeout,

    #[error("Connection error during file download: {0}")]
    TransferConnectionFailed(String),

    #[error("HTTP error during file download: {status}")]
    TransferHttp { status: u16 },

    #[error("File download failed: {0}")]
    TransferFailed(String),

    /// The acquired bytes were empty
    #[error("File is empty")]
    EmptyInput,

    /// The scoped resource vanished before dispatch
    #[error("File does not exist")]
    ResourceMissing,

    /// The selected capability failed
    #[error("Failed to parse {label} file: {detail}")]
    ExtractionFailed { label: &'static str, detail: String },

    /// Extraction succeeded but produced only whitespace
    #[error("Document appears to be empty or contains no extractable text")]
    EmptyContent,

    /// Creating or writing the local temporary resource failed
    #[error("temporary resource error: {0}")]
    Resource(#[from] std::io::Error),
}

impl ParseError {
    /// Stable machine-readable code for this failure kind.
    ///
    /// Front-ends map these onto their own status codes.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UndeterminedFormat { .. } => "undetermined_format",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::TransferTimeout => "transfer_timeout",
            Self::TransferConnectionFailed(_) => "transfer_connection_failed",
            Self::TransferHttp { .. } => "transfer_http_error",
            Self::TransferFailed(_) => "transfer_failed",
            Self::EmptyInput => "empty_input",
            Self::ResourceMissing => "resource_missing",
            Self::ExtractionFailed { .. } => "extraction_failed",
            Self::EmptyContent => "empty_content",
            Self::Resource(_) => "resource_error",
        }
    }

    /// Whether this failure came from the remote transfer step.
    #[must_use]
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            Self::TransferTimeout
                | Self::TransferConnectionFailed(_)
                | Self::TransferHttp { .. }
                | Self::TransferFailed(_)
        )
    }
}

/// Errors raised inside a single extraction capability.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Failed(String),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ParseError>;
