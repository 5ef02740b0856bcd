//! Error types raised by the validation system

use thiserror::Error;

use super::types::Code;

/// A failure signalled to the caller instead of being carried in the verdict.
/// Only produced when `trigger_system_error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("input rejected: {code}, {message}")]
    Rejected { code: Code, message: String },
}

impl ValidationError {
    pub fn code(&self) -> Code {
        match self {
            ValidationError::Rejected { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ValidationError::Rejected { message, .. } => message,
        }
    }
}

/// Malformed limit configuration. Always reported with code 417.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("expected two comma-separated values, got \"{0}\"")]
    FieldCount(String),
    #[error("\"{0}\" is not a valid integer")]
    NotAnInteger(String),
    #[error("\"{0}\" is not a valid number")]
    NotANumber(String),
    #[error("ratio \"{0}\" must be of the form w:h")]
    BadRatio(String),
    #[error("ratio \"{0}\" has a zero height")]
    ZeroHeight(String),
}

/// Failure to retrieve or decode a remote image.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("{0}")]
    Other(String),
}
