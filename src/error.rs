//! Application error type
//!
//! Every failure a view can hit ends up as one of these variants and is
//! shown to the user as an inline, dismissible message.

use thiserror::Error;

/// Errors raised by the compositor, the slider, file intake and the image API
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing prompt, file or text; caught before any network or compute call
    #[error("{0}")]
    Validation(String),

    /// API or network failure, message surfaced verbatim
    #[error("{0}")]
    Remote(String),

    /// Base image could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Drawing surface could not be created or encoded
    #[error("Failed to render image: {0}")]
    Render(String),

    /// Data URL could not be split into header and payload
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Comparison container has no usable width
    #[error("Comparison container has degenerate width {width}")]
    DegenerateLayout { width: f32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short category name, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Remote(_) => "remote",
            AppError::Decode(_) => "decode",
            AppError::Render(_) => "render",
            AppError::InvalidFormat(_) => "invalid_format",
            AppError::DegenerateLayout { .. } => "degenerate_layout",
            AppError::Io(_) => "io",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
