//! Unified error type for the viewer application.

use thiserror::Error;

/// All errors that can occur in the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Settings error: {0}")]
    Settings(String),
    #[error(transparent)]
    Source(#[from] comic_series::error::SourceError),
    #[error("Background task failed: {0}")]
    Task(String),
}
