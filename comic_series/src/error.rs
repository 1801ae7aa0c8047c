use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Config fetch failed: {0}")]
    ConfigFetch(String),
    #[error("Listing fetch failed: {0}")]
    ListingFetch(String),
    #[error("Invalid series config: {0}")]
    InvalidConfig(String),
    #[error("HTTP error {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Operation not supported by this source")]
    Unsupported,
}

impl SourceError {
    /// Short label for the series selector when a fetch fails.
    pub fn selector_label(&self) -> &'static str {
        match self {
            SourceError::ListingFetch(_) | SourceError::HttpStatus { .. } => "Listing error",
            SourceError::ConfigFetch(_) | SourceError::InvalidConfig(_) => "Config error",
            _ => "Error",
        }
    }
}
