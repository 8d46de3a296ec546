use std::error::Error;
use std::io;

/// Error types for media acquisition (fetch + transcode).
#[derive(Debug)]
pub enum MediaError {
    FetchFailed(String),
    TranscodeFailed(String),
    InvalidSource(String),
    MissingOutput(String),
    IoError(io::Error),
    NetworkError(reqwest::Error),
}

impl std::fmt::Display for MediaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaError::FetchFailed(s) => write!(f, "Fetch failed: {}", s),
            MediaError::TranscodeFailed(s) => write!(f, "Transcode failed: {}", s),
            MediaError::InvalidSource(s) => write!(f, "Invalid source: {}", s),
            MediaError::MissingOutput(s) => write!(f, "Expected output file missing: {}", s),
            MediaError::IoError(e) => write!(f, "I/O error: {}", e),
            MediaError::NetworkError(e) => write!(f, "Network error: {}", e),
        }
    }
}

impl Error for MediaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MediaError::IoError(e) => Some(e),
            MediaError::NetworkError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MediaError {
    fn from(e: io::Error) -> Self {
        MediaError::IoError(e)
    }
}

impl From<reqwest::Error> for MediaError {
    fn from(e: reqwest::Error) -> Self {
        MediaError::NetworkError(e)
    }
}
