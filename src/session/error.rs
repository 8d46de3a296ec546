use crate::audio::AudioError;
use std::error::Error;

/// Error types for voice session lifecycle operations.
#[derive(Debug)]
pub enum SessionError {
    JoinFailed(String),
    Audio(AudioError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::JoinFailed(s) => write!(f, "Failed to join voice channel: {}", s),
            SessionError::Audio(e) => write!(f, "Audio error: {}", e),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Audio(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AudioError> for SessionError {
    fn from(e: AudioError) -> Self {
        SessionError::Audio(e)
    }
}
