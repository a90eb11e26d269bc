use std::path::PathBuf;

use crate::infrastructure::audio::AudioError;

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("provider returned unusable audio: {0}")]
    InvalidAudio(#[from] AudioError),

    #[error("failed to store artifact {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SynthesisError {
    /// Remote failures are worth another attempt; local storage failures are not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SynthesisError::Store { .. })
    }
}
