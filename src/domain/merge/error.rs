use std::path::PathBuf;

use crate::infrastructure::audio::AudioError;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("document has no chunk artifacts to merge")]
    NothingToMerge,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("audio error on {path}: {source}")]
    Audio {
        path: PathBuf,
        #[source]
        source: AudioError,
    },
}
