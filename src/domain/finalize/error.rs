use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FinalizeError {
    #[error("provisional segment {path} is missing")]
    SegmentMissing { path: PathBuf },

    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to archive {from} to {to}: {source}")]
    Archive {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
