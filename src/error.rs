use crate::domain::finalize::FinalizeError;
use crate::domain::merge::MergeError;
use crate::infrastructure::config::ConfigError;

/// Main application error type
///
/// Chunk and extraction failures never get here: they are contained in the
/// document's outcome. Only configuration errors stop the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("Finalize failed: {0}")]
    Finalize(#[from] FinalizeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
