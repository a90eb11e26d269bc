pub mod error;
pub mod service;

pub use error::FinalizeError;
pub use service::{FinalizeService, FinalizedDocument};
