pub mod error;
pub mod service;

pub use error::SynthesisError;
pub use service::{ChunkFailure, DispatchReport, DispatchSettings, SynthesisService};
