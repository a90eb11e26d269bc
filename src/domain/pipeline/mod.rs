pub mod model;
pub mod service;

pub use model::{DocumentOutcome, DocumentReport, PipelineSettings, RunSummary};
pub use service::PipelineService;
