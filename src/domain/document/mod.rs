pub mod chunker;
pub mod job_state;
pub mod model;
pub mod naming;

pub use chunker::split_text;
pub use job_state::JobState;
pub use model::{document_name, Chunk, Document, DocumentLayout, DocumentMetadata};
pub use naming::{part_file_name, provisional_segment_name};
