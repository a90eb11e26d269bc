pub mod document;
pub mod finalize;
pub mod merge;
pub mod pipeline;
pub mod shared;
pub mod synthesis;
