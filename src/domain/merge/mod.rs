pub mod error;
pub mod packer;
pub mod service;

pub use error::MergeError;
pub use packer::{plan_segments, GreedyPacker};
pub use service::{MergeService, MergedSegment};
