//! Converts long-form documents into duration-bounded audiobook parts.
//!
//! Text is split into fixed-size chunks, each chunk is synthesized through a remote
//! speech API and stored on disk, and the stored chunks are merged into final parts
//! once every chunk of a document is present. The chunk directory doubles as the job
//! ledger, so an interrupted run resumes without paying for chunks twice.

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{AppError, AppResult};
