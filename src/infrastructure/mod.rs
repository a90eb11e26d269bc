pub mod audio;
pub mod config;
pub mod extractors;
pub mod repositories;
