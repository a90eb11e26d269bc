use std::collections::{BTreeSet, HashSet};

use super::model::Document;

/// Which chunks of a document already have an artifact on disk.
///
/// Built from one directory listing; an artifact counts as done when a file with the
/// chunk's exact name is present.
#[derive(Debug, Clone, PartialEq)]
pub struct JobState {
    total: usize,
    present: BTreeSet<usize>,
}

impl JobState {
    pub fn from_file_names(document: &Document, file_names: &HashSet<String>) -> Self {
        let present = document
            .chunks
            .iter()
            .filter(|chunk| file_names.contains(&chunk.file_name))
            .map(|chunk| chunk.index)
            .collect();

        Self {
            total: document.total_chunks(),
            present,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn present_count(&self) -> usize {
        self.present.len()
    }

    pub fn is_present(&self, index: usize) -> bool {
        self.present.contains(&index)
    }

    /// Indices still lacking an artifact, ascending.
    pub fn missing(&self) -> Vec<usize> {
        (0..self.total).filter(|i| !self.present.contains(i)).collect()
    }

    /// The merge barrier: every expected artifact exists.
    pub fn is_complete(&self) -> bool {
        self.present.len() == self.total
    }
}
