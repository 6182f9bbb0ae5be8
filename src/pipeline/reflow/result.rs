//! Batch results.

use crate::core::ReflowError;
use crate::domain::AssembledDocument;

/// A document that could not be processed.
#[derive(Debug)]
pub struct DocumentFailure {
    pub document_id: String,
    pub error: ReflowError,
}

/// Per-document results of a batch run.
///
/// A failed document never prevents the others from being processed, so a
/// batch outcome generally carries both successes and failures.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Assembled documents in ascending document id order.
    pub documents: Vec<AssembledDocument>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.documents.len() + self.failures.len()
    }

    /// Finds an assembled document by id.
    pub fn document(&self, id: &str) -> Option<&AssembledDocument> {
        self.documents.iter().find(|d| d.id == id)
    }
}
