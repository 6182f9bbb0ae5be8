//! Collaborator traits for the text and author stages.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐         ┌──────────────┐
//! │WordSegmenter │───▶│SpellCorrector│   ...   │NameRecognizer│
//! │• segment     │    │• correct     │         │• recognize   │
//! └──────────────┘    └──────────────┘         └──────────────┘
//!   TextNormalizer spacing repair             ReadingOrderAssembler
//! ```
//!
//! Calls are blocking and synchronous. The pipeline defines no retry or timeout
//! policy for them; implementations that talk to remote services own that.

use crate::core::ReflowResult;
use std::fmt::Debug;

/// Splits a run of lowercase letters into likely words.
///
/// Input is always a non-empty string of lowercase ASCII letters with no
/// whitespace. Implementations are expected to return words whose
/// concatenation equals the input; the capitalization restorer detects (and
/// tolerates) implementations that do not.
pub trait WordSegmenter: Send + Sync + Debug {
    /// Segment `letters` into words.
    fn segment(&self, letters: &str) -> Vec<String>;
}

/// Language-model spell correction applied to already re-spaced text.
pub trait SpellCorrector: Send + Sync + Debug {
    /// Returns the corrected text.
    fn correct(&self, text: &str) -> ReflowResult<String>;
}

/// Named-entity recognition restricted to person names.
pub trait NameRecognizer: Send + Sync + Debug {
    /// Returns candidate person names in order of appearance.
    fn recognize(&self, text: &str) -> ReflowResult<Vec<String>>;
}

/// Spell corrector that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCorrector;

impl SpellCorrector for PassthroughCorrector {
    fn correct(&self, text: &str) -> ReflowResult<String> {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_corrector_is_identity() {
        let corrector = PassthroughCorrector;
        assert_eq!(
            corrector.correct("Teh cat sat.").unwrap(),
            "Teh cat sat."
        );
    }
}
