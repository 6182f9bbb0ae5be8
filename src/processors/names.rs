//! Author name canonicalization.
//!
//! OCR'd bylines are noisy. A candidate name is resolved against the
//! reference directory in two stages: a similarity scan over the sorted names,
//! then a longest-prefix lookup on the normalized key.

use crate::core::constants::DEFAULT_NAME_SCORE_CUTOFF;
use crate::core::validation::{validate_finite, validate_range};
use crate::core::{NameRecognizer, ReflowResult};
use crate::domain::{ReferenceNameDirectory, normalize_name_key};
use once_cell::sync::Lazy;
use rapidfuzz::distance::indel;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Name canonicalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameConfig {
    /// Minimum normalized Indel similarity for a stage-one match.
    #[serde(default = "NameConfig::default_score_cutoff")]
    pub score_cutoff: f64,
    /// Reference directory with one full name per line.
    #[serde(default)]
    pub author_names_path: Option<PathBuf>,
}

impl NameConfig {
    fn default_score_cutoff() -> f64 {
        DEFAULT_NAME_SCORE_CUTOFF
    }

    pub fn validate(&self) -> ReflowResult<()> {
        validate_finite(self.score_cutoff, "names.score_cutoff")?;
        validate_range(self.score_cutoff, 0.0, 1.0, "names.score_cutoff")
    }
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            score_cutoff: DEFAULT_NAME_SCORE_CUTOFF,
            author_names_path: None,
        }
    }
}

/// Resolves free-text names to reference names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameCanonicalizer {
    score_cutoff: f64,
}

impl NameCanonicalizer {
    pub fn new(score_cutoff: f64) -> Self {
        Self { score_cutoff }
    }

    pub fn score_cutoff(&self) -> f64 {
        self.score_cutoff
    }

    /// Returns the reference name for `candidate`, or the candidate itself.
    ///
    /// The first name in lexicographic order whose similarity reaches the
    /// cutoff wins, even when a later name scores higher. Similarity is
    /// `1 - indel_distance / (len_a + len_b)` over chars, so a substitution
    /// costs two edits. It is case sensitive; the prefix fallback is not.
    pub fn canonicalize(&self, candidate: &str, directory: &ReferenceNameDirectory) -> String {
        if let Some(name) = directory
            .sorted_names()
            .iter()
            .find(|name| self.similarity(candidate, name) >= self.score_cutoff)
        {
            debug!("name {:?} matched {:?} by similarity", candidate, name);
            return name.clone();
        }

        let key = normalize_name_key(candidate);
        match directory.trie().longest_prefix_value(&key) {
            Some(name) => {
                debug!("name {:?} matched {:?} by prefix", candidate, name);
                name.to_string()
            }
            None => candidate.to_string(),
        }
    }

    fn similarity(&self, candidate: &str, name: &str) -> f64 {
        indel::normalized_similarity(candidate.chars(), name.chars())
    }
}

impl Default for NameCanonicalizer {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_SCORE_CUTOFF)
    }
}

static BYLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bBy\s+([A-Z][\w\x{2019}'.-]*(?:\s+[A-Z][\w\x{2019}'.-]*){1,2})")
        .unwrap_or_else(|e| panic!("Invalid byline regex: {e}"))
});

/// Name recognizer that reads "By First Last" bylines.
///
/// Stands in for a statistical NER model when none is available. Takes two
/// or three capitalized words after each "By".
#[derive(Debug, Clone, Copy, Default)]
pub struct BylineRecognizer;

impl NameRecognizer for BylineRecognizer {
    fn recognize(&self, text: &str) -> ReflowResult<Vec<String>> {
        Ok(BYLINE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end_matches(['.', '-']).to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ReferenceNameDirectory {
        ReferenceNameDirectory::from_names([
            "Jon Smith",
            "Ann Lee",
            "Jane Doe",
            "Janet Doe",
            "Margaret Atwood",
        ])
    }

    #[test]
    fn test_case_differences_fall_through_to_prefix_lookup() {
        let canonicalizer = NameCanonicalizer::new(0.9);
        assert_eq!(canonicalizer.canonicalize("jon smith", &directory()), "Jon Smith");
    }

    #[test]
    fn test_similar_name_matches() {
        let canonicalizer = NameCanonicalizer::new(0.9);
        assert_eq!(
            canonicalizer.canonicalize("Margaret Atwod", &directory()),
            "Margaret Atwood"
        );
    }

    #[test]
    fn test_dropped_letter_counts_as_one_deletion() {
        // 1 - 1/17: a single missing letter stays above the default cutoff.
        let canonicalizer = NameCanonicalizer::new(0.9);
        let directory = ReferenceNameDirectory::from_names(["Jon Smith"]);
        assert_eq!(canonicalizer.canonicalize("Jon Smit", &directory), "Jon Smith");
        assert!((canonicalizer.similarity("Jon Smit", "Jon Smith") - 16.0 / 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_substitution_costs_two_edits() {
        // "jon smith" differs from "Jon Smith" by two substitutions: 1 - 4/18.
        let canonicalizer = NameCanonicalizer::new(0.9);
        assert!((canonicalizer.similarity("jon smith", "Jon Smith") - 14.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_qualifying_name_wins() {
        // "Jane Doe" sorts before "Janet Doe" and both clear a low cutoff.
        let canonicalizer = NameCanonicalizer::new(0.5);
        assert_eq!(canonicalizer.canonicalize("Janet Doe", &directory()), "Jane Doe");
    }

    #[test]
    fn test_qualifying_candidate_always_maps_to_reference() {
        let directory = directory();
        let canonicalizer = NameCanonicalizer::new(0.8);
        for candidate in ["Ann Le", "Jon Smyth", "Jane Do"] {
            let name = canonicalizer.canonicalize(candidate, &directory);
            assert!(directory.sorted_names().contains(&name), "{candidate} -> {name}");
        }
    }

    #[test]
    fn test_prefix_lookup_accepts_trailing_noise() {
        let canonicalizer = NameCanonicalizer::new(0.95);
        assert_eq!(
            canonicalizer.canonicalize("ann lee staff writer", &directory()),
            "Ann Lee"
        );
    }

    #[test]
    fn test_unknown_candidate_returned_unchanged() {
        let canonicalizer = NameCanonicalizer::default();
        assert_eq!(canonicalizer.canonicalize("Zed Q", &directory()), "Zed Q");
    }

    #[test]
    fn test_config_cutoff_range() {
        let mut config = NameConfig::default();
        assert!(config.validate().is_ok());
        config.score_cutoff = 1.5;
        assert!(config.validate().is_err());
        config.score_cutoff = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_byline_recognizer() {
        let recognizer = BylineRecognizer;
        let names = recognizer
            .recognize("The Long Road Home. By Jane Doe")
            .unwrap();
        assert_eq!(names, vec!["Jane Doe"]);
        assert!(recognizer.recognize("Nothing Here").unwrap().is_empty());
    }
}
