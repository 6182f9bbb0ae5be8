//! OCR text repair.
//!
//! Each fragment's raw text goes through, in order:
//! 1. hyphenation repair: a hyphen (plain or soft) ending a line joins the
//!    split word
//! 2. paragraph marking: a line break between a sentence end and a capital
//!    or opening quote becomes a placeholder token
//! 3. whitespace collapsing
//! 4. spacing repair: letter runs are case-folded, re-segmented into words
//!    and recombined with the untouched punctuation; capitals and apostrophes
//!    are then restored by rank (see [`CaseProfile`])
//! 5. spell correction by the external corrector
//! 6. the placeholder becomes a blank line
//!
//! Page-level normalization first merges decorative initials, the large
//! drop capitals that OCR reports as separate one-letter fragments.

use super::capitalization::CaseProfile;
use crate::core::constants::{DEFAULT_PARAGRAPH_BREAK_PLACEHOLDER, DEFAULT_SEGMENT_MAX_LEN};
use crate::core::{ProcessingStage, ReflowError, ReflowResult, SpellCorrector, WordSegmenter};
use crate::domain::Fragment;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

static LINE_HYPHENATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-\x{00AD}] ?\n")
        .unwrap_or_else(|e| panic!("Invalid hyphenation regex: {e}"))
});

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([.\x{201D}])\n([A-Z\x{201C}])")
        .unwrap_or_else(|e| panic!("Invalid paragraph break regex: {e}"))
});

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s_]+").unwrap_or_else(|e| panic!("Invalid whitespace regex: {e}"))
});

/// Anything that is not an ASCII letter, whitespace or apostrophe, with at
/// most one adjacent space on each side; or a bare line break.
static PUNCTUATION_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ ]?[^a-zA-Z\s\x{2019}]+[ ]?|\n")
        .unwrap_or_else(|e| panic!("Invalid punctuation regex: {e}"))
});

/// Text repair settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Letter runs longer than this are cut into windows of this many letters
    /// before segmentation. Bounds segmentation cost at the price of an
    /// occasional split at a window edge.
    #[serde(default = "TextConfig::default_segment_max_len")]
    pub segment_max_len: usize,
    /// Token standing in for paragraph breaks; must not occur in OCR text.
    #[serde(default = "TextConfig::default_paragraph_break_placeholder")]
    pub paragraph_break_placeholder: String,
    /// Unigram frequency table for the built-in segmenter.
    #[serde(default)]
    pub word_frequencies_path: Option<PathBuf>,
}

impl TextConfig {
    fn default_segment_max_len() -> usize {
        DEFAULT_SEGMENT_MAX_LEN
    }

    fn default_paragraph_break_placeholder() -> String {
        DEFAULT_PARAGRAPH_BREAK_PLACEHOLDER.to_string()
    }

    /// Checks the placeholder survives whitespace collapsing and spacing repair.
    pub fn validate(&self) -> ReflowResult<()> {
        crate::core::validation::validate_positive(self.segment_max_len, "text.segment_max_len")?;
        let placeholder = &self.paragraph_break_placeholder;
        if placeholder.is_empty()
            || placeholder
                .chars()
                .any(|c| c.is_whitespace() || c.is_ascii_alphabetic() || c == '_' || c == '\u{2019}')
        {
            return Err(ReflowError::config_error_with_context(
                "text.paragraph_break_placeholder",
                placeholder,
                "must be non-empty and contain no whitespace, underscores, apostrophes or ASCII letters",
            ));
        }
        Ok(())
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            segment_max_len: DEFAULT_SEGMENT_MAX_LEN,
            paragraph_break_placeholder: DEFAULT_PARAGRAPH_BREAK_PLACEHOLDER.to_string(),
            word_frequencies_path: None,
        }
    }
}

/// A fragment whose trimmed text is a single character.
fn is_initial_candidate(fragment: &Fragment) -> bool {
    let mut chars = fragment.raw_text.trim().chars();
    chars.next().is_some() && chars.next().is_none()
}

/// Moves decorative initials into the fragment they sit inside.
///
/// Every one-character fragment is removed from the page. Its character is
/// prepended to the raw text of the first remaining fragment, in top-to-bottom
/// then left-to-right order, whose rectangle strictly contains the initial's
/// centre. Initials with no containing fragment are dropped.
pub fn merge_decorative_initials(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let (initials, mut rest): (Vec<Fragment>, Vec<Fragment>) =
        fragments.into_iter().partition(is_initial_candidate);
    if initials.is_empty() {
        return rest;
    }

    let mut scan_order: Vec<usize> = (0..rest.len()).collect();
    scan_order.sort_by_key(|&i| (rest[i].rect.top, rest[i].rect.left, rest[i].sequence));

    for initial in initials {
        let (x, y) = initial.rect.center();
        let letter = initial.raw_text.trim();
        match scan_order
            .iter()
            .copied()
            .find(|&i| rest[i].rect.strictly_contains(x, y))
        {
            Some(i) => {
                debug!(
                    "page {}: merging initial {:?} into fragment {}",
                    initial.page_number, letter, rest[i].sequence
                );
                rest[i].raw_text.insert_str(0, letter);
            }
            None => {
                debug!(
                    "page {}: dropping initial {:?} with no containing fragment",
                    initial.page_number, letter
                );
            }
        }
    }
    rest
}

/// Repairs OCR text defects.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    config: TextConfig,
    segmenter: Arc<dyn WordSegmenter>,
    corrector: Arc<dyn SpellCorrector>,
    paragraph_marker: Regex,
}

impl TextNormalizer {
    /// Creates a normalizer.
    ///
    /// # Arguments
    ///
    /// * `config` - Text settings; validated here.
    /// * `segmenter` - Word segmentation used by spacing repair.
    /// * `corrector` - Spell corrector applied after capitalization restoration.
    pub fn new(
        config: TextConfig,
        segmenter: Arc<dyn WordSegmenter>,
        corrector: Arc<dyn SpellCorrector>,
    ) -> ReflowResult<Self> {
        config.validate()?;
        let pattern = format!(
            r"\s*{}\s*",
            regex::escape(&config.paragraph_break_placeholder)
        );
        let paragraph_marker = Regex::new(&pattern).map_err(|e| {
            ReflowError::processing_error(
                ProcessingStage::Normalization,
                "building paragraph placeholder pattern",
                e,
            )
        })?;
        Ok(Self {
            config,
            segmenter,
            corrector,
            paragraph_marker,
        })
    }

    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Merges decorative initials, then repairs the text of every fragment.
    pub fn normalize(&self, page: Vec<Fragment>) -> ReflowResult<Vec<Fragment>> {
        let mut fragments = merge_decorative_initials(page);
        for fragment in &mut fragments {
            fragment.text = self.fix_text(&fragment.raw_text)?;
        }
        Ok(fragments)
    }

    /// Repairs a single text.
    pub fn fix_text(&self, raw: &str) -> ReflowResult<String> {
        let placeholder = self.config.paragraph_break_placeholder.as_str();
        let text = LINE_HYPHENATION.replace_all(raw, "");
        let text = PARAGRAPH_BREAK.replace_all(&text, |caps: &Captures| {
            format!("{}{}{}", &caps[1], placeholder, &caps[2])
        });
        let text = WHITESPACE_RUN.replace_all(&text, " ");
        let text = self.repair_spacing(text.trim());
        let corrected = self.corrector.correct(&text)?;
        let restored = self.paragraph_marker.replace_all(&corrected, "\n\n");
        Ok(restored.trim().to_string())
    }

    /// Re-segments letter runs and restores capitals and apostrophes.
    ///
    /// Falls back to the case-folded text when segmentation did not preserve
    /// the ranked characters.
    pub fn repair_spacing(&self, text: &str) -> String {
        let mut runs = Vec::new();
        let mut punctuation = Vec::new();
        let mut last = 0;
        for token in PUNCTUATION_TOKEN.find_iter(text) {
            runs.push(&text[last..token.start()]);
            punctuation.push(if token.as_str() == "\n" {
                " "
            } else {
                token.as_str()
            });
            last = token.end();
        }
        runs.push(&text[last..]);

        let mut folded = String::with_capacity(text.len() + text.len() / 4);
        for (i, run) in runs.iter().enumerate() {
            folded.push_str(&self.segment_run(run));
            if let Some(token) = punctuation.get(i) {
                folded.push_str(token);
            }
        }

        match CaseProfile::record(text).apply(&folded) {
            Some(restored) => restored,
            None => {
                warn!(
                    "capitalization skipped: segmentation changed character count in {:?}",
                    text
                );
                folded
            }
        }
    }

    /// Case-folds a letter run, drops its spaces and apostrophes and segments it.
    fn segment_run(&self, run: &str) -> String {
        let letters: String = run
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if letters.is_empty() {
            return String::new();
        }
        let max_len = self.config.segment_max_len.max(1);
        if letters.len() <= max_len {
            return self.segmenter.segment(&letters).join(" ");
        }
        letters
            .as_bytes()
            .chunks(max_len)
            .filter_map(|window| std::str::from_utf8(window).ok())
            .map(|window| self.segmenter.segment(window).join(" "))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
