//! Capitalization and apostrophe restoration.
//!
//! Word segmentation works on case-folded letters and drops apostrophes. To
//! put them back, the original text is profiled by *rank*: the 1-based
//! position of a character among the characters that are neither whitespace
//! nor an apostrophe. Uppercase letters are recorded by their own rank, an
//! apostrophe by the rank of the character before it (0 when it leads).
//!
//! After re-spacing, the same ranks are walked over the new text. This is only
//! exact when the transform between the two preserved the count and order of
//! ranked characters; [`CaseProfile::apply`] checks the count and refuses to
//! restore when it differs.

use std::collections::BTreeSet;

/// The apostrophe OCR produces for typeset text.
pub const APOSTROPHE: char = '\u{2019}';

fn is_ranked(c: char) -> bool {
    !c.is_whitespace() && c != APOSTROPHE
}

/// Uppercase and apostrophe positions recorded from a source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseProfile {
    uppercase: BTreeSet<usize>,
    apostrophes: BTreeSet<usize>,
    ranked_chars: usize,
}

impl CaseProfile {
    /// Profiles `text`.
    pub fn record(text: &str) -> Self {
        let mut profile = Self::default();
        let mut rank = 0;
        for c in text.chars() {
            if c == APOSTROPHE {
                profile.apostrophes.insert(rank);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            rank += 1;
            if c.is_uppercase() {
                profile.uppercase.insert(rank);
            }
        }
        profile.ranked_chars = rank;
        profile
    }

    /// Ranks that held an uppercase letter.
    pub fn uppercase_ranks(&self) -> impl Iterator<Item = usize> + '_ {
        self.uppercase.iter().copied()
    }

    /// Ranks after which an apostrophe stood.
    pub fn apostrophe_ranks(&self) -> impl Iterator<Item = usize> + '_ {
        self.apostrophes.iter().copied()
    }

    /// Number of ranked characters in the profiled text.
    pub fn ranked_chars(&self) -> usize {
        self.ranked_chars
    }

    /// Re-applies the profile to a case-folded, re-spaced text.
    ///
    /// Returns `None` when `folded` does not have the same number of ranked
    /// characters as the profiled text, since the ranks would misalign.
    pub fn apply(&self, folded: &str) -> Option<String> {
        let ranked = folded.chars().filter(|&c| is_ranked(c)).count();
        if ranked != self.ranked_chars {
            return None;
        }

        let mut out = String::with_capacity(folded.len() + self.apostrophes.len() * 3);
        if self.apostrophes.contains(&0) {
            out.push(APOSTROPHE);
        }
        let mut rank = 0;
        for c in folded.chars() {
            if !is_ranked(c) {
                out.push(c);
                continue;
            }
            rank += 1;
            if self.uppercase.contains(&rank) {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            if self.apostrophes.contains(&rank) {
                out.push(APOSTROPHE);
            }
        }
        Some(out)
    }
}
