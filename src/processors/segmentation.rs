//! Word segmentation over a unigram language model.
//!
//! OCR often loses or invents word boundaries ("th e cat", "thecat"). The
//! segmenter re-derives boundaries for a run of lowercase letters by choosing
//! the split that maximises the product of unigram probabilities. It only
//! inserts boundaries, so the letters of the input come back unchanged and in
//! order.

use crate::core::constants::MAX_SEGMENT_WORD_LEN;
use crate::core::{ReflowError, ReflowResult, WordSegmenter};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Dynamic-programming segmenter scored by word frequencies.
#[derive(Debug, Clone)]
pub struct UnigramSegmenter {
    counts: HashMap<String, f64>,
    total: f64,
    max_word_len: usize,
}

impl UnigramSegmenter {
    /// Builds a segmenter from `(word, count)` pairs.
    ///
    /// Words are lowercased; repeated words accumulate their counts.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut table: HashMap<String, f64> = HashMap::new();
        for (word, count) in counts {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            *table.entry(word).or_insert(0.0) += count as f64;
        }
        let total = table.values().sum::<f64>().max(1.0);
        Self {
            counts: table,
            total,
            max_word_len: MAX_SEGMENT_WORD_LEN,
        }
    }

    /// Loads a frequency table with one `word<whitespace>count` pair per line.
    pub fn load(path: &Path) -> ReflowResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReflowError::resource_load(
                "word frequencies",
                format!("cannot read {}: {}", path.display(), e),
            )
        })?;
        let segmenter = Self::from_table(&content).map_err(|message| {
            ReflowError::resource_load(
                "word frequencies",
                format!("{}: {}", path.display(), message),
            )
        })?;
        info!(
            "Loaded {} word frequencies from {}",
            segmenter.counts.len(),
            path.display()
        );
        Ok(segmenter)
    }

    fn from_table(content: &str) -> Result<Self, String> {
        let mut pairs = Vec::new();
        for (line_number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(word), Some(count), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(format!("line {}: expected 'word count'", line_number + 1));
            };
            let count: u64 = count
                .parse()
                .map_err(|e| format!("line {}: bad count '{}': {}", line_number + 1, count, e))?;
            pairs.push((word.to_string(), count));
        }
        if pairs.is_empty() {
            return Err("frequency table is empty".to_string());
        }
        Ok(Self::from_counts(pairs))
    }

    /// Longest word the segmenter will consider.
    pub fn with_max_word_len(mut self, max_word_len: usize) -> Self {
        self.max_word_len = max_word_len.max(1);
        self
    }

    /// Log10 probability of a word; unknown words are penalised by length.
    fn score(&self, word: &str) -> f64 {
        match self.counts.get(word) {
            Some(count) => (count / self.total).log10(),
            None => (10.0 / self.total).log10() - word.len() as f64,
        }
    }
}

impl WordSegmenter for UnigramSegmenter {
    fn segment(&self, letters: &str) -> Vec<String> {
        let chars: Vec<char> = letters.chars().collect();
        let n = chars.len();
        if n == 0 {
            return Vec::new();
        }

        // best[i]: best score of chars[..i]; split[i]: start of its last word.
        let mut best = vec![f64::NEG_INFINITY; n + 1];
        let mut split = vec![0usize; n + 1];
        best[0] = 0.0;
        for end in 1..=n {
            let first_start = end.saturating_sub(self.max_word_len);
            for start in first_start..end {
                if best[start] == f64::NEG_INFINITY {
                    continue;
                }
                let word: String = chars[start..end].iter().collect();
                let candidate = best[start] + self.score(&word);
                if candidate > best[end] {
                    best[end] = candidate;
                    split[end] = start;
                }
            }
        }

        let mut words: Vec<String> = Vec::new();
        let mut end = n;
        while end > 0 {
            let start = split[end];
            words.push(chars[start..end].iter().collect());
            end = start;
        }
        words.reverse();
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn segmenter() -> UnigramSegmenter {
        UnigramSegmenter::from_counts([
            ("the", 5000),
            ("cat", 400),
            ("sat", 300),
            ("on", 3000),
            ("mat", 200),
            ("a", 4000),
            ("them", 100),
            ("at", 1500),
        ])
    }

    #[test]
    fn test_segments_known_words() {
        let s = segmenter();
        assert_eq!(s.segment("thecat"), vec!["the", "cat"]);
        assert_eq!(s.segment("thecatsatonthemat"), vec!["the", "cat", "sat", "on", "the", "mat"]);
    }

    #[test]
    fn test_segmentation_preserves_letters() {
        let s = segmenter();
        for input in ["thecat", "zqxthecatzzz", "a", "unknownword", "mattheat"] {
            assert_eq!(s.segment(input).concat(), input);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(segmenter().segment("").is_empty());
    }

    #[test]
    fn test_load_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "the\t23135851162\ncat 19188\n\n").unwrap();
        let s = UnigramSegmenter::load(file.path()).unwrap();
        assert_eq!(s.segment("thecat"), vec!["the", "cat"]);
    }

    #[test]
    fn test_load_rejects_malformed_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "the many 12").unwrap();
        let err = UnigramSegmenter::load(file.path()).unwrap_err();
        assert!(matches!(err, ReflowError::ResourceLoad { .. }));

        let missing = UnigramSegmenter::load(Path::new("/nonexistent/unigrams.txt"));
        assert!(missing.is_err());
    }
}
