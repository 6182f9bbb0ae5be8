//! Reference name directory.
//!
//! The directory is the set of known author names. It is loaded once and
//! never mutated, and is indexed two ways:
//! - a lexicographically sorted list, scanned by the similarity search
//! - a prefix trie keyed by [`normalize_name_key`], used as the fallback lookup

use crate::core::{ReflowError, ReflowResult};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Lowercases a name and strips all whitespace from it.
///
/// `"Jon  Smith"` and `"jon smith"` both normalize to `"jonsmith"`.
pub fn normalize_name_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, usize>,
    value: Option<String>,
}

/// Character trie mapping normalized keys to full names.
#[derive(Debug, Clone)]
pub struct NameTrie {
    nodes: Vec<TrieNode>,
}

impl Default for NameTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl NameTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Inserts `value` under `key`, replacing any previous value for that key.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let mut node = 0;
        for c in key.chars() {
            node = match self.nodes[node].children.get(&c) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(c, child);
                    child
                }
            };
        }
        self.nodes[node].value = Some(value.into());
    }

    /// Returns the value stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut node = 0;
        for c in key.chars() {
            node = *self.nodes[node].children.get(&c)?;
        }
        self.nodes[node].value.as_deref()
    }

    /// Returns the value of the longest stored key that is a prefix of `key`.
    pub fn longest_prefix_value(&self, key: &str) -> Option<&str> {
        let mut node = 0;
        let mut best = self.nodes[0].value.as_deref();
        for c in key.chars() {
            match self.nodes[node].children.get(&c) {
                Some(&child) => {
                    node = child;
                    if let Some(value) = self.nodes[node].value.as_deref() {
                        best = Some(value);
                    }
                }
                None => break,
            }
        }
        best
    }
}

/// Immutable directory of known full names.
#[derive(Debug, Clone)]
pub struct ReferenceNameDirectory {
    sorted: Vec<String>,
    trie: NameTrie,
}

impl ReferenceNameDirectory {
    /// Builds the directory from names in dataset order.
    ///
    /// Blank entries are skipped. When two names share a normalized key the
    /// trie keeps the later one.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = NameTrie::new();
        let mut sorted = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            trie.insert(&normalize_name_key(name), name);
            sorted.push(name.to_string());
        }
        sorted.sort();
        sorted.dedup();
        Self { sorted, trie }
    }

    /// Loads a directory from a UTF-8 file holding one full name per line.
    pub fn load(path: &Path) -> ReflowResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReflowError::resource_load(
                "reference names",
                format!("cannot read {}: {}", path.display(), e),
            )
        })?;
        let directory = Self::from_names(content.lines());
        if directory.is_empty() {
            return Err(ReflowError::resource_load(
                "reference names",
                format!("{} contains no names", path.display()),
            ));
        }
        info!(
            "Loaded {} reference names from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    /// Names in lexicographic order.
    pub fn sorted_names(&self) -> &[String] {
        &self.sorted
    }

    pub fn trie(&self) -> &NameTrie {
        &self.trie
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_name_key() {
        assert_eq!(normalize_name_key("Jon Smith"), "jonsmith");
        assert_eq!(normalize_name_key("  Mary\tAnne  Lee "), "maryannelee");
    }

    #[test]
    fn test_trie_longest_prefix() {
        let mut trie = NameTrie::new();
        trie.insert("jon", "Jon");
        trie.insert("jonsmith", "Jon Smith");

        assert_eq!(trie.longest_prefix_value("jonsmith"), Some("Jon Smith"));
        assert_eq!(trie.longest_prefix_value("jonsmithsonian"), Some("Jon Smith"));
        assert_eq!(trie.longest_prefix_value("jonas"), Some("Jon"));
        assert_eq!(trie.longest_prefix_value("jo"), None);
        assert_eq!(trie.longest_prefix_value("alice"), None);
        assert_eq!(trie.get("jonsmith"), Some("Jon Smith"));
        assert_eq!(trie.get("jonsm"), None);
    }

    #[test]
    fn test_directory_sorted_and_indexed() {
        let directory = ReferenceNameDirectory::from_names(["Zoe Adams", "", "Alan Brown", "Zoe Adams"]);
        assert_eq!(directory.sorted_names(), &["Alan Brown", "Zoe Adams"]);
        assert_eq!(directory.trie().get("alanbrown"), Some("Alan Brown"));
    }

    #[test]
    fn test_duplicate_keys_keep_last_name() {
        let directory = ReferenceNameDirectory::from_names(["Jon Smith", "JON SMITH"]);
        assert_eq!(directory.trie().get("jonsmith"), Some("JON SMITH"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Jon Smith\nAda Lovelace\n").unwrap();
        let directory = ReferenceNameDirectory::load(file.path()).unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.sorted_names()[0], "Ada Lovelace");
    }

    #[test]
    fn test_load_missing_or_empty_file_fails() {
        let missing = ReferenceNameDirectory::load(Path::new("/nonexistent/names.txt"));
        assert!(matches!(missing, Err(ReflowError::ResourceLoad { .. })));

        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(ReferenceNameDirectory::load(file.path()).is_err());
    }
}
