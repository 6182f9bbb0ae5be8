//! Page and document groupings.
//!
//! Fragments arrive as a flat list. Aggregate statistics need them grouped
//! by `(document_id, page_number)` and by `document_id`; [`DocumentIndex`]
//! builds that two-level index once so later stages iterate plain vectors.

use super::fragment::Fragment;
use crate::processors::LayoutChoice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Page-level font statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageStats {
    /// Character-count-weighted mean of the fragment font-size proxies.
    pub weighted_mean_font_size: f64,
}

/// Document-level font statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Character-count-weighted mean of the fragment font-size proxies.
    pub weighted_mean_font_size: f64,
    /// Sample standard deviation of the font-size proxies.
    /// `None` when fewer than two fragments exist.
    pub font_size_std: Option<f64>,
}

/// The fragments of one page plus the page-level results computed over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub document_id: String,
    pub page_number: u32,
    pub fragments: Vec<Fragment>,
    /// Column layout chosen by layout inference.
    pub layout: Option<LayoutChoice>,
    pub stats: Option<PageStats>,
}

impl Page {
    pub fn new(document_id: impl Into<String>, page_number: u32, fragments: Vec<Fragment>) -> Self {
        Self {
            document_id: document_id.into(),
            page_number,
            fragments,
            layout: None,
            stats: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// The pages of one document in ascending page order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub pages: Vec<Page>,
    pub stats: Option<DocumentStats>,
}

impl Document {
    /// Creates a document, sorting its pages by page number.
    pub fn new(id: impl Into<String>, mut pages: Vec<Page>) -> Self {
        pages.sort_by_key(|page| page.page_number);
        Self {
            id: id.into(),
            pages,
            stats: None,
        }
    }

    /// Iterates over every fragment of every page.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.pages.iter().flat_map(|page| page.fragments.iter())
    }

    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(|page| page.fragments.len()).sum()
    }
}

/// Fragments indexed by document id, then page number.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    documents: BTreeMap<String, BTreeMap<u32, Vec<Fragment>>>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from a flat list of fragments.
    pub fn from_fragments(fragments: impl IntoIterator<Item = Fragment>) -> Self {
        let mut index = Self::new();
        for fragment in fragments {
            index.insert(fragment);
        }
        index
    }

    pub fn insert(&mut self, fragment: Fragment) {
        self.documents
            .entry(fragment.document_id.clone())
            .or_default()
            .entry(fragment.page_number)
            .or_default()
            .push(fragment);
    }

    /// Number of distinct documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Materializes documents ordered by id, pages by number and fragments by
    /// their OCR sequence.
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
            .into_iter()
            .map(|(id, pages)| {
                let pages = pages
                    .into_iter()
                    .map(|(page_number, mut fragments)| {
                        fragments.sort_by_key(|fragment| fragment.sequence);
                        Page::new(id.clone(), page_number, fragments)
                    })
                    .collect();
                Document::new(id, pages)
            })
            .collect()
    }
}
