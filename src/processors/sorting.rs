//! Reading order assembly.
//!
//! Within a page, fragments read by role (titles, then subheadings, then
//! body), then by column from left to right, then from top to bottom. Pages
//! that carry a title also get an author: the title and subheading text is
//! handed to the name recognizer and its first candidate is canonicalized
//! against the reference directory.

use super::names::NameCanonicalizer;
use crate::core::{Component, NameRecognizer, ProcessingStage, ReflowError, ReflowResult};
use crate::domain::{
    AssembledDocument, AssembledPage, Document, Fragment, Page, ReferenceNameDirectory, Role,
};
use std::sync::Arc;
use tracing::debug;

/// Sorts fragments by role, column and centre y. The sort is stable.
pub fn sort_reading_order(fragments: &mut [Fragment]) {
    fragments.sort_by(|a, b| {
        a.effective_role()
            .cmp(&b.effective_role())
            .then_with(|| a.column.unwrap_or(0).cmp(&b.column.unwrap_or(0)))
            .then_with(|| a.center_y().total_cmp(&b.center_y()))
    });
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Builds the recognizer input for a page in reading order.
///
/// Returns `None` when the page has no title, or when its heading text has
/// no letters for the recognizer to work with.
pub fn author_query(fragments: &[Fragment]) -> Option<String> {
    if !fragments.iter().any(|f| f.role == Some(Role::Title)) {
        return None;
    }
    let mut headings: Vec<&Fragment> = fragments
        .iter()
        .filter(|f| matches!(f.role, Some(Role::Title | Role::Subheading)))
        .collect();
    headings.sort_by_key(|f| f.effective_role());
    let text = headings
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(". ");
    if !text.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(title_case(&text))
}

/// Orders pages and attaches canonical authors.
#[derive(Debug, Clone, Default)]
pub struct ReadingOrderAssembler {
    canonicalizer: NameCanonicalizer,
}

impl ReadingOrderAssembler {
    pub fn new(canonicalizer: NameCanonicalizer) -> Self {
        Self { canonicalizer }
    }

    pub fn canonicalizer(&self) -> &NameCanonicalizer {
        &self.canonicalizer
    }

    /// Finds the canonical author of a page, or an empty string.
    ///
    /// The recognizer and directory are only touched on pages with a title,
    /// so a run over untitled pages never fails on them.
    pub fn detect_author(
        &self,
        fragments: &[Fragment],
        recognizer: &Component<Arc<dyn NameRecognizer>>,
        directory: &Component<ReferenceNameDirectory>,
    ) -> ReflowResult<String> {
        let Some(query) = author_query(fragments) else {
            return Ok(String::new());
        };
        let recognizer = recognizer.get()?;
        let directory = directory.get()?;

        let candidate = recognizer
            .recognize(&query)?
            .into_iter()
            .next()
            .unwrap_or_default();
        if candidate.trim().is_empty() {
            debug!("no name found in {:?}", query);
            return Ok(String::new());
        }
        Ok(self.canonicalizer.canonicalize(&candidate, directory))
    }

    /// Orders one page and attaches its author.
    pub fn assemble_page(
        &self,
        page: Page,
        recognizer: &Component<Arc<dyn NameRecognizer>>,
        directory: &Component<ReferenceNameDirectory>,
    ) -> ReflowResult<AssembledPage> {
        let Page {
            page_number,
            mut fragments,
            layout,
            ..
        } = page;
        sort_reading_order(&mut fragments);
        let author = self
            .detect_author(&fragments, recognizer, directory)
            .map_err(|e| {
                ReflowError::processing_error(
                    ProcessingStage::Assembly,
                    &format!("author detection on page {page_number}"),
                    e,
                )
            })?;
        if !author.is_empty() {
            debug!("page {}: author {:?}", page_number, author);
        }
        Ok(AssembledPage::new(page_number, fragments)
            .with_layout(layout)
            .with_author(author))
    }

    /// Orders every page of a classified document.
    pub fn assemble(
        &self,
        document: Document,
        recognizer: &Component<Arc<dyn NameRecognizer>>,
        directory: &Component<ReferenceNameDirectory>,
    ) -> ReflowResult<AssembledDocument> {
        let pages = document
            .pages
            .into_iter()
            .map(|page| self.assemble_page(page, recognizer, directory))
            .collect::<ReflowResult<Vec<_>>>()?;
        Ok(AssembledDocument::new(document.id, pages))
    }
}
