//! Domain-level structures shared across the reflow pipeline.
//!
//! Fragments are the unit every stage annotates; pages and documents are
//! groupings materialized from them to compute aggregates. The reference name
//! directory is the immutable author dataset used for canonicalization, and
//! the assembled types carry the reading-ordered result.

pub mod assembled;
pub mod document;
pub mod fragment;
pub mod names;

pub use assembled::{AssembledDocument, AssembledPage};
pub use document::{Document, DocumentIndex, DocumentStats, Page, PageStats};
pub use fragment::{Fragment, FragmentRecord, Role};
pub use names::{NameTrie, ReferenceNameDirectory, normalize_name_key};
