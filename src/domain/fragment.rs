//! Text fragment types.

use crate::core::ReflowResult;
use crate::processors::PixelRect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural role of a fragment on its page.
///
/// The declaration order is the reading-order priority: titles are read
/// before subheadings, subheadings before body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Article title.
    Title,
    /// Standfirst, summary or pull quote set larger than body text.
    Subheading,
    /// Regular article text.
    Body,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Title => write!(f, "title"),
            Role::Subheading => write!(f, "subheading"),
            Role::Body => write!(f, "body"),
        }
    }
}

/// A fragment record as delivered by the OCR/layout collaborator.
///
/// `document_id` may be omitted when the caller supplies one per input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentRecord {
    #[serde(default)]
    pub document_id: Option<String>,
    pub page_number: u32,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    #[serde(default)]
    pub text: String,
}

/// A rectangular OCR text region and everything the pipeline learns about it.
///
/// The OCR collaborator provides geometry and `raw_text`; every other field
/// is filled in by a pipeline stage:
/// - `text` by the text normalizer (initialised to `raw_text`)
/// - `font_size` and `role` by the structure classifier
/// - `column` by layout inference
/// - `is_page_furniture` by the header/footer filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub document_id: String,
    pub page_number: u32,
    /// Position in the OCR output for this page.
    pub sequence: usize,
    pub rect: PixelRect,
    pub raw_text: String,
    /// Normalized text.
    pub text: String,
    pub font_size: Option<f64>,
    pub role: Option<Role>,
    pub column: Option<usize>,
    #[serde(default)]
    pub is_page_furniture: bool,
}

impl Fragment {
    /// Creates a fragment with only geometry and raw text populated.
    pub fn new(
        document_id: impl Into<String>,
        page_number: u32,
        sequence: usize,
        rect: PixelRect,
        raw_text: impl Into<String>,
    ) -> Self {
        let raw_text = raw_text.into();
        Self {
            document_id: document_id.into(),
            page_number,
            sequence,
            rect,
            text: raw_text.clone(),
            raw_text,
            font_size: None,
            role: None,
            column: None,
            is_page_furniture: false,
        }
    }

    /// Builds a fragment from an OCR record, validating its geometry.
    ///
    /// # Arguments
    ///
    /// * `record` - The OCR record.
    /// * `sequence` - Position of the record within its page.
    /// * `fallback_document_id` - Used when the record carries no document id.
    pub fn from_record(
        record: FragmentRecord,
        sequence: usize,
        fallback_document_id: &str,
    ) -> ReflowResult<Self> {
        let rect = PixelRect::new(record.left, record.top, record.right, record.bottom)?;
        let document_id = record
            .document_id
            .unwrap_or_else(|| fallback_document_id.to_string());
        Ok(Self::new(
            document_id,
            record.page_number,
            sequence,
            rect,
            record.text,
        ))
    }

    /// Number of characters in the normalized text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn center_x(&self) -> f64 {
        self.rect.center_x()
    }

    pub fn center_y(&self) -> f64 {
        self.rect.center_y()
    }

    /// Role used for ordering; unclassified fragments read as body text.
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or(Role::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(left: i32, top: i32, right: i32, bottom: i32) -> FragmentRecord {
        FragmentRecord {
            document_id: None,
            page_number: 2,
            left,
            top,
            right,
            bottom,
            text: "Hello".to_string(),
        }
    }

    #[test]
    fn test_role_ordering_matches_reading_priority() {
        assert!(Role::Title < Role::Subheading);
        assert!(Role::Subheading < Role::Body);
    }

    #[test]
    fn test_from_record_uses_fallback_document_id() {
        let fragment = Fragment::from_record(record(0, 0, 10, 10), 3, "issue-7").unwrap();
        assert_eq!(fragment.document_id, "issue-7");
        assert_eq!(fragment.page_number, 2);
        assert_eq!(fragment.sequence, 3);
        assert_eq!(fragment.text, "Hello");
        assert_eq!(fragment.raw_text, "Hello");
        assert!(fragment.role.is_none());
    }

    #[test]
    fn test_from_record_rejects_bad_geometry() {
        assert!(Fragment::from_record(record(10, 0, 5, 10), 0, "doc").is_err());
    }

    #[test]
    fn test_record_deserializes_without_document_id() {
        let json = r#"{"page_number": 1, "left": 0, "top": 0, "right": 5, "bottom": 5, "text": "x"}"#;
        let record: FragmentRecord = serde_json::from_str(json).unwrap();
        assert!(record.document_id.is_none());
        assert_eq!(record.text, "x");
    }

    #[test]
    fn test_char_count_counts_scalar_values() {
        let rect = PixelRect::new(0, 0, 1, 1).unwrap();
        let fragment = Fragment::new("doc", 0, 0, rect, "caf\u{e9}");
        assert_eq!(fragment.char_count(), 4);
    }
}
