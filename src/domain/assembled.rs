//! Reading-ordered output of the pipeline.

use super::fragment::{Fragment, Role};
use crate::core::constants::DIVIDING_LINE;
use crate::processors::LayoutChoice;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marks the end of a header block so its last line is never joined with the
/// text that follows. Removed before output.
const HEADER_END: char = '\u{E000}';

/// A line break run between a lowercase letter, comma or closing quote and a
/// lowercase letter: a sentence continuing across blocks or pages.
static CONTINUED_SENTENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-z,\x{201D}])\n+([a-z])")
        .unwrap_or_else(|e| panic!("Invalid sentence continuation regex: {e}"))
});

/// One page in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledPage {
    pub page_number: u32,
    /// Layout the columns were assigned under.
    pub layout: Option<LayoutChoice>,
    /// Canonical author, empty when the page starts no article.
    pub author: String,
    /// Fragments ordered by role, then column, then vertical position.
    pub fragments: Vec<Fragment>,
}

impl AssembledPage {
    pub fn new(page_number: u32, fragments: Vec<Fragment>) -> Self {
        Self {
            page_number,
            layout: None,
            author: String::new(),
            fragments,
        }
    }

    pub fn with_layout(mut self, layout: Option<LayoutChoice>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    fn texts(&self, role: Role) -> impl Iterator<Item = &str> {
        self.fragments
            .iter()
            .filter(move |f| f.effective_role() == role)
            .map(|f| f.text.as_str())
    }

    /// Title texts joined by spaces.
    pub fn title(&self) -> String {
        self.texts(Role::Title).collect::<Vec<_>>().join(" ")
    }

    /// Subheading texts joined by spaces.
    pub fn subheading(&self) -> String {
        self.texts(Role::Subheading).collect::<Vec<_>>().join(" ")
    }

    /// Body texts separated by blank lines.
    pub fn body(&self) -> String {
        self.texts(Role::Body).collect::<Vec<_>>().join("\n\n")
    }

    pub fn has_title(&self) -> bool {
        self.fragments.iter().any(|f| f.role == Some(Role::Title))
    }

    /// Renders the page as an article block.
    ///
    /// A page with a title opens an article:
    ///
    /// ```text
    /// -----------------------------------------------------
    /// Article title: <title>
    /// -----------------------------------------------------
    ///
    /// Author: <author>
    /// Summary: <subheading>
    ///
    /// <body>
    /// ```
    ///
    /// A page without one continues the previous article; its subheadings
    /// are pull quotes and are framed as a `Quote:` block before the body.
    fn render(&self) -> String {
        let subheading = self.subheading();
        let body = self.body();
        let mut out = String::new();

        if !self.has_title() {
            if !subheading.is_empty() {
                out.push_str(DIVIDING_LINE);
                out.push_str("Quote: ");
                out.push_str(&subheading);
                out.push(HEADER_END);
                out.push_str(DIVIDING_LINE);
            }
            out.push_str(&body);
            return out;
        }

        out.push('\n');
        out.push_str(DIVIDING_LINE);
        out.push_str("\nArticle title: ");
        out.push_str(&self.title());
        out.push('\n');
        out.push_str(DIVIDING_LINE);
        out.push_str("\n\nAuthor: ");
        out.push_str(&self.author);
        if !subheading.is_empty() {
            out.push_str("\nSummary: ");
            out.push_str(&subheading);
        }
        out.push(HEADER_END);
        out.push_str("\n\n");
        out.push_str(&body);
        out.push('\n');
        out
    }
}

/// A document in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledDocument {
    pub id: String,
    pub pages: Vec<AssembledPage>,
}

impl AssembledDocument {
    pub fn new(id: impl Into<String>, pages: Vec<AssembledPage>) -> Self {
        Self {
            id: id.into(),
            pages,
        }
    }

    /// All fragments, page by page, in reading order.
    pub fn reading_order(&self) -> impl Iterator<Item = &Fragment> {
        self.pages.iter().flat_map(|page| page.fragments.iter())
    }

    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(|p| p.fragments.len()).sum()
    }

    /// Normalized texts in reading order separated by blank lines.
    pub fn to_plain_text(&self) -> String {
        self.reading_order()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Renders the document with article headers.
    ///
    /// Sentences broken across blocks or pages (no full stop before the
    /// break, lowercase letter after it) are rejoined with a single space.
    pub fn to_formatted_text(&self) -> String {
        let text = self
            .pages
            .iter()
            .map(AssembledPage::render)
            .collect::<Vec<_>>()
            .join("\n");
        CONTINUED_SENTENCE
            .replace_all(&text, "$1 $2")
            .replace(HEADER_END, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::PixelRect;

    fn fragment(page: u32, role: Role, text: &str) -> Fragment {
        let rect = PixelRect::new(0, 0, 10, 10).unwrap();
        let mut fragment = Fragment::new("doc", page, 0, rect, text);
        fragment.role = Some(role);
        fragment
    }

    #[test]
    fn test_title_page_rendering() {
        let page = AssembledPage::new(
            1,
            vec![
                fragment(1, Role::Title, "The Long"),
                fragment(1, Role::Title, "Road"),
                fragment(1, Role::Subheading, "A journey."),
                fragment(1, Role::Body, "First paragraph."),
                fragment(1, Role::Body, "Second paragraph."),
            ],
        )
        .with_author("Jane Doe");
        let text = AssembledDocument::new("doc", vec![page]).to_formatted_text();

        assert!(text.contains("Article title: The Long Road\n"));
        assert!(text.contains("Author: Jane Doe\nSummary: A journey.\n\nFirst paragraph."));
        assert!(text.contains("First paragraph.\n\nSecond paragraph."));
        assert_eq!(text.matches(DIVIDING_LINE).count(), 2);
        assert!(!text.contains(HEADER_END));
    }

    #[test]
    fn test_untitled_page_renders_quote() {
        let page = AssembledPage::new(
            2,
            vec![
                fragment(2, Role::Subheading, "A pull quote"),
                fragment(2, Role::Body, "More text."),
            ],
        );
        let text = AssembledDocument::new("doc", vec![page]).to_formatted_text();
        assert_eq!(
            text,
            format!("{DIVIDING_LINE}Quote: A pull quote{DIVIDING_LINE}More text.")
        );
    }

    #[test]
    fn test_sentences_rejoined_across_pages() {
        let pages = vec![
            AssembledPage::new(1, vec![fragment(1, Role::Body, "the cat sat on")]),
            AssembledPage::new(2, vec![fragment(2, Role::Body, "the mat.")]),
            AssembledPage::new(3, vec![fragment(3, Role::Body, "New start.")]),
        ];
        let text = AssembledDocument::new("doc", pages).to_formatted_text();
        assert_eq!(text, "the cat sat on the mat.\nNew start.");
    }

    #[test]
    fn test_lowercase_author_not_joined_with_body() {
        let page = AssembledPage::new(
            1,
            vec![
                fragment(1, Role::Title, "Title"),
                fragment(1, Role::Body, "lowercase start"),
            ],
        )
        .with_author("anon");
        let text = AssembledDocument::new("doc", vec![page]).to_formatted_text();
        assert!(text.contains("Author: anon\n\nlowercase start"));
    }

    #[test]
    fn test_plain_text_in_reading_order() {
        let pages = vec![
            AssembledPage::new(1, vec![fragment(1, Role::Title, "A"), fragment(1, Role::Body, "b")]),
            AssembledPage::new(2, vec![fragment(2, Role::Body, "c")]),
        ];
        let document = AssembledDocument::new("doc", pages);
        assert_eq!(document.to_plain_text(), "A\n\nb\n\nc");
        assert_eq!(document.fragment_count(), 3);
    }
}
