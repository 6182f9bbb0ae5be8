//! Constants used throughout the reflow pipeline.
//!
//! Geometric defaults assume page images rendered at 300 dpi (a US letter page
//! is 2550 x 3300 pixels) with the y axis growing downward.

/// Fragments whose top edge lies beyond this coordinate are page furniture.
pub const DEFAULT_HEADER_CUTOFF: i32 = 3200;

/// Fragments whose bottom edge lies before this coordinate are page furniture.
pub const DEFAULT_FOOTER_CUTOFF: i32 = 100;

/// Font-size proxy (square pixels per character) above which a fragment is a title.
pub const DEFAULT_TITLE_FONT_SIZE_CUTOFF: f64 = 4000.0;

/// Minimum document z-score for a subheading.
pub const DEFAULT_SUBHEADING_ZSCORE: f64 = 0.8;

/// Letter runs longer than this are windowed before word segmentation.
pub const DEFAULT_SEGMENT_MAX_LEN: usize = 200;

/// Stand-in for a paragraph break while whitespace is being normalized.
pub const DEFAULT_PARAGRAPH_BREAK_PLACEHOLDER: &str = "&&&";

/// Minimum normalized edit-distance similarity for a reference-name match.
pub const DEFAULT_NAME_SCORE_CUTOFF: f64 = 0.9;

/// Longest candidate word considered by the unigram segmenter.
pub const MAX_SEGMENT_WORD_LEN: usize = 24;

/// Documents with at most this many pages run the page stage sequentially.
pub const DEFAULT_PAGE_PARALLEL_THRESHOLD: usize = 4;

/// Divider placed around title and quote blocks in formatted output.
pub const DIVIDING_LINE: &str = "\n-----------------------------------------------------\n";
