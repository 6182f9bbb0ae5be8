//! Processing stages of the reflow pipeline.
//!
//! Each stage annotates fragments in place; only the furniture filter and
//! the decorative-initial merge remove fragments.
//!
//! # Modules
//!
//! * `geometry` - Pixel rectangles and containment
//! * `text` - OCR text repair and decorative-initial merging
//! * `segmentation` - Unigram word segmentation used by spacing repair
//! * `capitalization` - Rank-based capitalization and apostrophe restoration
//! * `layout` - Column layout selection and column assignment
//! * `structure` - Font-size statistics, role classification, page furniture
//! * `names` - Author name canonicalization and byline recognition
//! * `sorting` - Reading order and author attachment

mod capitalization;
mod geometry;
pub mod layout;
pub mod names;
pub mod segmentation;
pub mod sorting;
pub mod structure;
pub mod text;

pub use capitalization::*;
pub use geometry::*;
pub use layout::{ColumnLayout, LayoutChoice, LayoutInference};
pub use names::{BylineRecognizer, NameCanonicalizer, NameConfig};
pub use segmentation::UnigramSegmenter;
pub use sorting::{ReadingOrderAssembler, author_query, sort_reading_order, title_case};
pub use structure::{StructureClassifier, StructureConfig};
pub use text::{TextConfig, TextNormalizer, merge_decorative_initials};
