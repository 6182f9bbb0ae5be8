//! # Periodical Reflow
//!
//! Reconstructs reading order from OCR output of multi-column periodicals.
//! OCR engines return text fragments with page coordinates but no idea of
//! columns, headings or articles; this crate turns them back into articles
//! that read top to bottom.
//!
//! ## Stages
//!
//! - **Text repair**: hyphenation, word spacing, capitalization, paragraph
//!   breaks and decorative initial letters
//! - **Page furniture removal**: running headers and footers
//! - **Layout inference**: two, three or four columns, chosen per page
//! - **Structure classification**: title, subheading or body, from a
//!   font-size proxy and document-wide statistics
//! - **Reading order and authors**: ordering by role, column and height,
//!   with bylines resolved against a directory of known names
//!
//! ## Modules
//!
//! * [`core`] - Errors, collaborator traits, validation and defaults
//! * [`domain`] - Fragments, pages, documents and the name directory
//! * [`processors`] - The processing stages
//! * [`pipeline`] - Configuration, batch driver and statistics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use periodical_reflow::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load_from_file(Path::new("reflow.toml"))?;
//! let reflow = ReflowBuilder::from_config(config)
//!     .word_segmenter(Arc::new(UnigramSegmenter::load(Path::new("words.txt"))?))
//!     .name_recognizer(Arc::new(BylineRecognizer))
//!     .reference_names(ReferenceNameDirectory::load(Path::new("authors.txt"))?)
//!     .build()?;
//!
//! let records: Vec<FragmentRecord> =
//!     serde_json::from_str(&std::fs::read_to_string("issue.json")?)?;
//! let fragments = records
//!     .into_iter()
//!     .enumerate()
//!     .map(|(i, record)| Fragment::from_record(record, i, "issue"))
//!     .collect::<ReflowResult<Vec<_>>>()?;
//!
//! let outcome = reflow.process_batch(fragments);
//! for document in &outcome.documents {
//!     println!("{}", document.to_formatted_text());
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;

/// Prelude module for convenient imports.
///
/// ```rust
/// use periodical_reflow::prelude::*;
/// ```
///
/// Covers building and running the pipeline and reading its output. Stage
/// internals live in [`crate::processors`].
pub mod prelude {
    pub use crate::pipeline::{
        BatchOutcome, ConfigLoader, PipelineStats, Reflow, ReflowBuilder, ReflowConfig,
    };

    pub use crate::domain::{
        AssembledDocument, AssembledPage, Fragment, FragmentRecord, ReferenceNameDirectory, Role,
    };

    pub use crate::processors::{BylineRecognizer, UnigramSegmenter};

    pub use crate::core::{
        NameRecognizer, ReflowError, ReflowResult, SpellCorrector, WordSegmenter, init_tracing,
    };
}
