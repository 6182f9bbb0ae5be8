//! Trait definitions for the reflow pipeline.
//!
//! The pipeline treats word segmentation, spell correction and named-entity
//! recognition as opaque collaborators. Each is expressed as a trait here so
//! the concrete implementation (a statistical model, a remote service, or a
//! test double) can be swapped without touching the processing stages.

pub mod collaborators;
mod component;

pub use collaborators::{NameRecognizer, PassthroughCorrector, SpellCorrector, WordSegmenter};
pub use component::Component;
