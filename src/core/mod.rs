//! The core module of the reflow pipeline.
//!
//! This module contains the fundamental pieces shared by every stage:
//! - Constants used as configuration defaults
//! - Error handling
//! - Collaborator traits and the component availability wrapper
//! - Validation helpers
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod constants;
pub mod errors;
pub mod traits;
pub mod validation;

pub use constants::*;
pub use errors::{ProcessingStage, ReflowError, ReflowResult};
pub use traits::{
    Component, NameRecognizer, PassthroughCorrector, SpellCorrector, WordSegmenter,
};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
