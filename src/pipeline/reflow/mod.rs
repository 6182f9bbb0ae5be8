//! The reflow pipeline: OCR fragments in, reading-ordered documents out.

mod builder;
mod config;
mod orchestration;
mod result;

pub use builder::{ReflowBuilder, ReflowContext, configure_thread_pool_once};
pub use config::{ParallelPolicy, ReflowConfig, default_layouts};
pub use orchestration::Reflow;
pub use result::{BatchOutcome, DocumentFailure};
