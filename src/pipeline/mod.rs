//! Pipeline assembly.
//!
//! Wires the processing stages into a batch driver, loads configuration files
//! and keeps run statistics.

mod config;
pub mod reflow;
pub mod stats;

pub use config::{ConfigFormat, ConfigLoader};
pub use reflow::{
    BatchOutcome, DocumentFailure, ParallelPolicy, Reflow, ReflowBuilder, ReflowConfig,
    ReflowContext, configure_thread_pool_once, default_layouts,
};
pub use stats::{DocumentMetrics, PipelineStats, StatsManager};
