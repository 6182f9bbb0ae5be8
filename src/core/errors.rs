//! Error types for the reflow pipeline.
//!
//! This module defines the errors that can occur while reconstructing reading
//! order: configuration problems, malformed input fragments, reference data
//! that failed to load, collaborator failures, and stage-level processing
//! errors. It also provides small constructors that keep call sites terse.

use thiserror::Error;

/// Enum representing the stages of the reflow pipeline.
///
/// Used to identify which stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Text repair and decorative-initial merging.
    Normalization,
    /// Reading-order assembly and author attachment.
    Assembly,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::Assembly => write!(f, "assembly"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Enum representing the errors that can occur in the reflow pipeline.
#[derive(Error, Debug)]
pub enum ReflowError {
    /// A component was used whose backing resource never loaded.
    #[error("component unavailable: {component} ({reason})")]
    ComponentUnavailable {
        /// Name of the component.
        component: String,
        /// Why the component could not be constructed.
        reason: String,
    },

    /// Reference data or a model file could not be loaded.
    #[error("failed to load {resource}: {message}")]
    ResourceLoad {
        /// The resource being loaded.
        resource: String,
        /// Description of the failure.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// An external collaborator (spell corrector, name recognizer) failed.
    #[error("{component} failed: {message}")]
    Collaborator {
        /// Name of the collaborator.
        component: String,
        /// Description of the failure.
        message: String,
    },

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for reflow operations.
pub type ReflowResult<T> = Result<T, ReflowError>;

impl ReflowError {
    /// Creates an error for a component that is not available.
    pub fn unavailable(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ComponentUnavailable {
            component: component.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for a resource that failed to load.
    pub fn resource_load(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResourceLoad {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for configuration errors.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates an error for configuration errors with context.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::ConfigError {
            message: format!(
                "Configuration error in field '{}' with value '{}': {}",
                field, value, reason
            ),
        }
    }

    /// Creates an error reported by an external collaborator.
    pub fn collaborator(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Creates an error for a failed processing stage.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Wraps an error raised while processing a single document.
    pub fn for_document(document_id: &str, error: ReflowError) -> Self {
        Self::Processing {
            kind: ProcessingStage::Generic,
            context: format!("document '{document_id}'"),
            source: Box::new(error),
        }
    }

    /// Returns true if this error signals a component that never loaded.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::ComponentUnavailable { .. } => true,
            Self::Processing { source, .. } => source
                .downcast_ref::<ReflowError>()
                .is_some_and(ReflowError::is_unavailable),
            _ => false,
        }
    }
}
