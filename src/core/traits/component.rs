//! Availability wrapper for components backed by loadable resources.

use crate::core::{ReflowError, ReflowResult};
use tracing::{error, info};

/// A pipeline component that either loaded successfully or did not.
///
/// Resource-load failures are logged once, at construction. Every later use
/// of an unavailable component returns [`ReflowError::ComponentUnavailable`]
/// instead of a value that could be mistaken for a real result.
#[derive(Debug, Clone)]
pub enum Component<T> {
    /// The component is loaded and usable.
    Ready(T),
    /// The component could not be constructed.
    Unavailable {
        /// Component name used in error messages.
        name: String,
        /// Why loading failed.
        reason: String,
    },
}

impl<T> Component<T> {
    /// Runs `loader`, logging and capturing any failure.
    pub fn load<F>(name: &str, loader: F) -> Self
    where
        F: FnOnce() -> ReflowResult<T>,
    {
        match loader() {
            Ok(value) => {
                info!("{} loaded", name);
                Self::Ready(value)
            }
            Err(e) => {
                error!("{} could not be loaded: {}", name, e);
                Self::Unavailable {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Marks a component as unavailable without attempting a load.
    pub fn unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the loaded component or a `ComponentUnavailable` error.
    pub fn get(&self) -> ReflowResult<&T> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Unavailable { name, reason } => Err(ReflowError::unavailable(name, reason)),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_success() {
        let component = Component::load("table", || Ok(42));
        assert!(component.is_ready());
        assert_eq!(*component.get().unwrap(), 42);
    }

    #[test]
    fn test_load_failure_fails_fast_on_use() {
        let component: Component<u32> = Component::load("reference names", || {
            Err(ReflowError::resource_load("names.txt", "not found"))
        });
        assert!(!component.is_ready());
        let err = component.get().unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("reference names"));
    }
}
