//! Injector error types
//!
//! Provides a single error enum used by the registry, the injection wrappers
//! and the signature parser. Wrapped functions that return their own error
//! type only need `E: From<InjectorError>` to propagate resolution failures
//! with the `?` operator.

use thiserror::Error;

/// Injector-wide error type
///
/// # Example
///
/// ```rust
/// use injector::{InjectorError, Registry};
///
/// fn connection_string(registry: &Registry) -> Result<String, InjectorError> {
///     let url = registry.resolve::<String>("database_url")?;
///     Ok(url.to_string())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectorError {
    /// A named dependency was required but is not registered
    #[error("Dependency '{name}' is not registered")]
    MissingDependency {
        /// The dependency name that was looked up
        name: String,
    },

    /// A positional argument was required but the caller did not supply it
    #[error("Missing argument at position {position}")]
    MissingArgument {
        /// Zero-based argument position
        position: usize,
    },

    /// A value was found but holds a different type than requested
    #[error("Expected '{expected}' for {target}, found '{actual}'")]
    TypeMismatch {
        /// Where the value came from (`argument 2`, `dependency 'db'`, ...)
        target: String,
        /// The requested type name
        expected: &'static str,
        /// The stored type name
        actual: &'static str,
    },

    /// Source text did not contain a recognizable function header
    #[error("Cannot derive dependency names from signature: {source_excerpt}")]
    UnrecognizedSignature {
        /// The first line of the offending source text
        source_excerpt: String,
    },

    /// Deriving specs from source text is switched off in the configuration
    #[error("Signature parsing is disabled; supply an explicit injection spec")]
    SignatureParsingDisabled,
}

impl InjectorError {
    /// Create a MissingDependency error
    pub fn missing_dependency(name: impl Into<String>) -> Self {
        Self::MissingDependency { name: name.into() }
    }

    /// Create a MissingArgument error
    pub fn missing_argument(position: usize) -> Self {
        Self::MissingArgument { position }
    }

    /// Create a TypeMismatch error for a requested type `T`
    pub fn type_mismatch<T: ?Sized>(target: impl Into<String>, actual: &'static str) -> Self {
        Self::TypeMismatch {
            target: target.into(),
            expected: std::any::type_name::<T>(),
            actual,
        }
    }

    /// Create an UnrecognizedSignature error, keeping only the first line of `source`
    pub fn unrecognized_signature(source: &str) -> Self {
        let excerpt = source.trim().lines().next().unwrap_or_default();
        Self::UnrecognizedSignature {
            source_excerpt: excerpt.to_string(),
        }
    }

    /// Check whether this error reports something absent (dependency or argument)
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::MissingDependency { .. } | Self::MissingArgument { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_message() {
        let err = InjectorError::missing_dependency("db");
        assert_eq!(err.to_string(), "Dependency 'db' is not registered");
        assert!(err.is_missing());
    }

    #[test]
    fn test_type_mismatch_names_requested_type() {
        let err = InjectorError::type_mismatch::<u32>("argument 0", "alloc::string::String");
        assert_eq!(
            err.to_string(),
            "Expected 'u32' for argument 0, found 'alloc::string::String'"
        );
        assert!(!err.is_missing());
    }

    #[test]
    fn test_unrecognized_signature_keeps_first_line() {
        let err = InjectorError::unrecognized_signature("  (a, b) => {\n  return a;\n}");
        assert_eq!(
            err,
            InjectorError::UnrecognizedSignature {
                source_excerpt: "(a, b) => {".to_string()
            }
        );
    }
}
