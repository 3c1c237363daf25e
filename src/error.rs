//! Fatal error types for the injection compiler.
//!
//! Structural problems in the user's configuration are *not* errors in
//! this sense: they are reported through [`ErrorReporter`](crate::ErrorReporter)
//! and accumulated. A [`CompilerError`] aborts the run.

use thiserror::Error;

use crate::types::ObjectType;

/// Unrecoverable compiler errors.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{CompilerError, ObjectType};
///
/// let error = CompilerError::ClassNotFound(ObjectType::new("com/example/Missing"));
/// assert_eq!(error.to_string(), "Class not found: com.example.Missing");
///
/// let exhausted = CompilerError::NameExhausted { pattern: "Foo$Provider{}".into() };
/// assert!(exhausted.to_string().contains("Foo$Provider{}"));
/// ```
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The metadata source has no descriptor for a referenced type
    #[error("Class not found: {0}")]
    ClassNotFound(ObjectType),

    /// A type that cannot stand for a dependency (e.g. a method signature)
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// Every candidate identity for a naming pattern is taken
    #[error("Cannot generate a unique name with pattern: {pattern}")]
    NameExhausted { pattern: String },

    /// The emission backend failed to serialize a generated unit
    #[error("Failed to emit {ty}: {message}")]
    Emission { ty: ObjectType, message: String },

    /// Artifact sink failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A debug report could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Invalid processor configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for compiler operations.
pub type CompilerResult<T> = Result<T, CompilerError>;
