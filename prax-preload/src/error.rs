//! Error types for lazy preloading with actionable messages.
//!
//! Errors carry a code for programmatic handling, the model and association
//! that were involved, and suggestions for fixing the problem.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: P{category}{number}
//! - 11xx: Association errors (unknown association, unloaded target, bad tree path)
//! - 9xxx: Internal errors
//!
//! ```rust
//! use prax_preload::{ErrorCode, PreloadError};
//!
//! let err = PreloadError::unknown_association("User", "postz");
//! assert_eq!(err.code, ErrorCode::UnknownAssociation);
//! assert!(err.to_string().contains("postz"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for preloading operations.
pub type PreloadResult<T> = Result<T, PreloadError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Association errors (11xx)
    /// Association name is not declared on the record's model (P1101).
    UnknownAssociation = 1101,
    /// Association is declared but its target was never loaded (P1102).
    AssociationNotLoaded = 1102,
    /// Association tree path is malformed (P1103).
    InvalidTree = 1103,

    // Internal errors (9xxx)
    /// Internal error (P9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "P1101").
    pub fn code(&self) -> String {
        format!("P{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnknownAssociation => "Unknown association",
            Self::AssociationNotLoaded => "Association not loaded",
            Self::InvalidTree => "Invalid association tree",
            Self::Internal => "Internal error",
        }
    }

    /// Get the documentation URL for this error.
    pub fn docs_url(&self) -> String {
        format!("https://prax.rs/docs/errors/{}", self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The model involved.
    pub model: Option<String>,
    /// The association involved.
    pub association: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<String>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur while building or walking preload contexts.
#[derive(Error, Debug)]
pub struct PreloadError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for PreloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl PreloadError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(suggestion.into());
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.context.model = Some(model.into());
        self
    }

    /// Set the association.
    pub fn with_association(mut self, association: impl Into<String>) -> Self {
        self.context.association = Some(association.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create an unknown association error.
    pub fn unknown_association(model: impl Into<String>, association: impl Into<String>) -> Self {
        let model = model.into();
        let association = association.into();
        Self::new(
            ErrorCode::UnknownAssociation,
            format!("Association `{}` is not declared on {}", association, model),
        )
        .with_model(&model)
        .with_association(&association)
        .with_suggestion(format!("Check the spelling of `{}`", association))
        .with_suggestion(format!(
            "Declare the relation on {} before traversing it lazily",
            model
        ))
    }

    /// Create an association-not-loaded error.
    pub fn not_loaded(model: impl Into<String>, association: impl Into<String>) -> Self {
        let model = model.into();
        let association = association.into();
        Self::new(
            ErrorCode::AssociationNotLoaded,
            format!("Association {}.{} has not been loaded", model, association),
        )
        .with_model(&model)
        .with_association(&association)
        .with_help("Lazy preloading only re-shapes records that are already in memory")
    }

    /// Create an invalid tree error.
    pub fn invalid_tree(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidTree,
            format!("Invalid association tree: {}", message.into()),
        )
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message.into())
            .with_help("This is likely a bug in Prax - please report it")
    }

    // ============== Error Properties ==============

    /// Check if this is an unknown association error.
    pub fn is_unknown_association(&self) -> bool {
        self.code == ErrorCode::UnknownAssociation
    }

    /// Get the documentation URL for this error.
    pub fn docs_url(&self) -> String {
        self.code.docs_url()
    }

    /// Display the error with all context in a multi-line format.
    pub fn display_full(&self) -> String {
        let mut output = format!("Error [{}]: {}", self.code.code(), self.message);

        if let Some(ref model) = self.context.model {
            output.push_str(&format!("\n  Model: {}", model));
        }
        if let Some(ref association) = self.context.association {
            output.push_str(&format!("\n  Association: {}", association));
        }
        for suggestion in &self.context.suggestions {
            output.push_str(&format!("\n  Suggestion: {}", suggestion));
        }
        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\n  Help: {}", help));
        }
        output.push_str(&format!("\n  Docs: {}", self.docs_url()));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::UnknownAssociation.code(), "P1101");
        assert_eq!(ErrorCode::AssociationNotLoaded.code(), "P1102");
        assert_eq!(ErrorCode::Internal.code(), "P9001");
    }

    #[test]
    fn test_unknown_association_error() {
        let err = PreloadError::unknown_association("User", "postz");
        assert!(err.is_unknown_association());
        assert_eq!(err.context.model.as_deref(), Some("User"));
        assert_eq!(err.context.association.as_deref(), Some("postz"));
        assert_eq!(err.to_string(), "[P1101] Association `postz` is not declared on User");
    }

    #[test]
    fn test_display_full() {
        let err = PreloadError::not_loaded("Post", "comments");
        let full = err.display_full();
        assert!(full.contains("Model: Post"));
        assert!(full.contains("Association: comments"));
        assert!(full.contains("Help:"));
        assert!(full.contains("https://prax.rs/docs/errors/P1102"));
    }

    #[test]
    fn test_invalid_tree() {
        let err = PreloadError::invalid_tree("empty segment in `posts..author`");
        assert_eq!(err.code, ErrorCode::InvalidTree);
        assert!(err.message.contains("posts..author"));
    }
}
