//! Common error infrastructure for rules-core.
//!
//! This module provides shared types and traits used across all error types in rules-core.
//! Domain-specific errors (e.g., `AttrError`, `ResolveError`) are defined in their
//! respective modules alongside the operations they validate.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each component has its own error type with specific variants
//! - **Rich Context**: Errors name the offending attribute, pattern or input text
//! - **Severity Classification**: Errors are categorized so content layers can decide
//!   whether to reject input or abort a pass

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their expected handling:
/// - **Validation**: Malformed registration input that should be rejected
/// - **Fatal**: Configuration errors that make the current resolution pass meaningless
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: malformed attribute name, unknown operator, bad formula
    Validation,

    /// Fatal error - resolution cannot produce a meaningful result.
    ///
    /// Examples: two attributes transitively requiring each other
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }
}

/// Common trait for all rules-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait RulesError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
    }
}
