//! Unified error handling for infragen core.
//!
//! Wraps domain and application errors with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for infragen core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InfragenError {
    /// Errors from the decision layer.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors at the I/O boundary.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl InfragenError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec!["This appears to be a bug in infragen".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Selection => ErrorCategory::Selection,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Selection,
    NotFound,
    Template,
    Internal,
}

/// Convenient result type alias.
pub type InfragenResult<T> = Result<T, InfragenError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unsupported_selection_is_a_selection_error() {
        let err: InfragenError = DomainError::unsupported_orchestrator("swarm").into();
        assert_eq!(err.category(), ErrorCategory::Selection);
        assert_eq!(err.to_string(), "unsupported orchestrator: swarm");
    }

    #[test]
    fn missing_source_is_not_found() {
        let err: InfragenError = ApplicationError::SourceNotFound {
            what: "hosts config".into(),
            path: PathBuf::from("/repo/config/packages/core/hosts.yaml"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("hosts.yaml"));
    }
}
