// ============================================================================
// domain/error.rs - DECISION LAYER ERRORS
// ============================================================================

use thiserror::Error;

/// Errors raised by the pure decision layer (selection, merge, resolution).
///
/// All errors are:
/// - Cloneable (reports can keep a copy)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Input Errors
    // ========================================================================
    #[error("Missing required input: {field}")]
    MissingRequiredInput { field: &'static str },

    #[error("Invalid {field} '{value}': expected a single name without path separators")]
    InvalidPathSegment { field: &'static str, value: String },

    // ========================================================================
    // Selection Errors
    // ========================================================================
    #[error("unsupported {axis}: {value}")]
    UnsupportedSelection { axis: &'static str, value: String },

    #[error("{axis} settings do not match the selection '{selected}' (got '{provided}')")]
    SelectionMismatch {
        axis: &'static str,
        selected: String,
        provided: String,
    },

    // ========================================================================
    // Shape Errors
    // ========================================================================
    #[error("Value cannot be used as a render context: {reason}")]
    InvalidRenderContext { reason: String },

    #[error("Failed to serialize {what}: {reason}")]
    Serialization { what: &'static str, reason: String },
}

impl DomainError {
    /// Shorthand for an unsupported platform value.
    pub fn unsupported_platform(value: impl Into<String>) -> Self {
        Self::UnsupportedSelection {
            axis: "platform",
            value: value.into(),
        }
    }

    /// Shorthand for an unsupported orchestrator value.
    pub fn unsupported_orchestrator(value: impl Into<String>) -> Self {
        Self::UnsupportedSelection {
            axis: "orchestrator",
            value: value.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredInput { field } => vec![
                format!("Provide a value for '{}'", field),
                "Example: infragen generate env --id development".into(),
            ],
            Self::InvalidPathSegment { field, .. } => vec![
                format!("The {} becomes a directory name; use a plain name", field),
                "Example: infragen generate env --id staging".into(),
            ],
            Self::UnsupportedSelection { axis, value } => {
                let supported = match *axis {
                    "platform" => "proxmox, aws, gcp, azure, none",
                    "orchestrator" => "kubespray, kubekey, kind",
                    _ => "see documentation",
                };
                vec![
                    format!("'{}' is not a supported {}", value, axis),
                    format!("Supported values: {}", supported),
                    "Check config.yaml in the selected config package".into(),
                ]
            }
            Self::SelectionMismatch { .. } => vec![
                "The loaded settings disagree with the master config selection".into(),
                "This is likely a bug in a config source adapter".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingRequiredInput { .. } | Self::InvalidPathSegment { .. } => {
                ErrorCategory::Validation
            }
            Self::UnsupportedSelection { .. } => ErrorCategory::Selection,
            Self::SelectionMismatch { .. }
            | Self::InvalidRenderContext { .. }
            | Self::Serialization { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Selection,
    Internal,
}
