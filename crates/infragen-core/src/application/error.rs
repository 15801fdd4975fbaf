//! Application layer errors.
//!
//! Failures at the effect boundary: reading sources, rendering templates,
//! writing artifacts, running the external validator. Decision failures are
//! `DomainError` from `crate::domain`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while driving a generation or validation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A mandatory config source or template file is absent.
    #[error("{what} not found: {path}")]
    SourceNotFound { what: String, path: PathBuf },

    /// A file exists but could not be read.
    #[error("Failed to read {path}: {reason}")]
    ReadFailure { path: PathBuf, reason: String },

    /// A structured document is malformed.
    #[error("Failed to parse {path}: {reason}")]
    ParseFailure { path: PathBuf, reason: String },

    /// Template parse or execution failed.
    #[error("Failed to render template {template} ({stage}): {reason}")]
    RenderFailure {
        template: PathBuf,
        stage: RenderStage,
        reason: String,
    },

    /// Filesystem write or directory creation failed.
    #[error("Failed to write {path}: {reason}")]
    WriteFailure { path: PathBuf, reason: String },

    /// The external validator rejected a document or could not be run.
    #[error("Validation failed for {file}: {message}")]
    ValidationFailure { file: PathBuf, message: String },

    /// The external validator executable is not installed.
    #[error("{command} not found")]
    ValidatorUnavailable { command: String },
}

/// Where in rendering a template failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Parse,
    Execution,
    MissingReference,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parse => "parse error",
            Self::Execution => "execution error",
            Self::MissingReference => "undefined reference",
        })
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SourceNotFound { path, .. } => vec![
                format!("Expected file at: {}", path.display()),
                "Check the --config package id and the repository root".into(),
            ],
            Self::ParseFailure { path, .. } => vec![
                format!("Fix the syntax of {}", path.display()),
                "Documents must be valid YAML (or JSON for package.json)".into(),
            ],
            Self::RenderFailure { template, stage, .. } => {
                let mut hints = vec![format!("Template: {}", template.display())];
                if *stage == RenderStage::MissingReference {
                    hints.push("The template references a field the merged config does not have".into());
                }
                hints
            }
            Self::WriteFailure { path, .. } => vec![
                format!("Failed to write: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ValidationFailure { .. } => vec![
                "Fix the document so it matches its schema".into(),
                "Or rerun with --skip-validate".into(),
            ],
            Self::ValidatorUnavailable { command } => vec![
                format!("Install it: cargo install {}", command),
                "Or point validator.command at an existing binary".into(),
                "Or rerun with --skip-validate".into(),
            ],
            Self::ReadFailure { .. } => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceNotFound { .. } | Self::ValidatorUnavailable { .. } => {
                ErrorCategory::NotFound
            }
            Self::ParseFailure { .. } | Self::ValidationFailure { .. } => ErrorCategory::Validation,
            Self::RenderFailure { .. } => ErrorCategory::Template,
            Self::ReadFailure { .. } | Self::WriteFailure { .. } => ErrorCategory::Internal,
        }
    }
}
