//! YAML config source.
//!
//! Reads YAML (and therefore JSON) documents into `serde_json::Value` so the
//! core decodes every source the same way regardless of on-disk syntax.

use std::io;
use std::path::Path;

use serde_json::Value;
use tracing::trace;

use infragen_core::{
    application::{ApplicationError, ports::ConfigSource},
    error::{InfragenError, InfragenResult},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlConfigSource;

impl YamlConfigSource {
    pub fn new() -> Self {
        Self
    }

    fn read(&self, path: &Path) -> Result<Option<Value>, InfragenError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ApplicationError::ReadFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
                .into());
            }
        };
        trace!(path = %path.display(), bytes = text.len(), "read document");
        parse_document(path, &text).map(Some)
    }
}

impl ConfigSource for YamlConfigSource {
    fn read_document(&self, path: &Path) -> InfragenResult<Value> {
        self.read(path)?.ok_or_else(|| {
            ApplicationError::SourceNotFound {
                what: "document".into(),
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    fn read_optional_document(&self, path: &Path) -> InfragenResult<Option<Value>> {
        self.read(path)
    }
}

/// An empty or comment-only document parses as `null`.
///
/// Aliases and `<<` merge keys are resolved before the document is handed
/// on, so merged fields read like any other.
pub fn parse_document(path: &Path, text: &str) -> InfragenResult<Value> {
    let blank = text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(Value::Null);
    }
    let parse_failure = |reason: String| -> InfragenError {
        ApplicationError::ParseFailure {
            path: path.to_path_buf(),
            reason,
        }
        .into()
    };
    let mut yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| parse_failure(e.to_string()))?;
    yaml.apply_merge().map_err(|e| parse_failure(e.to_string()))?;
    serde_json::to_value(yaml).map_err(|e| parse_failure(e.to_string()))
}
