//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `infragen-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::application::events::GenerationEvent;
use crate::domain::{RenderContext, SchemaCheck};
use crate::error::InfragenResult;

/// Port for reading structured config documents.
///
/// Implemented by:
/// - `infragen_adapters::config_source::YamlConfigSource`
pub trait ConfigSource: Send + Sync {
    /// Read and decode a mandatory document. A missing file is
    /// `ApplicationError::SourceNotFound`.
    fn read_document(&self, path: &Path) -> InfragenResult<Value>;

    /// Read a document that may legitimately be absent.
    fn read_optional_document(&self, path: &Path) -> InfragenResult<Option<Value>>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `infragen_adapters::filesystem::LocalFilesystem` (production)
/// - `infragen_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> InfragenResult<()>;

    /// Write content to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &str) -> InfragenResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Files directly inside `dir` with extension `ext`, sorted by path.
    /// A missing directory yields an empty list.
    fn list_files(&self, dir: &Path, ext: &str) -> InfragenResult<Vec<PathBuf>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `infragen_adapters::renderer::MiniJinjaRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render the template at `template` against `context`.
    ///
    /// The template is read and parsed on every call.
    fn render(&self, template: &Path, context: &RenderContext) -> InfragenResult<String>;
}

/// Port for the external schema validator.
///
/// Implemented by:
/// - `infragen_adapters::validator::YamlValidatorCli` (subprocess)
pub trait SchemaValidator: Send + Sync {
    /// Fail early when the validator cannot be run at all.
    fn ensure_available(&self) -> InfragenResult<()> {
        Ok(())
    }

    /// Validate `check.file` against `check.schema`.
    fn validate(&self, check: &SchemaCheck) -> InfragenResult<()>;
}

/// Receives pipeline progress as it happens.
pub trait GenerationObserver {
    fn on_event(&mut self, event: &GenerationEvent);
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {
    fn on_event(&mut self, _event: &GenerationEvent) {}
}
