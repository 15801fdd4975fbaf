//! Application layer for infragen.
//!
//! - **Services**: the generation pipeline, the config loader, definition
//!   validation
//! - **Ports**: traits for everything with side effects
//! - **Errors**: failures at the I/O boundary
//!
//! Decisions (merge, resolution, manifest content) live in `crate::domain`.

pub mod error;
pub mod events;
pub mod ports;
pub mod services;

pub use services::{
    ConfigLoader, DefinitionReport, DefinitionValidationService, GenerateService,
    GenerationReport, GenerationRequest,
};

pub use ports::{
    ConfigSource, Filesystem, GenerationObserver, NoopObserver, SchemaValidator, TemplateRenderer,
};

pub use error::{ApplicationError, RenderStage};
pub use events::GenerationEvent;
