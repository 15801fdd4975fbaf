//! infragen core - hexagonal architecture implementation
//!
//! Domain and application layers of the infragen environment generator,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          infragen-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerateService, ConfigLoader, ...)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │ (ConfigSource, Filesystem, Renderer...) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   infragen-adapters (Infrastructure)    │
//! │ (YamlConfigSource, MiniJinjaRenderer..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (merge, PathResolver, manifest)         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use infragen_core::prelude::*;
//!
//! let service = GenerateService::new(repo_root, source, filesystem, renderer);
//! let report = service.generate(
//!     &GenerationRequest::new("development", "core"),
//!     &mut NoopObserver,
//! )?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

pub mod prelude {
    pub use crate::application::{
        ConfigLoader, DefinitionValidationService, GenerateService, GenerationEvent,
        GenerationReport, GenerationRequest,
        ports::{
            ConfigSource, Filesystem, GenerationObserver, NoopObserver, SchemaValidator,
            TemplateRenderer,
        },
    };
    pub use crate::domain::{
        ArtifactKind, EnvironmentModule, MergedConfig, Orchestrator, PathResolver, Platform,
        RenderContext,
    };
    pub use crate::error::{InfragenError, InfragenResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
