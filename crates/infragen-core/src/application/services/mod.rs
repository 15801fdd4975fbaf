//! Application services - orchestrate use cases.
//!
//! `GenerateService` runs the environment generation pipeline,
//! `ConfigLoader` reads and merges a config package, and
//! `DefinitionValidationService` checks the shared definition catalogs.

pub mod config_loader;
pub mod generate_service;
pub mod validation_service;

pub use config_loader::ConfigLoader;
pub use generate_service::{GenerateService, GenerationReport, GenerationRequest};
pub use validation_service::{DefinitionReport, DefinitionValidationService};
