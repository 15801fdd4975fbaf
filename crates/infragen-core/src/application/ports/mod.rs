//! Application ports (traits) for external dependencies.
//!
//! Driven ports are called by the application services and implemented in
//! `infragen-adapters`:
//!
//! - `ConfigSource`: structured document reads
//! - `Filesystem`: directory creation, writes, listing
//! - `TemplateRenderer`: template execution
//! - `SchemaValidator`: external schema checks
//! - `GenerationObserver`: progress reporting

pub mod output;

pub use output::{
    ConfigSource, Filesystem, GenerationObserver, NoopObserver, SchemaValidator, TemplateRenderer,
};
