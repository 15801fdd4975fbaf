//! Template rendering adapters.

pub mod functions;
mod jinja;

pub use jinja::MiniJinjaRenderer;
