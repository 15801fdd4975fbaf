//! Infrastructure adapters for infragen.
//!
//! Implements the ports defined in `infragen_core::application::ports`.
//! Every I/O operation of the generator lives here.

pub mod config_source;
pub mod filesystem;
pub mod renderer;
pub mod validator;

pub use config_source::YamlConfigSource;
pub use filesystem::{LocalFilesystem, MemoryFilesystem, discover_repo_root};
pub use renderer::MiniJinjaRenderer;
pub use validator::{DEFAULT_VALIDATOR_COMMAND, YamlValidatorCli};
