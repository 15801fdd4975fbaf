//! Filesystem adapters.

mod local;
mod memory;

pub use local::{LocalFilesystem, discover_repo_root};
pub use memory::MemoryFilesystem;
