//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use infragen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{InfragenError, InfragenResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> InfragenResult<()> {
        std::fs::create_dir_all(path).map_err(|e| write_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> InfragenResult<()> {
        std::fs::write(path, content).map_err(|e| write_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, dir: &Path, ext: &str) -> InfragenResult<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ApplicationError::ReadFailure {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ApplicationError::ReadFailure {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                })?
                .path();
            if path.is_file() && path.extension().is_some_and(|x| x == ext) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Walk up from `start` to the first directory containing `.git`.
pub fn discover_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

fn write_error(path: &Path, e: io::Error, operation: &str) -> InfragenError {
    ApplicationError::WriteFailure {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
