//! Schema validation through the `yaml-validator-cli` executable.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use infragen_core::{
    application::{ApplicationError, ports::SchemaValidator},
    domain::SchemaCheck,
    error::InfragenResult,
};

pub const DEFAULT_VALIDATOR_COMMAND: &str = "yaml-validator-cli";

/// Runs `<command> -s <schema> <meta-schema> -u <schema-name> <file>`.
#[derive(Debug, Clone)]
pub struct YamlValidatorCli {
    command: String,
}

impl YamlValidatorCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn args(check: &SchemaCheck) -> Vec<&std::ffi::OsStr> {
        vec![
            "-s".as_ref(),
            check.schema.as_os_str(),
            check.meta_schema.as_os_str(),
            "-u".as_ref(),
            check.schema_name.as_ref(),
            check.file.as_os_str(),
        ]
    }
}

impl Default for YamlValidatorCli {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATOR_COMMAND)
    }
}

impl SchemaValidator for YamlValidatorCli {
    fn ensure_available(&self) -> InfragenResult<()> {
        if find_executable(&self.command).is_some() {
            Ok(())
        } else {
            Err(ApplicationError::ValidatorUnavailable {
                command: self.command.clone(),
            }
            .into())
        }
    }

    fn validate(&self, check: &SchemaCheck) -> InfragenResult<()> {
        debug!(
            command = %self.command,
            schema = %check.schema.display(),
            file = %check.file.display(),
            "running validator"
        );
        let output = Command::new(&self.command)
            .args(Self::args(check))
            .output()
            .map_err(|e| ApplicationError::ValidationFailure {
                file: check.file.clone(),
                message: format!("failed to run {}: {}", self.command, e),
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(ApplicationError::ValidationFailure {
                file: check.file.clone(),
                message: combined.trim().to_owned(),
            }
            .into());
        }

        info!(file = %check.file.display(), "validated");
        Ok(())
    }
}

/// Resolve `command` the way a shell would: as a path when it contains a
/// separator, otherwise by searching `PATH`.
fn find_executable(command: &str) -> Option<PathBuf> {
    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(command))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
