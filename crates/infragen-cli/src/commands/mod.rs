//! Command handlers, one module per subcommand.

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod validate;

use std::path::{Path, PathBuf};

use infragen_adapters::discover_repo_root;

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// `--repo-root`, then `paths.repo_root`, then the nearest ancestor of the
/// working directory that contains `.git`. Always absolute.
pub fn resolve_repo_root(global: &GlobalArgs, config: &AppConfig) -> CliResult<PathBuf> {
    let cwd = std::env::current_dir()?;
    resolve_from(&cwd, global, config)
}

fn resolve_from(cwd: &Path, global: &GlobalArgs, config: &AppConfig) -> CliResult<PathBuf> {
    match global.repo_root.as_ref().or(config.paths.repo_root.as_ref()) {
        // joining an absolute root replaces `cwd`
        Some(root) => Ok(cwd.join(root)),
        None => discover_from(cwd),
    }
}

fn discover_from(start: &Path) -> CliResult<PathBuf> {
    discover_repo_root(start).ok_or_else(|| CliError::RepoRootNotFound {
        start: start.to_path_buf(),
    })
}
