//! Definition validation - checks the shared definition catalogs under
//! `api/definitions` with the external schema validator.

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::{
    application::ports::{Filesystem, SchemaValidator},
    domain::{DefinitionKind, SchemaLayout},
    error::InfragenResult,
};

/// Outcome of a definitions run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionReport {
    /// Files that passed, in the order they were checked.
    pub validated: Vec<PathBuf>,
    /// Definition directories with no `*.yml` files.
    pub empty_dirs: Vec<PathBuf>,
}

pub struct DefinitionValidationService {
    layout: SchemaLayout,
    filesystem: Box<dyn Filesystem>,
    validator: Box<dyn SchemaValidator>,
}

impl DefinitionValidationService {
    pub fn new(
        repo_root: impl Into<PathBuf>,
        filesystem: Box<dyn Filesystem>,
        validator: Box<dyn SchemaValidator>,
    ) -> Self {
        Self {
            layout: SchemaLayout::new(repo_root),
            filesystem,
            validator,
        }
    }

    /// Validate sizes, roles, vlans and disks in that order. The first
    /// failing file aborts the run.
    #[instrument(skip_all)]
    pub fn validate_definitions(&self) -> InfragenResult<DefinitionReport> {
        self.validator.ensure_available()?;

        let mut report = DefinitionReport::default();
        for kind in DefinitionKind::ALL {
            let dir = self.layout.definitions_dir(kind);
            let files = self.filesystem.list_files(&dir, "yml")?;
            if files.is_empty() {
                warn!(dir = %dir.display(), "no definition files found");
                report.empty_dirs.push(dir);
                continue;
            }
            for file in files {
                self.validator
                    .validate(&self.layout.definition_check(kind, &file))?;
                info!(%kind, file = %file.display(), "validated");
                report.validated.push(file);
            }
        }
        Ok(report)
    }
}
