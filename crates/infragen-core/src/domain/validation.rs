//! Where schema validation looks: schema files, schema names and candidate
//! documents for environment overrides and shared definitions.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::EnvironmentModule;

/// A (schema, candidate document) pair handed to the external validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCheck {
    pub schema: PathBuf,
    pub meta_schema: PathBuf,
    pub schema_name: String,
    pub file: PathBuf,
}

/// Schema layout under `<repo>/api/schemas`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLayout {
    repo_root: PathBuf,
}

impl SchemaLayout {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    pub fn schemas_dir(&self) -> PathBuf {
        self.repo_root.join("api").join("schemas")
    }

    pub fn meta_schema(&self) -> PathBuf {
        self.schemas_dir().join("metadata.schema.yml")
    }

    /// Override document for `module` in `environment`.
    pub fn environment_file(&self, module: EnvironmentModule, environment: &str) -> PathBuf {
        self.repo_root
            .join(module.as_str())
            .join("environments")
            .join(format!("{environment}.yaml"))
    }

    pub fn environment_schema(&self, module: EnvironmentModule) -> PathBuf {
        self.schemas_dir()
            .join("environments")
            .join(format!("{}.schema.yml", module.as_str()))
    }

    pub fn environment_check(&self, module: EnvironmentModule, environment: &str) -> SchemaCheck {
        SchemaCheck {
            schema: self.environment_schema(module),
            meta_schema: self.meta_schema(),
            schema_name: format!("{}_environment", module.as_str()),
            file: self.environment_file(module, environment),
        }
    }

    pub fn definitions_dir(&self, kind: DefinitionKind) -> PathBuf {
        self.repo_root
            .join("api")
            .join("definitions")
            .join(kind.dir_name())
    }

    pub fn definition_schema(&self, kind: DefinitionKind) -> PathBuf {
        self.schemas_dir()
            .join(format!("{}.schema.yml", kind.schema_stem()))
    }

    pub fn definition_check(&self, kind: DefinitionKind, file: &Path) -> SchemaCheck {
        SchemaCheck {
            schema: self.definition_schema(kind),
            meta_schema: self.meta_schema(),
            schema_name: format!("{}_schema", kind.dir_name()),
            file: file.to_path_buf(),
        }
    }
}

/// Shared definition catalogs under `api/definitions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Sizes,
    Roles,
    Vlans,
    Disks,
}

impl DefinitionKind {
    pub const ALL: [Self; 4] = [Self::Sizes, Self::Roles, Self::Vlans, Self::Disks];

    pub const fn dir_name(&self) -> &'static str {
        match self {
            Self::Sizes => "sizes",
            Self::Roles => "roles",
            Self::Vlans => "vlans",
            Self::Disks => "disks",
        }
    }

    const fn schema_stem(&self) -> &'static str {
        match self {
            Self::Sizes => "size",
            Self::Roles => "role",
            Self::Vlans => "vlan",
            Self::Disks => "disk",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_check_layout() {
        let layout = SchemaLayout::new("/repo");
        let check = layout.environment_check(EnvironmentModule::ContainerOrchestration, "dev");
        assert_eq!(
            check.schema,
            Path::new("/repo/api/schemas/environments/container-orchestration.schema.yml")
        );
        assert_eq!(check.meta_schema, Path::new("/repo/api/schemas/metadata.schema.yml"));
        assert_eq!(check.schema_name, "container-orchestration_environment");
        assert_eq!(
            check.file,
            Path::new("/repo/container-orchestration/environments/dev.yaml")
        );
    }

    #[test]
    fn definition_check_layout() {
        let layout = SchemaLayout::new("/repo");
        let file = Path::new("/repo/api/definitions/vlans/mgmt.yml");
        let check = layout.definition_check(DefinitionKind::Vlans, file);
        assert_eq!(check.schema, Path::new("/repo/api/schemas/vlan.schema.yml"));
        assert_eq!(check.schema_name, "vlans_schema");
        assert_eq!(
            layout.definitions_dir(DefinitionKind::Disks),
            Path::new("/repo/api/definitions/disks")
        );
    }
}
