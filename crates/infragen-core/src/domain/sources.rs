//! Fixed locations of every configuration source document.

use std::fmt;
use std::path::PathBuf;

use crate::domain::error::DomainError;
use crate::domain::value_objects::{EnvironmentModule, Orchestrator, Platform};

/// One document of a config package or environment, addressable by its
/// fixed path relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDocument {
    Master,
    Hosts,
    Networks,
    Platform(Platform),
    Orchestrator(Orchestrator),
    Stacks,
    BusinessApps,
    PackageManifest,
    EnvironmentOverride(EnvironmentModule),
}

impl SourceDocument {
    /// Settings document for `platform`.
    ///
    /// `Ok(None)` when the platform has no infrastructure layer. Only
    /// proxmox, aws, gcp and azure ship a settings document, so anything
    /// else is unsupported here.
    pub fn for_platform(platform: &Platform) -> Result<Option<Self>, DomainError> {
        match platform {
            Platform::None => Ok(None),
            Platform::Proxmox | Platform::Aws | Platform::Gcp | Platform::Azure => {
                Ok(Some(Self::Platform(platform.clone())))
            }
            Platform::Baremetal | Platform::Unsupported(_) => {
                Err(DomainError::unsupported_platform(platform.as_str()))
            }
        }
    }

    pub fn for_orchestrator(orchestrator: &Orchestrator) -> Result<Self, DomainError> {
        orchestrator.ensure_supported()?;
        Ok(Self::Orchestrator(orchestrator.clone()))
    }

    /// Path relative to the repository root.
    pub fn relative_path(&self, config_package: &str, environment: &str) -> PathBuf {
        let package = PathBuf::from("config").join("packages").join(config_package);
        match self {
            Self::Master => package.join("config.yaml"),
            Self::Hosts => package.join("hosts.yaml"),
            Self::Networks => package.join("networks.yaml"),
            Self::Platform(p) => package.join("platforms").join(format!("{p}.yaml")),
            Self::Orchestrator(o) => package.join("orchestrators").join(format!("{o}.yaml")),
            Self::Stacks => package.join("platform").join("stacks.yaml"),
            Self::BusinessApps => package.join("business").join("apps.yaml"),
            Self::PackageManifest => package.join("package.json"),
            Self::EnvironmentOverride(module) => PathBuf::from(module.as_str())
                .join("environments")
                .join(format!("{environment}.yaml")),
        }
    }
}

impl fmt::Display for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master => f.write_str("master config"),
            Self::Hosts => f.write_str("hosts config"),
            Self::Networks => f.write_str("networks config"),
            Self::Platform(p) => write!(f, "{p} config"),
            Self::Orchestrator(o) => write!(f, "{o} config"),
            Self::Stacks => f.write_str("platform stacks"),
            Self::BusinessApps => f.write_str("business apps"),
            Self::PackageManifest => f.write_str("package manifest"),
            Self::EnvironmentOverride(m) => write!(f, "{m} environment overrides"),
        }
    }
}
