//! Domain value objects: Platform, Orchestrator, EnvironmentModule.
//!
//! # Design
//!
//! Selections are closed variant types with one constructor per supported
//! value plus an explicit `Unsupported` case that keeps the raw text. Config
//! documents deserialize into them without failing, so an unknown value is
//! reported where it is dispatched on, with the offending value attached.
//!
//! They serialize back to the raw string, so templates and the generation
//! manifest see exactly what the master config said.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Platform ─────────────────────────────────────────────────────────────────

/// Infrastructure platform selected by `infrastructure.platform`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Proxmox,
    Aws,
    Gcp,
    Azure,
    Baremetal,
    /// No infrastructure layer; the cluster runs on pre-existing machines.
    None,
    Unsupported(String),
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Proxmox => "proxmox",
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
            Self::Baremetal => "baremetal",
            Self::None => "none",
            Self::Unsupported(raw) => raw,
        }
    }

    /// Whether an infrastructure artifact is produced for this platform.
    pub fn has_infrastructure(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Reject the `Unsupported` case.
    pub fn ensure_supported(&self) -> Result<&Self, DomainError> {
        match self {
            Self::Unsupported(raw) => Err(DomainError::unsupported_platform(raw.clone())),
            _ => Ok(self),
        }
    }
}

impl Default for Platform {
    /// A missing `platform` key reads as the empty string, which is not a
    /// supported value.
    fn default() -> Self {
        Self::Unsupported(String::new())
    }
}

impl From<String> for Platform {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "proxmox" => Self::Proxmox,
            "aws" => Self::Aws,
            "gcp" => Self::Gcp,
            "azure" => Self::Azure,
            "baremetal" => Self::Baremetal,
            "none" => Self::None,
            _ => Self::Unsupported(raw),
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Unsupported(raw) => raw,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let platform = Self::from(s.to_owned());
        platform.ensure_supported()?;
        Ok(platform)
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Container orchestrator selected by `container_orchestration.orchestrator`.
///
/// There is no "none" orchestrator: every generation run produces
/// orchestrator artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Orchestrator {
    Kubespray,
    Kubekey,
    Kind,
    Unsupported(String),
}

impl Orchestrator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Kubespray => "kubespray",
            Self::Kubekey => "kubekey",
            Self::Kind => "kind",
            Self::Unsupported(raw) => raw,
        }
    }

    /// Reject the `Unsupported` case.
    pub fn ensure_supported(&self) -> Result<&Self, DomainError> {
        match self {
            Self::Unsupported(raw) => Err(DomainError::unsupported_orchestrator(raw.clone())),
            _ => Ok(self),
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::Unsupported(String::new())
    }
}

impl From<String> for Orchestrator {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "kubespray" => Self::Kubespray,
            "kubekey" => Self::Kubekey,
            "kind" => Self::Kind,
            _ => Self::Unsupported(raw),
        }
    }
}

impl From<Orchestrator> for String {
    fn from(orchestrator: Orchestrator) -> Self {
        match orchestrator {
            Orchestrator::Unsupported(raw) => raw,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orchestrator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let orchestrator = Self::from(s.to_owned());
        orchestrator.ensure_supported()?;
        Ok(orchestrator)
    }
}

// ── EnvironmentModule ─────────────────────────────────────────────────────────

/// A repository module that may carry per-environment override documents
/// under `<module>/environments/<env>.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentModule {
    Infrastructure,
    ContainerOrchestration,
    Platform,
    Provisioner,
    Business,
}

impl EnvironmentModule {
    /// Every module, in the order environment validation visits them.
    pub const ALL: [Self; 5] = [
        Self::Infrastructure,
        Self::ContainerOrchestration,
        Self::Platform,
        Self::Provisioner,
        Self::Business,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::ContainerOrchestration => "container-orchestration",
            Self::Platform => "platform",
            Self::Provisioner => "provisioner",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for EnvironmentModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
