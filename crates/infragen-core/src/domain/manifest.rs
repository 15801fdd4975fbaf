//! Generation manifest (`metadata.json`) and the kubespray compatibility
//! document (`kubesprayConfig.json`).
//!
//! Both serialize with keys in sorted order and are written as pretty JSON
//! with a two-space indent and a trailing newline.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{MergedConfig, SshConfig};
use crate::domain::error::DomainError;
use crate::domain::paths::{ArtifactKind, OrchestrationOutputs, OutputPaths, RenderJob};

pub const KUBESPRAY_IMAGE_REGISTRY: &str = "quay.io";
pub const KUBESPRAY_IMAGE_VERSION: &str = "v2.28.1";

/// Provenance record of one successful generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationManifest {
    pub config_package: PackageRef,
    pub environment: String,
    /// Artifact kind to absolute output path, for rendered artifacts only.
    pub files: BTreeMap<String, String>,
    #[serde(with = "rfc3339_seconds")]
    pub generated_at: DateTime<Utc>,
    pub master_config: SelectionSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    pub id: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub orchestrator: String,
    pub platform: String,
    pub provider: String,
}

impl GenerationManifest {
    pub fn new(
        config: &MergedConfig,
        package_version: impl Into<String>,
        files: BTreeMap<String, String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            config_package: PackageRef {
                id: config.config_package.clone(),
                version: package_version.into(),
            },
            environment: config.environment.clone(),
            files,
            generated_at,
            master_config: SelectionSummary {
                orchestrator: config.container_orchestration.orchestrator.to_string(),
                platform: config.infrastructure.platform.to_string(),
                provider: config.infrastructure.provider.clone(),
            },
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, DomainError> {
        to_pretty_json(self, "generation manifest")
    }
}

/// The manifest `files` map for the jobs that were rendered.
///
/// kubespray group vars are recorded once, as their directory.
pub fn manifest_files(rendered: &[RenderJob], outputs: &OutputPaths) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    for job in rendered {
        let (key, path) = match job.kind {
            ArtifactKind::OrchestratorGroupVarsAll
            | ArtifactKind::OrchestratorGroupVarsK8sCluster => match &outputs.orchestration {
                OrchestrationOutputs::Kubespray { group_vars_dir, .. } => {
                    ("orchestrator_group_vars", group_vars_dir.as_path())
                }
                OrchestrationOutputs::Single { .. } => continue,
            },
            kind => (kind.as_str(), job.output.as_path()),
        };
        files.insert(key.to_owned(), display(path));
    }
    files
}

/// Summary of image and SSH settings for tooling that predates the
/// kubespray templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubesprayCompat {
    pub image: CompatImage,
    pub ssh: CompatSsh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatImage {
    pub registry: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatSsh {
    pub key_path: String,
    pub port: u16,
    pub user: String,
}

impl KubesprayCompat {
    pub fn from_ssh(ssh: &SshConfig) -> Self {
        Self {
            image: CompatImage {
                registry: KUBESPRAY_IMAGE_REGISTRY.into(),
                version: KUBESPRAY_IMAGE_VERSION.into(),
            },
            ssh: CompatSsh {
                key_path: ssh.key_path.clone(),
                port: ssh.port,
                user: ssh.user.clone(),
            },
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, DomainError> {
        to_pretty_json(self, "kubespray compatibility config")
    }
}

fn to_pretty_json<T: Serialize>(value: &T, what: &'static str) -> Result<String, DomainError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| DomainError::Serialization {
        what,
        reason: e.to_string(),
    })?;
    json.push('\n');
    Ok(json)
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

mod rfc3339_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
