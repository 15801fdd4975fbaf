//! Platform-service stacks (`platform/stacks.yaml`) and business applications
//! (`business/apps.yaml`). Both are loaded regardless of platform and
//! orchestrator choice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::Document;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformStacks {
    /// Keyed by stack name; ordered so rendered output is stable.
    pub stacks: BTreeMap<String, StackConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub enabled: bool,
    pub sync_wave: i32,
    pub components: Vec<String>,
    pub provider: String,
    #[serde(rename = "defaultStorageClass")]
    pub default_storage_class: String,
    pub controller: String,
    pub backend: String,
    pub retention: BTreeMap<String, String>,
    pub storage: BTreeMap<String, String>,
    pub schedule: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessApps {
    pub applications: Vec<Application>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub name: String,
    pub enabled: bool,
    pub namespace: String,
    pub sync_wave: i32,
    pub source: ApplicationSource,
    pub sync_policy: Option<ApplicationSyncPolicy>,
    pub values: Document,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub path: String,
    pub target_revision: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSyncPolicy {
    pub automated: ApplicationSyncAutomated,
    pub sync_options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSyncAutomated {
    pub prune: bool,
    pub self_heal: bool,
}
