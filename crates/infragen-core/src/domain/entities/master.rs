//! Master config: the root selection record (`config.yaml`).

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Orchestrator, Platform};

/// Root document of a config package. Its selections gate every other load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterConfig {
    pub version: String,
    pub infrastructure: InfrastructureChoice,
    pub container_orchestration: ContainerOrchestrationChoice,
    pub platform: PlatformDeployment,
    pub business: BusinessDeployment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureChoice {
    /// proxmox, aws, gcp, azure, baremetal, none
    pub platform: Platform,
    /// terraform, pulumi, ansible
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOrchestrationChoice {
    /// kubespray, kubekey, kind
    pub orchestrator: Orchestrator,
    /// docker, podman, native
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformDeployment {
    /// helm, kustomize, argocd
    pub deployment_method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessDeployment {
    pub deployment_method: String,
}
