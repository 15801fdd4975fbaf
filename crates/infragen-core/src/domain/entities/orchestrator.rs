//! Orchestrator-specific settings (`orchestrators/<orchestrator>.yaml`).

use serde::{Deserialize, Serialize};

use crate::domain::entities::Document;
use crate::domain::value_objects::Orchestrator;

/// Settings for the active orchestrator.
///
/// kubespray has a typed schema; kubekey and kind are kept as the loosely
/// typed document they were loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorSettings {
    Kubespray(KubespraySettings),
    Kubekey(Document),
    Kind(Document),
}

impl OrchestratorSettings {
    pub fn orchestrator(&self) -> Orchestrator {
        match self {
            Self::Kubespray(_) => Orchestrator::Kubespray,
            Self::Kubekey(_) => Orchestrator::Kubekey,
            Self::Kind(_) => Orchestrator::Kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubesprayDocument {
    pub kubespray: KubespraySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubespraySettings {
    pub kube_version: String,
    pub cluster_name: String,
    pub kube_dns_domain: String,
    pub kube_network_plugin: String,
    pub kube_service_addresses: String,
    pub kube_pods_subnet: String,
    pub dns_mode: String,
    pub enable_nodelocaldns: bool,
    pub nodelocaldns_ip: String,
    pub container_manager: String,
    pub kube_apiserver_port: u32,
    pub kube_proxy_mode: String,
    pub etcd_deployment_type: String,
    pub etcd_memory_limit: String,
    pub etcd_quota_backend_bytes: String,
    pub helm_enabled: bool,
    pub metrics_server_enabled: bool,
    pub ingress_nginx_enabled: bool,
    pub cert_manager_enabled: bool,
    pub dashboard_enabled: bool,
    pub local_path_provisioner_enabled: bool,
    pub metallb_enabled: bool,
    pub metallb_ip_range: String,
    pub download_container: bool,
    pub download_force_cache: bool,
    pub download_run_once: bool,
    pub upgrade_cluster_setup: bool,
    pub drain_nodes: bool,
    pub drain_grace_period: u32,
    pub drain_timeout: u32,
    pub kubelet_max_pods: u32,
    pub kube_read_only_port: u32,
    pub kube_feature_gates: Vec<String>,
    pub docker_insecure_registries: Vec<String>,
    pub docker_registry_mirrors: Vec<String>,
}
