//! The merged configuration: the single aggregate handed to every template.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::domain::entities::{
    Application, AwsSettings, AzureSettings, ContainerOrchestrationChoice, DnsConfig, Document,
    GcpSettings, Host, InfrastructureChoice, KubespraySettings, MasterConfig, NetworksConfig,
    NtpConfig, OrchestratorSettings, PlatformSettings, ProxmoxSettings, SshConfig, StackConfig,
};

/// Fully resolved, override-applied configuration for one environment.
///
/// Platform and orchestrator settings are held as single variants, so at
/// most one platform section and exactly one orchestrator section can ever
/// be populated. When serialized they are flattened back into one key per
/// platform/orchestrator, with the inactive ones set to `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig {
    pub config_package: String,
    pub environment: String,
    pub master_config: MasterConfig,
    pub hosts: Vec<Host>,
    pub networks: NetworksConfig,
    pub dns: DnsConfig,
    pub ntp: NtpConfig,
    pub ssh: SshConfig,
    pub infrastructure: InfrastructureChoice,
    pub container_orchestration: ContainerOrchestrationChoice,
    pub stacks: BTreeMap<String, StackConfig>,
    pub applications: Vec<Application>,
    /// kubespray `cluster_overrides` from the container-orchestration
    /// environment document, copied untyped.
    pub cluster_overrides: Option<Document>,
    pub(crate) platform_settings: Option<PlatformSettings>,
    pub(crate) orchestrator_settings: OrchestratorSettings,
}

impl MergedConfig {
    pub fn platform_settings(&self) -> Option<&PlatformSettings> {
        self.platform_settings.as_ref()
    }

    pub fn orchestrator_settings(&self) -> &OrchestratorSettings {
        &self.orchestrator_settings
    }

    pub fn proxmox(&self) -> Option<&ProxmoxSettings> {
        match &self.platform_settings {
            Some(PlatformSettings::Proxmox(s)) => Some(s),
            _ => None,
        }
    }

    pub fn aws(&self) -> Option<&AwsSettings> {
        match &self.platform_settings {
            Some(PlatformSettings::Aws(s)) => Some(s),
            _ => None,
        }
    }

    pub fn gcp(&self) -> Option<&GcpSettings> {
        match &self.platform_settings {
            Some(PlatformSettings::Gcp(s)) => Some(s),
            _ => None,
        }
    }

    pub fn azure(&self) -> Option<&AzureSettings> {
        match &self.platform_settings {
            Some(PlatformSettings::Azure(s)) => Some(s),
            _ => None,
        }
    }

    pub fn kubespray(&self) -> Option<&KubespraySettings> {
        match &self.orchestrator_settings {
            OrchestratorSettings::Kubespray(s) => Some(s),
            _ => None,
        }
    }

    /// The lifted `kind` sub-document, when kind is the active orchestrator.
    pub fn kind(&self) -> Option<&Document> {
        match &self.orchestrator_settings {
            OrchestratorSettings::Kind(doc) => Some(doc),
            _ => None,
        }
    }

    /// The lifted `kubekey` sub-document, when kubekey is the active orchestrator.
    pub fn kubekey(&self) -> Option<&Document> {
        match &self.orchestrator_settings {
            OrchestratorSettings::Kubekey(doc) => Some(doc),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct MergedConfigView<'a> {
    config_package: &'a str,
    environment: &'a str,
    master_config: &'a MasterConfig,
    hosts: &'a [Host],
    networks: &'a NetworksConfig,
    dns: &'a DnsConfig,
    ntp: &'a NtpConfig,
    ssh: &'a SshConfig,
    infrastructure: &'a InfrastructureChoice,
    container_orchestration: &'a ContainerOrchestrationChoice,
    proxmox: Option<&'a ProxmoxSettings>,
    aws: Option<&'a AwsSettings>,
    gcp: Option<&'a GcpSettings>,
    azure: Option<&'a AzureSettings>,
    kubespray: Option<&'a KubespraySettings>,
    kind: Option<&'a Document>,
    kubekey: Option<&'a Document>,
    stacks: &'a BTreeMap<String, StackConfig>,
    applications: &'a [Application],
    cluster_overrides: Option<&'a Document>,
}

impl Serialize for MergedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MergedConfigView {
            config_package: &self.config_package,
            environment: &self.environment,
            master_config: &self.master_config,
            hosts: &self.hosts,
            networks: &self.networks,
            dns: &self.dns,
            ntp: &self.ntp,
            ssh: &self.ssh,
            infrastructure: &self.infrastructure,
            container_orchestration: &self.container_orchestration,
            proxmox: self.proxmox(),
            aws: self.aws(),
            gcp: self.gcp(),
            azure: self.azure(),
            kubespray: self.kubespray(),
            kind: self.kind(),
            kubekey: self.kubekey(),
            stacks: &self.stacks,
            applications: &self.applications,
            cluster_overrides: self.cluster_overrides.as_ref(),
        }
        .serialize(serializer)
    }
}
