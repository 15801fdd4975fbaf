//! Pure merge of loaded source documents into a [`MergedConfig`].
//!
//! Nothing here touches the filesystem. Each `apply_*` function takes a base
//! value and an override and returns the merged value.

use serde_json::Value;
use tracing::debug;

use crate::domain::entities::{
    AwsSettings, AzureSettings, BusinessApps, Document, GcpSettings, HostsConfig, MasterConfig,
    MergedConfig, NetworksConfig, OrchestratorSettings, PlatformSettings, PlatformStacks,
    ProxmoxSettings, SshConfig,
};
use crate::domain::error::DomainError;
use crate::domain::overrides::{
    AzureOverride, InfrastructureOverrides, OrchestrationOverrides, ProxmoxOverride,
    RegionOverride, SshOverride,
};
use crate::domain::value_objects::{Orchestrator, Platform};

/// Every decoded source document for one (package, environment) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSources {
    pub master: MasterConfig,
    pub hosts: HostsConfig,
    pub networks: NetworksConfig,
    /// `None` only when the master config selects platform `none`.
    pub platform: Option<PlatformSettings>,
    /// For kubekey and kind this is the whole orchestrator document; the
    /// sub-document named after the orchestrator is lifted during merge.
    pub orchestrator: OrchestratorSettings,
    pub stacks: PlatformStacks,
    pub business: BusinessApps,
    pub infrastructure_env: Document,
    pub orchestration_env: Document,
}

/// Merge loaded sources for `environment` of `config_package`.
///
/// Fails if the loaded platform or orchestrator settings disagree with the
/// master config selections.
pub fn merge(
    config_package: &str,
    environment: &str,
    sources: LoadedSources,
) -> Result<MergedConfig, DomainError> {
    let LoadedSources {
        master,
        hosts,
        networks,
        platform,
        orchestrator,
        stacks,
        business,
        infrastructure_env,
        orchestration_env,
    } = sources;

    check_platform_selection(&master.infrastructure.platform, platform.as_ref())?;
    check_orchestrator_selection(&master.container_orchestration.orchestrator, &orchestrator)?;

    let infra_overrides = InfrastructureOverrides::from_document(&infrastructure_env);
    let orchestration_overrides = OrchestrationOverrides::from_document(&orchestration_env);

    let ssh = resolve_ssh(infra_overrides.ssh.clone());
    let platform_settings = platform.map(|settings| apply_platform_overrides(settings, &infra_overrides));
    let cluster_overrides = match orchestrator {
        OrchestratorSettings::Kubespray(_) => orchestration_overrides.cluster_overrides,
        _ => None,
    };
    let orchestrator_settings = lift_generic(orchestrator);

    Ok(MergedConfig {
        config_package: config_package.to_owned(),
        environment: environment.to_owned(),
        infrastructure: master.infrastructure.clone(),
        container_orchestration: master.container_orchestration.clone(),
        master_config: master,
        hosts: hosts.hosts,
        dns: networks.dns.clone(),
        ntp: networks.ntp.clone(),
        networks,
        ssh,
        stacks: stacks.stacks,
        applications: business.applications,
        cluster_overrides,
        platform_settings,
        orchestrator_settings,
    })
}

/// SSH settings from the infrastructure override.
///
/// A present `ssh` block has its missing fields defaulted. An absent block
/// leaves SSH zero-valued so templates can tell the two apart.
pub fn resolve_ssh(ssh: Option<SshOverride>) -> SshConfig {
    match ssh {
        Some(block) => block.into_config(),
        None => SshConfig::default(),
    }
}

/// Apply the override section for the active platform only.
pub fn apply_platform_overrides(
    settings: PlatformSettings,
    overrides: &InfrastructureOverrides,
) -> PlatformSettings {
    match settings {
        PlatformSettings::Proxmox(s) => PlatformSettings::Proxmox(match &overrides.proxmox {
            Some(o) => apply_proxmox_overrides(s, o),
            None => s,
        }),
        PlatformSettings::Aws(s) => PlatformSettings::Aws(match &overrides.aws {
            Some(o) => apply_aws_overrides(s, o),
            None => s,
        }),
        PlatformSettings::Gcp(s) => PlatformSettings::Gcp(match &overrides.gcp {
            Some(o) => apply_gcp_overrides(s, o),
            None => s,
        }),
        PlatformSettings::Azure(s) => PlatformSettings::Azure(match &overrides.azure {
            Some(o) => apply_azure_overrides(s, o),
            None => s,
        }),
    }
}

/// The `endpoint` override is read but deliberately left unapplied.
pub fn apply_proxmox_overrides(base: ProxmoxSettings, overrides: &ProxmoxOverride) -> ProxmoxSettings {
    if let Some(endpoint) = &overrides.endpoint {
        debug!(%endpoint, "proxmox endpoint override has no target setting; ignored");
    }
    base
}

pub fn apply_aws_overrides(base: AwsSettings, overrides: &RegionOverride) -> AwsSettings {
    match &overrides.region {
        Some(region) => AwsSettings {
            region: region.clone(),
            ..base
        },
        None => base,
    }
}

pub fn apply_gcp_overrides(base: GcpSettings, overrides: &RegionOverride) -> GcpSettings {
    match &overrides.region {
        Some(region) => GcpSettings {
            region: region.clone(),
            ..base
        },
        None => base,
    }
}

pub fn apply_azure_overrides(base: AzureSettings, overrides: &AzureOverride) -> AzureSettings {
    match &overrides.location {
        Some(location) => AzureSettings {
            location: location.clone(),
            ..base
        },
        None => base,
    }
}

/// Replace a kubekey/kind document with its sub-document of the same name.
/// A missing or non-mapping sub-document yields an empty mapping.
pub fn lift_generic(settings: OrchestratorSettings) -> OrchestratorSettings {
    let lift = |mut doc: Document, key: &str| match doc.remove(key) {
        Some(Value::Object(inner)) => inner,
        _ => {
            debug!(key, "orchestrator document has no mapping under its own name");
            Document::new()
        }
    };
    match settings {
        OrchestratorSettings::Kubekey(doc) => OrchestratorSettings::Kubekey(lift(doc, "kubekey")),
        OrchestratorSettings::Kind(doc) => OrchestratorSettings::Kind(lift(doc, "kind")),
        kubespray => kubespray,
    }
}

fn check_platform_selection(
    selected: &Platform,
    loaded: Option<&PlatformSettings>,
) -> Result<(), DomainError> {
    selected.ensure_supported()?;
    let provided = loaded.map(PlatformSettings::platform).unwrap_or(Platform::None);
    if &provided != selected {
        return Err(DomainError::SelectionMismatch {
            axis: "platform",
            selected: selected.to_string(),
            provided: provided.to_string(),
        });
    }
    Ok(())
}

fn check_orchestrator_selection(
    selected: &Orchestrator,
    loaded: &OrchestratorSettings,
) -> Result<(), DomainError> {
    selected.ensure_supported()?;
    let provided = loaded.orchestrator();
    if &provided != selected {
        return Err(DomainError::SelectionMismatch {
            axis: "orchestrator",
            selected: selected.to_string(),
            provided: provided.to_string(),
        });
    }
    Ok(())
}
