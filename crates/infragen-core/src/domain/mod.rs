// ============================================================================
//  PURE DECISION LAYER
// ============================================================================

//! Core domain layer for infragen.
//!
//! Everything here is a pure function of its inputs: selections, the config
//! data model, override extraction, merge, path resolution and the
//! generation manifest. Reading and writing files is left to the ports
//! defined in the application layer.
//!
//! - **No I/O**: documents arrive already decoded
//! - **Closed selections**: platform and orchestrator are variant types
//! - **Pure merges**: base + override in, merged value out
pub mod decode;
pub mod entities;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod overrides;
pub mod paths;
pub mod sources;
pub mod validation;
pub mod value_objects;

pub use entities::{
    Document, MasterConfig, MergedConfig, OrchestratorSettings, PlatformSettings, RenderContext,
};
pub use error::{DomainError, ErrorCategory};
pub use manifest::{GenerationManifest, KubesprayCompat, manifest_files};
pub use merge::{LoadedSources, merge};
pub use overrides::{InfrastructureOverrides, OrchestrationOverrides};
pub use paths::{
    ArtifactKind, OrchestrationOutputs, OrchestrationTemplates, OutputPaths, PathResolver,
    RenderJob, TemplatePaths, ensure_path_segment, render_plan,
};
pub use sources::SourceDocument;
pub use validation::{DefinitionKind, SchemaCheck, SchemaLayout};
pub use value_objects::{EnvironmentModule, Orchestrator, Platform};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use entities::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be a mapping"),
        }
    }

    fn master(platform: Platform, orchestrator: Orchestrator) -> MasterConfig {
        let mut master = MasterConfig::default();
        master.infrastructure.platform = platform;
        master.infrastructure.provider = "terraform".into();
        master.container_orchestration.orchestrator = orchestrator;
        master
    }

    fn sources(
        platform: Option<PlatformSettings>,
        orchestrator: OrchestratorSettings,
    ) -> LoadedSources {
        let selected_platform = platform
            .as_ref()
            .map(PlatformSettings::platform)
            .unwrap_or(Platform::None);
        LoadedSources {
            master: master(selected_platform, orchestrator.orchestrator()),
            hosts: HostsConfig {
                hosts: vec![Host {
                    name: "cp-1".into(),
                    role: "control-plane".into(),
                    ip: "10.0.0.10".into(),
                    ..Host::default()
                }],
            },
            networks: NetworksConfig {
                dns: DnsConfig {
                    domain: "lab.local".into(),
                    search_domains: vec!["lab.local".into()],
                },
                ..NetworksConfig::default()
            },
            platform,
            orchestrator,
            stacks: PlatformStacks::default(),
            business: BusinessApps::default(),
            infrastructure_env: Document::new(),
            orchestration_env: Document::new(),
        }
    }

    fn aws(region: &str) -> PlatformSettings {
        PlatformSettings::Aws(AwsSettings {
            region: region.into(),
            ..AwsSettings::default()
        })
    }

    fn kubespray() -> OrchestratorSettings {
        OrchestratorSettings::Kubespray(KubespraySettings {
            kube_version: "v1.29.5".into(),
            ..KubespraySettings::default()
        })
    }

    // ========================================================================
    // Merge Tests
    // ========================================================================

    #[test]
    fn merge_copies_inventory_and_selections() {
        let merged = merge("core", "development", sources(Some(aws("us-east-1")), kubespray())).unwrap();

        assert_eq!(merged.config_package, "core");
        assert_eq!(merged.environment, "development");
        assert_eq!(merged.hosts.len(), 1);
        assert_eq!(merged.dns.domain, "lab.local");
        assert_eq!(merged.networks.dns, merged.dns);
        assert_eq!(merged.infrastructure, merged.master_config.infrastructure);
        assert_eq!(merged.infrastructure.platform, Platform::Aws);
    }

    #[test]
    fn aws_region_override_wins() {
        let mut loaded = sources(Some(aws("us-east-1")), kubespray());
        loaded.infrastructure_env = doc(json!({"aws": {"region": "eu-west-1"}}));

        let merged = merge("core", "dev", loaded).unwrap();
        assert_eq!(merged.aws().unwrap().region, "eu-west-1");
    }

    #[test]
    fn empty_region_override_keeps_base() {
        let mut loaded = sources(Some(aws("us-east-1")), kubespray());
        loaded.infrastructure_env = doc(json!({"aws": {"region": ""}}));

        let merged = merge("core", "dev", loaded).unwrap();
        assert_eq!(merged.aws().unwrap().region, "us-east-1");
    }

    #[test]
    fn overrides_for_inactive_platforms_are_ignored() {
        let gcp = PlatformSettings::Gcp(GcpSettings {
            region: "europe-west1".into(),
            ..GcpSettings::default()
        });
        let mut loaded = sources(Some(gcp), kubespray());
        loaded.infrastructure_env = doc(json!({
            "aws": {"region": "eu-west-1"},
            "azure": {"location": "westeurope"},
            "gcp": {"zone": "ignored"}
        }));

        let merged = merge("core", "dev", loaded).unwrap();
        assert_eq!(merged.gcp().unwrap().region, "europe-west1");
        assert!(merged.aws().is_none());
        assert!(merged.azure().is_none());
    }

    #[test]
    fn azure_location_override() {
        let azure = PlatformSettings::Azure(AzureSettings {
            location: "eastus".into(),
            ..AzureSettings::default()
        });
        let mut loaded = sources(Some(azure), kubespray());
        loaded.infrastructure_env = doc(json!({"azure": {"location": "westeurope"}}));

        let merged = merge("core", "dev", loaded).unwrap();
        assert_eq!(merged.azure().unwrap().location, "westeurope");
    }

    #[test]
    fn proxmox_endpoint_override_changes_nothing() {
        let base = ProxmoxSettings {
            node_name: "pve-01".into(),
            ..ProxmoxSettings::default()
        };
        let mut loaded = sources(Some(PlatformSettings::Proxmox(base.clone())), kubespray());
        loaded.infrastructure_env = doc(json!({"proxmox": {"endpoint": "https://pve:8006"}}));

        let merged = merge("core", "dev", loaded).unwrap();
        assert_eq!(merged.proxmox(), Some(&base));
    }

    #[test]
    fn ssh_zero_valued_without_block_defaulted_with_block() {
        let merged = merge("core", "dev", sources(None, kubespray())).unwrap();
        assert_eq!(merged.ssh, SshConfig::default());
        assert_eq!(merged.ssh.port, 0);

        let mut loaded = sources(None, kubespray());
        loaded.infrastructure_env = doc(json!({"ssh": {}}));
        let merged = merge("core", "dev", loaded).unwrap();
        assert_eq!(merged.ssh.user, "ansible");
        assert_eq!(merged.ssh.port, 22);
        assert_eq!(merged.ssh.key_path, "");
    }

    #[test]
    fn platform_none_leaves_every_platform_empty() {
        let merged = merge("core", "dev", sources(None, kubespray())).unwrap();
        assert!(merged.platform_settings().is_none());

        let value = serde_json::to_value(&merged).unwrap();
        for key in ["proxmox", "aws", "gcp", "azure"] {
            assert_eq!(value[key], Value::Null, "{key}");
        }
    }

    #[test]
    fn exactly_one_orchestrator_section_serialized() {
        let merged = merge("core", "dev", sources(None, kubespray())).unwrap();
        let value = serde_json::to_value(&merged).unwrap();
        assert_eq!(value["kubespray"]["kube_version"], "v1.29.5");
        assert_eq!(value["kind"], Value::Null);
        assert_eq!(value["kubekey"], Value::Null);
    }

    #[test]
    fn cluster_overrides_only_for_kubespray() {
        let mut loaded = sources(None, kubespray());
        loaded.orchestration_env = doc(json!({"cluster_overrides": {"kube_proxy_mode": "ipvs"}}));
        let merged = merge("core", "dev", loaded).unwrap();
        assert_eq!(
            merged.cluster_overrides,
            Some(doc(json!({"kube_proxy_mode": "ipvs"})))
        );

        let mut loaded = sources(None, OrchestratorSettings::Kind(Document::new()));
        loaded.orchestration_env = doc(json!({"cluster_overrides": {"kube_proxy_mode": "ipvs"}}));
        let merged = merge("core", "dev", loaded).unwrap();
        assert_eq!(merged.cluster_overrides, None);
    }

    #[test]
    fn kind_sub_document_is_lifted() {
        let loaded_doc = doc(json!({
            "kind": {"name": "dev-cluster", "nodes": [{"role": "control-plane"}]},
            "unrelated": true
        }));
        let merged = merge(
            "core",
            "dev",
            sources(None, OrchestratorSettings::Kind(loaded_doc)),
        )
        .unwrap();
        assert_eq!(
            merged.kind(),
            Some(&doc(json!({"name": "dev-cluster", "nodes": [{"role": "control-plane"}]})))
        );
    }

    #[test]
    fn missing_kubekey_sub_document_is_empty() {
        let merged = merge(
            "core",
            "dev",
            sources(None, OrchestratorSettings::Kubekey(doc(json!({"other": 1})))),
        )
        .unwrap();
        assert_eq!(merged.kubekey(), Some(&Document::new()));
    }

    #[test]
    fn mismatched_platform_settings_rejected() {
        let mut loaded = sources(Some(aws("us-east-1")), kubespray());
        loaded.master.infrastructure.platform = Platform::Gcp;

        let err = merge("core", "dev", loaded).unwrap_err();
        assert!(matches!(err, DomainError::SelectionMismatch { axis: "platform", .. }));
    }

    #[test]
    fn unsupported_orchestrator_rejected_by_merge() {
        let mut loaded = sources(None, kubespray());
        loaded.master.container_orchestration.orchestrator = Orchestrator::from("swarm".to_owned());

        assert_eq!(
            merge("core", "dev", loaded).unwrap_err(),
            DomainError::unsupported_orchestrator("swarm")
        );
    }

    // ========================================================================
    // Render Context Tests
    // ========================================================================

    #[test]
    fn render_context_uses_snake_case_keys() {
        let merged = merge("core", "dev", sources(Some(aws("us-east-1")), kubespray())).unwrap();
        let ctx = RenderContext::from_serialize(&merged).unwrap();
        let value = ctx.as_value();

        assert_eq!(value["config_package"], "core");
        assert_eq!(value["infrastructure"]["platform"], "aws");
        assert_eq!(value["container_orchestration"]["orchestrator"], "kubespray");
        assert_eq!(value["aws"]["region"], "us-east-1");
        assert_eq!(value["hosts"][0]["name"], "cp-1");
    }
}
