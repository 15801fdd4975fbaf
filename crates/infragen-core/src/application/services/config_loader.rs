//! Config loader - reads every source document of a package and hands them
//! to the pure merge.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::ConfigSource},
    domain::{
        Document, EnvironmentModule, LoadedSources, MergedConfig, Orchestrator,
        OrchestratorSettings, Platform, PlatformSettings, SourceDocument,
        entities::{
            AwsDocument, AzureDocument, BusinessApps, GcpDocument, HostsConfig,
            KubesprayDocument, MasterConfig, NetworksConfig, PackageManifest, PlatformStacks,
            ProxmoxDocument,
        },
        decode, merge,
    },
    error::InfragenResult,
};

/// Loads a config package plus environment overrides from a repository.
pub struct ConfigLoader {
    source: Box<dyn ConfigSource>,
    repo_root: PathBuf,
}

impl ConfigLoader {
    pub fn new(source: Box<dyn ConfigSource>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            repo_root: repo_root.into(),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Load every source in order and merge them.
    #[instrument(skip(self))]
    pub fn load_and_merge(
        &self,
        config_package: &str,
        environment: &str,
    ) -> InfragenResult<MergedConfig> {
        let sources = self.load_sources(config_package, environment)?;
        let merged = merge(config_package, environment, sources)?;
        info!(
            platform = %merged.infrastructure.platform,
            orchestrator = %merged.container_orchestration.orchestrator,
            hosts = merged.hosts.len(),
            "configuration merged"
        );
        Ok(merged)
    }

    /// Read and decode every document the master config selections call for.
    ///
    /// Order matters: the master config decides which platform and
    /// orchestrator documents are read at all.
    pub fn load_sources(
        &self,
        config_package: &str,
        environment: &str,
    ) -> InfragenResult<LoadedSources> {
        let ctx = (config_package, environment);

        let master: MasterConfig = self.decode(&SourceDocument::Master, ctx)?;
        let hosts: HostsConfig = self.decode(&SourceDocument::Hosts, ctx)?;
        let networks: NetworksConfig = self.decode(&SourceDocument::Networks, ctx)?;

        let platform = self.load_platform(&master.infrastructure.platform, ctx)?;
        let orchestrator =
            self.load_orchestrator(&master.container_orchestration.orchestrator, ctx)?;

        let stacks: PlatformStacks = self.decode(&SourceDocument::Stacks, ctx)?;
        let business: BusinessApps = self.decode(&SourceDocument::BusinessApps, ctx)?;

        let infrastructure_env = self.load_override(EnvironmentModule::Infrastructure, ctx)?;
        let orchestration_env =
            self.load_override(EnvironmentModule::ContainerOrchestration, ctx)?;

        Ok(LoadedSources {
            master,
            hosts,
            networks,
            platform,
            orchestrator,
            stacks,
            business,
            infrastructure_env,
            orchestration_env,
        })
    }

    /// The optional `package.json` of a config package.
    pub fn load_package_manifest(
        &self,
        config_package: &str,
    ) -> InfragenResult<Option<PackageManifest>> {
        let path = self.path_of(&SourceDocument::PackageManifest, (config_package, ""));
        match self.source.read_optional_document(&path)? {
            Some(value) => Ok(Some(decode_value(&path, value)?)),
            None => {
                debug!(path = %path.display(), "no package manifest");
                Ok(None)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn load_platform(
        &self,
        platform: &Platform,
        ctx: (&str, &str),
    ) -> InfragenResult<Option<PlatformSettings>> {
        let Some(doc) = SourceDocument::for_platform(platform)? else {
            debug!("platform is none; no platform settings loaded");
            return Ok(None);
        };
        let settings = match platform {
            Platform::Proxmox => {
                PlatformSettings::Proxmox(self.decode::<ProxmoxDocument>(&doc, ctx)?.proxmox)
            }
            Platform::Aws => PlatformSettings::Aws(self.decode::<AwsDocument>(&doc, ctx)?.aws),
            Platform::Gcp => PlatformSettings::Gcp(self.decode::<GcpDocument>(&doc, ctx)?.gcp),
            Platform::Azure => {
                PlatformSettings::Azure(self.decode::<AzureDocument>(&doc, ctx)?.azure)
            }
            // for_platform only hands out documents for the four above
            Platform::Baremetal | Platform::None | Platform::Unsupported(_) => {
                return Ok(None);
            }
        };
        Ok(Some(settings))
    }

    fn load_orchestrator(
        &self,
        orchestrator: &Orchestrator,
        ctx: (&str, &str),
    ) -> InfragenResult<OrchestratorSettings> {
        let doc = SourceDocument::for_orchestrator(orchestrator)?;
        Ok(match orchestrator {
            Orchestrator::Kubespray => OrchestratorSettings::Kubespray(
                self.decode::<KubesprayDocument>(&doc, ctx)?.kubespray,
            ),
            Orchestrator::Kubekey => OrchestratorSettings::Kubekey(self.decode(&doc, ctx)?),
            Orchestrator::Kind => OrchestratorSettings::Kind(self.decode(&doc, ctx)?),
            Orchestrator::Unsupported(raw) => {
                return Err(crate::domain::DomainError::unsupported_orchestrator(raw.clone()).into());
            }
        })
    }

    /// Missing override files read as an empty document.
    fn load_override(
        &self,
        module: EnvironmentModule,
        ctx: (&str, &str),
    ) -> InfragenResult<Document> {
        let path = self.path_of(&SourceDocument::EnvironmentOverride(module), ctx);
        match self.source.read_optional_document(&path)? {
            Some(value) => decode_value(&path, value),
            None => {
                debug!(%module, path = %path.display(), "no environment overrides");
                Ok(Document::new())
            }
        }
    }

    fn decode<T: DeserializeOwned + Default>(
        &self,
        doc: &SourceDocument,
        ctx: (&str, &str),
    ) -> InfragenResult<T> {
        let path = self.path_of(doc, ctx);
        let value = self.source.read_document(&path).map_err(|e| match e {
            crate::error::InfragenError::Application(ApplicationError::SourceNotFound {
                path,
                ..
            }) => ApplicationError::SourceNotFound {
                what: doc.to_string(),
                path,
            }
            .into(),
            other => other,
        })?;
        decode_value(&path, value)
    }

    fn path_of(&self, doc: &SourceDocument, (package, env): (&str, &str)) -> PathBuf {
        self.repo_root.join(doc.relative_path(package, env))
    }
}

/// An empty document decodes to the type's default.
fn decode_value<T: DeserializeOwned + Default>(path: &Path, value: Value) -> InfragenResult<T> {
    if value.is_null() {
        return Ok(T::default());
    }
    decode::from_value(value).map_err(|e| {
        ApplicationError::ParseFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::error::InfragenError;
    use serde_json::json;
    use std::collections::HashMap;

    /// Documents keyed by path relative to `/repo`.
    struct FakeSource(HashMap<PathBuf, Value>);

    impl FakeSource {
        fn new(docs: &[(&str, Value)]) -> Self {
            Self(
                docs.iter()
                    .map(|(p, v)| (Path::new("/repo").join(p), v.clone()))
                    .collect(),
            )
        }
    }

    impl ConfigSource for FakeSource {
        fn read_document(&self, path: &Path) -> InfragenResult<Value> {
            self.0.get(path).cloned().ok_or_else(|| {
                ApplicationError::SourceNotFound {
                    what: "document".into(),
                    path: path.to_path_buf(),
                }
                .into()
            })
        }

        fn read_optional_document(&self, path: &Path) -> InfragenResult<Option<Value>> {
            Ok(self.0.get(path).cloned())
        }
    }

    fn base_docs(platform: &str, orchestrator: &str) -> Vec<(&'static str, Value)> {
        vec![
            (
                "config/packages/core/config.yaml",
                json!({
                    "infrastructure": {"platform": platform, "provider": "terraform"},
                    "container_orchestration": {"orchestrator": orchestrator, "provider": "native"}
                }),
            ),
            ("config/packages/core/hosts.yaml", json!({"hosts": [{"name": "n1"}]})),
            ("config/packages/core/networks.yaml", json!({"dns": {"domain": "lab"}})),
            ("config/packages/core/platform/stacks.yaml", json!({"stacks": {}})),
            ("config/packages/core/business/apps.yaml", Value::Null),
        ]
    }

    fn loader(docs: Vec<(&'static str, Value)>) -> ConfigLoader {
        ConfigLoader::new(Box::new(FakeSource::new(&docs)), "/repo")
    }

    #[test]
    fn platform_none_never_reads_platform_documents() {
        let mut docs = base_docs("none", "kind");
        docs.push(("config/packages/core/orchestrators/kind.yaml", json!({"kind": {"name": "k"}})));
        // garbage in an unrelated platform document must not matter
        docs.push(("config/packages/core/platforms/aws.yaml", json!("not a mapping")));

        let merged = loader(docs).load_and_merge("core", "dev").unwrap();
        assert!(merged.platform_settings().is_none());
        assert_eq!(merged.kind().unwrap()["name"], "k");
    }

    #[test]
    fn missing_override_files_are_empty() {
        let mut docs = base_docs("none", "kind");
        docs.push(("config/packages/core/orchestrators/kind.yaml", json!({})));

        let sources = loader(docs).load_sources("core", "dev").unwrap();
        assert!(sources.infrastructure_env.is_empty());
        assert!(sources.orchestration_env.is_empty());
    }

    #[test]
    fn missing_mandatory_document_names_it() {
        let docs = base_docs("aws", "kind");
        let err = loader(docs).load_and_merge("core", "dev").unwrap_err();
        match err {
            InfragenError::Application(ApplicationError::SourceNotFound { what, path }) => {
                assert_eq!(what, "aws config");
                assert_eq!(path, Path::new("/repo/config/packages/core/platforms/aws.yaml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unsupported_platform_is_a_selection_error() {
        for platform in ["openstack", "baremetal"] {
            let err = loader(base_docs(platform, "kind"))
                .load_and_merge("core", "dev")
                .unwrap_err();
            assert_eq!(
                err,
                InfragenError::Domain(DomainError::unsupported_platform(platform))
            );
        }
    }

    #[test]
    fn unsupported_orchestrator_is_a_selection_error() {
        let err = loader(base_docs("none", "swarm"))
            .load_and_merge("core", "dev")
            .unwrap_err();
        assert_eq!(
            err,
            InfragenError::Domain(DomainError::unsupported_orchestrator("swarm"))
        );
    }

    #[test]
    fn malformed_document_is_a_parse_failure() {
        let mut docs = base_docs("none", "kind");
        docs.push(("config/packages/core/orchestrators/kind.yaml", json!({})));
        docs.push(("infrastructure/environments/dev.yaml", json!(["not", "a", "map"])));

        let err = loader(docs).load_and_merge("core", "dev").unwrap_err();
        assert!(matches!(
            err,
            InfragenError::Application(ApplicationError::ParseFailure { .. })
        ));
    }

    #[test]
    fn numeric_scalars_load_into_string_settings() {
        let mut docs = base_docs("aws", "kubespray");
        docs.retain(|(path, _)| !path.ends_with("stacks.yaml"));
        docs.push((
            "config/packages/core/platform/stacks.yaml",
            json!({"stacks": {"logging": {"retention": {"days": 15}}}}),
        ));
        docs.push((
            "config/packages/core/platforms/aws.yaml",
            json!({"aws": {"region": "us-east-1", "tags": {"cost_center": 4120}}}),
        ));
        docs.push((
            "config/packages/core/orchestrators/kubespray.yaml",
            json!({"kubespray": {"etcd_quota_backend_bytes": 2147483648u64}}),
        ));

        let merged = loader(docs).load_and_merge("core", "dev").unwrap();
        assert_eq!(merged.stacks["logging"].retention["days"], "15");
        assert_eq!(merged.aws().unwrap().tags["cost_center"], "4120");
        assert_eq!(merged.kubespray().unwrap().etcd_quota_backend_bytes, "2147483648");
    }

    #[test]
    fn package_manifest_is_optional() {
        let docs = base_docs("none", "kind");
        assert_eq!(loader(docs).load_package_manifest("core").unwrap(), None);

        let mut docs = base_docs("none", "kind");
        docs.push(("config/packages/core/package.json", json!({"id": "core", "version": "v2.0.0"})));
        let manifest = loader(docs).load_package_manifest("core").unwrap().unwrap();
        assert_eq!(manifest.version, "v2.0.0");
    }
}
