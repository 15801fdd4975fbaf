//! Template and output path resolution.
//!
//! Pure path construction from the master config selections. Nothing here
//! checks whether a template exists; the renderer finds out when it opens it.

use std::path::{Component, Path, PathBuf};

use crate::domain::entities::MasterConfig;
use crate::domain::error::DomainError;
use crate::domain::value_objects::Orchestrator;

pub const METADATA_FILE: &str = "metadata.json";
pub const KUBESPRAY_COMPAT_FILE: &str = "kubesprayConfig.json";

/// Maps selections to template sources and output locations under a
/// repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    repo_root: PathBuf,
}

impl PathResolver {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.repo_root.join("api").join("templates")
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.repo_root.join("api").join("outputs")
    }

    /// Template sources for the master config selections.
    pub fn resolve(&self, master: &MasterConfig) -> Result<TemplatePaths, DomainError> {
        let templates = self.templates_dir();
        let platform = &master.infrastructure.platform;

        let provider = &master.infrastructure.provider;
        if platform.has_infrastructure() && !provider.is_empty() {
            ensure_path_segment("infrastructure provider", provider)?;
        }
        let infrastructure = platform.has_infrastructure().then(|| {
            templates
                .join("infrastructure")
                .join(platform.as_str())
                .join(provider)
                .join("terraform.tfvars.tmpl")
        });

        let orchestration_dir = templates.join("container-orchestration");
        let orchestration = match &master.container_orchestration.orchestrator {
            Orchestrator::Kubespray => {
                let dir = orchestration_dir.join("kubespray");
                OrchestrationTemplates::Kubespray {
                    inventory: dir.join("inventory.ini.tmpl"),
                    group_vars_all: dir.join("group_vars").join("all.yaml.tmpl"),
                    group_vars_k8s_cluster: dir.join("group_vars").join("k8s_cluster.yaml.tmpl"),
                }
            }
            Orchestrator::Kubekey => OrchestrationTemplates::Single {
                config: orchestration_dir.join("kubekey").join("config.yaml.tmpl"),
            },
            Orchestrator::Kind => OrchestrationTemplates::Single {
                config: orchestration_dir.join("kind").join("config-simple.yaml.tmpl"),
            },
            Orchestrator::Unsupported(raw) => {
                return Err(DomainError::unsupported_orchestrator(raw.clone()));
            }
        };

        Ok(TemplatePaths {
            infrastructure,
            orchestration,
            provisioner: templates.join("provisioner").join("provisioner.json.tmpl"),
            platform: templates.join("platform").join("platform.yaml.tmpl"),
            business: templates.join("business").join("business.yaml.tmpl"),
        })
    }

    /// Output locations for `environment`.
    pub fn resolve_output_paths(
        &self,
        environment: &str,
        orchestrator: &Orchestrator,
    ) -> Result<OutputPaths, DomainError> {
        let output_dir = self.outputs_dir().join(ensure_path_segment("environment id", environment)?);

        let orchestration = match orchestrator {
            Orchestrator::Kubespray => {
                let directory = output_dir.join("kubespray");
                let group_vars_dir = directory.join("group_vars");
                OrchestrationOutputs::Kubespray {
                    inventory: directory.join("inventory.ini"),
                    group_vars_all: group_vars_dir.join("all.yaml"),
                    group_vars_k8s_cluster: group_vars_dir.join("k8s_cluster.yaml"),
                    group_vars_dir,
                    directory,
                }
            }
            Orchestrator::Kubekey | Orchestrator::Kind => {
                let directory = output_dir.join(orchestrator.as_str());
                OrchestrationOutputs::Single {
                    config: directory.join("config.yaml"),
                    directory,
                }
            }
            Orchestrator::Unsupported(raw) => {
                return Err(DomainError::unsupported_orchestrator(raw.clone()));
            }
        };

        Ok(OutputPaths {
            metadata: output_dir.join(METADATA_FILE),
            infrastructure: output_dir.join("terraform.tfvars"),
            provisioner: output_dir.join("provisioner.json"),
            platform: output_dir.join("platform.yaml"),
            business: output_dir.join("business.yaml"),
            kubespray_compat: output_dir.join(KUBESPRAY_COMPAT_FILE),
            orchestration,
            output_dir,
        })
    }
}

/// Accept `value` only if joining it onto a directory stays one level below
/// that directory: no separators, no `.` or `..`, not absolute.
pub fn ensure_path_segment<'a>(field: &'static str, value: &'a str) -> Result<&'a str, DomainError> {
    let mut components = Path::new(value).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single && !value.contains(['/', '\\']) {
        Ok(value)
    } else {
        Err(DomainError::InvalidPathSegment {
            field,
            value: value.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    /// `None` when the platform is `none`.
    pub infrastructure: Option<PathBuf>,
    pub orchestration: OrchestrationTemplates,
    pub provisioner: PathBuf,
    pub platform: PathBuf,
    pub business: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationTemplates {
    Kubespray {
        inventory: PathBuf,
        group_vars_all: PathBuf,
        group_vars_k8s_cluster: PathBuf,
    },
    /// kubekey and kind render one config file.
    Single { config: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub output_dir: PathBuf,
    pub metadata: PathBuf,
    pub infrastructure: PathBuf,
    pub orchestration: OrchestrationOutputs,
    pub provisioner: PathBuf,
    pub platform: PathBuf,
    pub business: PathBuf,
    pub kubespray_compat: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationOutputs {
    Kubespray {
        directory: PathBuf,
        inventory: PathBuf,
        group_vars_dir: PathBuf,
        group_vars_all: PathBuf,
        group_vars_k8s_cluster: PathBuf,
    },
    Single { directory: PathBuf, config: PathBuf },
}

impl OrchestrationOutputs {
    /// Directories that must exist before orchestrator artifacts are written.
    pub fn directories(&self) -> Vec<&Path> {
        match self {
            Self::Kubespray {
                directory,
                group_vars_dir,
                ..
            } => vec![directory.as_path(), group_vars_dir.as_path()],
            Self::Single { directory, .. } => vec![directory.as_path()],
        }
    }
}

/// Artifact kinds, named as they appear in the manifest `files` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Infrastructure,
    OrchestratorInventory,
    OrchestratorGroupVarsAll,
    OrchestratorGroupVarsK8sCluster,
    OrchestratorConfig,
    Provisioner,
    Platform,
    Business,
}

impl ArtifactKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::OrchestratorInventory => "orchestrator_inventory",
            Self::OrchestratorGroupVarsAll => "orchestrator_group_vars_all",
            Self::OrchestratorGroupVarsK8sCluster => "orchestrator_group_vars_k8s_cluster",
            Self::OrchestratorConfig => "orchestrator_config",
            Self::Provisioner => "provisioner",
            Self::Platform => "platform",
            Self::Business => "business",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One template to render and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub kind: ArtifactKind,
    pub template: PathBuf,
    pub output: PathBuf,
}

/// Ordered render jobs: infrastructure (if any), orchestrator artifacts,
/// provisioner, platform, business.
pub fn render_plan(
    templates: &TemplatePaths,
    outputs: &OutputPaths,
) -> Result<Vec<RenderJob>, DomainError> {
    let job = |kind, template: &PathBuf, output: &PathBuf| RenderJob {
        kind,
        template: template.clone(),
        output: output.clone(),
    };

    let mut jobs = Vec::with_capacity(7);
    if let Some(template) = &templates.infrastructure {
        jobs.push(job(ArtifactKind::Infrastructure, template, &outputs.infrastructure));
    }

    match (&templates.orchestration, &outputs.orchestration) {
        (
            OrchestrationTemplates::Kubespray {
                inventory,
                group_vars_all,
                group_vars_k8s_cluster,
            },
            OrchestrationOutputs::Kubespray {
                inventory: inventory_out,
                group_vars_all: all_out,
                group_vars_k8s_cluster: k8s_out,
                ..
            },
        ) => {
            jobs.push(job(ArtifactKind::OrchestratorInventory, inventory, inventory_out));
            jobs.push(job(ArtifactKind::OrchestratorGroupVarsAll, group_vars_all, all_out));
            jobs.push(job(
                ArtifactKind::OrchestratorGroupVarsK8sCluster,
                group_vars_k8s_cluster,
                k8s_out,
            ));
        }
        (
            OrchestrationTemplates::Single { config },
            OrchestrationOutputs::Single {
                config: config_out, ..
            },
        ) => jobs.push(job(ArtifactKind::OrchestratorConfig, config, config_out)),
        _ => {
            return Err(DomainError::SelectionMismatch {
                axis: "orchestrator",
                selected: "template layout".into(),
                provided: "output layout".into(),
            });
        }
    }

    jobs.push(job(ArtifactKind::Provisioner, &templates.provisioner, &outputs.provisioner));
    jobs.push(job(ArtifactKind::Platform, &templates.platform, &outputs.platform));
    jobs.push(job(ArtifactKind::Business, &templates.business, &outputs.business));
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Platform;

    fn master(platform: Platform, orchestrator: Orchestrator) -> MasterConfig {
        let mut master = MasterConfig::default();
        master.infrastructure.platform = platform;
        master.infrastructure.provider = "terraform".into();
        master.container_orchestration.orchestrator = orchestrator;
        master
    }

    #[test]
    fn infrastructure_template_present_unless_platform_none() {
        let resolver = PathResolver::new("/repo");
        for platform in [Platform::Proxmox, Platform::Aws, Platform::Gcp, Platform::Azure] {
            let paths = resolver
                .resolve(&master(platform.clone(), Orchestrator::Kind))
                .unwrap();
            assert_eq!(
                paths.infrastructure,
                Some(PathBuf::from(format!(
                    "/repo/api/templates/infrastructure/{platform}/terraform/terraform.tfvars.tmpl"
                )))
            );
        }
        let paths = resolver
            .resolve(&master(Platform::None, Orchestrator::Kind))
            .unwrap();
        assert_eq!(paths.infrastructure, None);
    }

    #[test]
    fn kubespray_resolves_three_templates() {
        let resolver = PathResolver::new("/repo");
        let paths = resolver
            .resolve(&master(Platform::Proxmox, Orchestrator::Kubespray))
            .unwrap();
        let base = Path::new("/repo/api/templates/container-orchestration/kubespray");
        assert_eq!(
            paths.orchestration,
            OrchestrationTemplates::Kubespray {
                inventory: base.join("inventory.ini.tmpl"),
                group_vars_all: base.join("group_vars/all.yaml.tmpl"),
                group_vars_k8s_cluster: base.join("group_vars/k8s_cluster.yaml.tmpl"),
            }
        );
    }

    #[test]
    fn kind_uses_simple_config_template() {
        let resolver = PathResolver::new("/repo");
        let paths = resolver
            .resolve(&master(Platform::None, Orchestrator::Kind))
            .unwrap();
        assert_eq!(
            paths.orchestration,
            OrchestrationTemplates::Single {
                config: PathBuf::from(
                    "/repo/api/templates/container-orchestration/kind/config-simple.yaml.tmpl"
                ),
            }
        );
    }

    #[test]
    fn unsupported_orchestrator_fails_resolution() {
        let resolver = PathResolver::new("/repo");
        let swarm = Orchestrator::from("swarm".to_owned());
        assert_eq!(
            resolver.resolve(&master(Platform::Aws, swarm.clone())),
            Err(DomainError::unsupported_orchestrator("swarm"))
        );
        assert!(resolver.resolve_output_paths("dev", &swarm).is_err());
    }

    #[test]
    fn outputs_rooted_at_environment_dir() {
        let resolver = PathResolver::new("/repo");
        let outputs = resolver
            .resolve_output_paths("development", &Orchestrator::Kubekey)
            .unwrap();
        assert_eq!(outputs.output_dir, Path::new("/repo/api/outputs/development"));
        assert_eq!(
            outputs.metadata,
            Path::new("/repo/api/outputs/development/metadata.json")
        );
        assert_eq!(
            outputs.orchestration,
            OrchestrationOutputs::Single {
                directory: PathBuf::from("/repo/api/outputs/development/kubekey"),
                config: PathBuf::from("/repo/api/outputs/development/kubekey/config.yaml"),
            }
        );
    }

    #[test]
    fn environment_id_must_stay_under_outputs() {
        let resolver = PathResolver::new("/repo");
        for bad in ["/tmp/escaped", "../shared", "team/dev", "dev/", ".", "..", "a\\b"] {
            assert_eq!(
                resolver.resolve_output_paths(bad, &Orchestrator::Kind),
                Err(DomainError::InvalidPathSegment {
                    field: "environment id",
                    value: bad.into(),
                }),
                "{bad}"
            );
        }
        assert!(resolver.resolve_output_paths("dev.eu-1", &Orchestrator::Kind).is_ok());
    }

    #[test]
    fn provider_must_be_a_single_segment() {
        let resolver = PathResolver::new("/repo");
        let mut m = master(Platform::Aws, Orchestrator::Kind);
        m.infrastructure.provider = "/etc".into();
        assert!(matches!(
            resolver.resolve(&m),
            Err(DomainError::InvalidPathSegment { field: "infrastructure provider", .. })
        ));

        // platform none never touches the provider
        let mut m = master(Platform::None, Orchestrator::Kind);
        m.infrastructure.provider = "../x".into();
        assert!(resolver.resolve(&m).is_ok());
    }

    #[test]
    fn render_plan_orders_jobs_and_skips_infrastructure_for_none() {
        let resolver = PathResolver::new("/repo");
        let m = master(Platform::None, Orchestrator::Kubespray);
        let templates = resolver.resolve(&m).unwrap();
        let outputs = resolver
            .resolve_output_paths("dev", &Orchestrator::Kubespray)
            .unwrap();
        let kinds: Vec<_> = render_plan(&templates, &outputs)
            .unwrap()
            .into_iter()
            .map(|job| job.kind)
            .collect();
        assert_eq!(
            kinds,
            [
                ArtifactKind::OrchestratorInventory,
                ArtifactKind::OrchestratorGroupVarsAll,
                ArtifactKind::OrchestratorGroupVarsK8sCluster,
                ArtifactKind::Provisioner,
                ArtifactKind::Platform,
                ArtifactKind::Business,
            ]
        );
    }

    #[test]
    fn render_plan_rejects_mismatched_layouts() {
        let resolver = PathResolver::new("/repo");
        let templates = resolver
            .resolve(&master(Platform::Aws, Orchestrator::Kind))
            .unwrap();
        let outputs = resolver
            .resolve_output_paths("dev", &Orchestrator::Kubespray)
            .unwrap();
        assert!(render_plan(&templates, &outputs).is_err());
    }
}
