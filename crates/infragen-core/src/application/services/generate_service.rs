//! Generate Service - the environment generation pipeline.
//!
//! Fixed step sequence, each failure aborting the rest:
//! 1. Load and merge configuration
//! 2. Validate environment overrides (unless skipped)
//! 3. Stop here in validate-only mode
//! 4. Resolve template paths
//! 5. Resolve output paths and create the output tree
//! 6. Render every template
//! 7. Write the kubespray compatibility document
//! 8. Write the generation manifest
//!
//! Artifacts written before a failing step stay on disk. The manifest is
//! written last, so its presence means the run completed.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::{
    application::{
        events::GenerationEvent,
        ports::{ConfigSource, Filesystem, GenerationObserver, SchemaValidator, TemplateRenderer},
        services::ConfigLoader,
    },
    domain::{
        DomainError, EnvironmentModule, GenerationManifest, KubesprayCompat, MergedConfig,
        OrchestratorSettings, PathResolver, RenderContext, SchemaLayout,
        entities::PackageManifest, ensure_path_segment, manifest_files, render_plan,
    },
    error::InfragenResult,
};

/// Inputs of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub environment: String,
    pub config_package: String,
    pub skip_validation: bool,
    pub validate_only: bool,
}

impl GenerationRequest {
    pub fn new(environment: impl Into<String>, config_package: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            config_package: config_package.into(),
            skip_validation: false,
            validate_only: false,
        }
    }
}

/// What a run did, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub environment: String,
    pub config_package: String,
    /// `None` in validate-only mode.
    pub output_dir: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    pub manifest: Option<GenerationManifest>,
    pub events: Vec<GenerationEvent>,
    /// Every file written, manifest last.
    pub written: Vec<PathBuf>,
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Drives one (environment, config package) generation.
pub struct GenerateService {
    loader: ConfigLoader,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    validator: Option<Box<dyn SchemaValidator>>,
    clock: Clock,
}

impl GenerateService {
    /// A relative `repo_root` is taken against the working directory, so
    /// every path in the report and the manifest is absolute.
    pub fn new(
        repo_root: impl Into<PathBuf>,
        source: Box<dyn ConfigSource>,
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn TemplateRenderer>,
    ) -> Self {
        let repo_root = repo_root.into();
        let repo_root = std::path::absolute(&repo_root).unwrap_or(repo_root);
        Self {
            loader: ConfigLoader::new(source, repo_root),
            filesystem,
            renderer,
            validator: None,
            clock: Box::new(Utc::now),
        }
    }

    /// Check environment overrides against their schemas with `validator`.
    pub fn with_validator(mut self, validator: Box<dyn SchemaValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Source of the manifest `generatedAt` timestamp.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[instrument(
        skip_all,
        fields(environment = %request.environment, config_package = %request.config_package)
    )]
    pub fn generate(
        &self,
        request: &GenerationRequest,
        observer: &mut dyn GenerationObserver,
    ) -> InfragenResult<GenerationReport> {
        if request.environment.is_empty() {
            return Err(DomainError::MissingRequiredInput { field: "environment id" }.into());
        }
        if request.config_package.is_empty() {
            return Err(DomainError::MissingRequiredInput { field: "config package" }.into());
        }
        ensure_path_segment("environment id", &request.environment)?;
        ensure_path_segment("config package", &request.config_package)?;

        let mut run = Run {
            observer,
            report: GenerationReport {
                environment: request.environment.clone(),
                config_package: request.config_package.clone(),
                output_dir: None,
                manifest_path: None,
                manifest: None,
                events: Vec::new(),
                written: Vec::new(),
            },
        };

        // 1. Load and merge
        info!("loading configuration");
        let merged = self
            .loader
            .load_and_merge(&request.config_package, &request.environment)?;
        let package = self.loader.load_package_manifest(&request.config_package)?;
        run.emit(GenerationEvent::ConfigLoaded {
            platform: merged.infrastructure.platform.clone(),
            orchestrator: merged.container_orchestration.orchestrator.clone(),
            hosts: merged.hosts.len(),
        });

        // 2. Validate
        if request.skip_validation {
            info!("validation skipped");
            run.emit(GenerationEvent::ValidationSkipped);
        } else {
            info!("validating environment overrides");
            self.validate_environment(&request.environment, &mut run)?;
            run.emit(GenerationEvent::ValidationPassed);
        }

        // 3. Validate-only stops before any artifact
        if request.validate_only {
            info!("validate-only run complete");
            return Ok(run.report);
        }

        self.render_all(&merged, package.as_ref(), &mut run)?;
        Ok(run.report)
    }

    fn render_all(
        &self,
        merged: &MergedConfig,
        package: Option<&PackageManifest>,
        run: &mut Run<'_>,
    ) -> InfragenResult<()> {
        let resolver = PathResolver::new(self.loader.repo_root());

        // 4. Template paths
        let templates = resolver.resolve(&merged.master_config)?;
        run.emit(GenerationEvent::TemplatesResolved {
            infrastructure: templates.infrastructure.clone(),
            orchestrator: merged.container_orchestration.orchestrator.clone(),
        });

        // 5. Output paths
        let orchestrator = merged.orchestrator_settings().orchestrator();
        let outputs = resolver.resolve_output_paths(&merged.environment, &orchestrator)?;
        self.filesystem.create_dir_all(&outputs.output_dir)?;
        for dir in outputs.orchestration.directories() {
            self.filesystem.create_dir_all(dir)?;
        }
        run.report.output_dir = Some(outputs.output_dir.clone());
        run.emit(GenerationEvent::OutputDirReady {
            path: outputs.output_dir.clone(),
        });

        // 6. Render
        let context = RenderContext::from_serialize(merged)?;
        let jobs = render_plan(&templates, &outputs)?;
        if templates.infrastructure.is_none() {
            debug!("platform is none; infrastructure not rendered");
            run.emit(GenerationEvent::InfrastructureSkipped);
        }
        for job in &jobs {
            let rendered = self.renderer.render(&job.template, &context)?;
            self.filesystem.write_file(&job.output, &rendered)?;
            info!(kind = %job.kind, path = %job.output.display(), "rendered");
            run.report.written.push(job.output.clone());
            run.emit(GenerationEvent::ArtifactRendered {
                kind: job.kind,
                path: job.output.clone(),
            });
        }

        // 7. Compatibility document
        if matches!(merged.orchestrator_settings(), OrchestratorSettings::Kubespray(_)) {
            let compat = KubesprayCompat::from_ssh(&merged.ssh).to_pretty_json()?;
            self.filesystem.write_file(&outputs.kubespray_compat, &compat)?;
            run.report.written.push(outputs.kubespray_compat.clone());
            run.emit(GenerationEvent::CompatibilityWritten {
                path: outputs.kubespray_compat.clone(),
            });
        }

        // 8. Manifest, always last
        let manifest = GenerationManifest::new(
            merged,
            PackageManifest::version_or_default(package),
            manifest_files(&jobs, &outputs),
            (self.clock)(),
        );
        self.filesystem
            .write_file(&outputs.metadata, &manifest.to_pretty_json()?)?;
        info!(path = %outputs.metadata.display(), "manifest written");
        run.report.written.push(outputs.metadata.clone());
        run.report.manifest_path = Some(outputs.metadata.clone());
        run.report.manifest = Some(manifest);
        run.emit(GenerationEvent::ManifestWritten {
            path: outputs.metadata,
        });
        Ok(())
    }

    /// Check each module's override file, if present.
    fn validate_environment(&self, environment: &str, run: &mut Run<'_>) -> InfragenResult<()> {
        let layout = SchemaLayout::new(self.loader.repo_root());
        for module in EnvironmentModule::ALL {
            let check = layout.environment_check(module, environment);
            if !self.filesystem.exists(&check.file) {
                continue;
            }
            match &self.validator {
                Some(validator) if self.filesystem.exists(&check.schema) => {
                    validator.ensure_available()?;
                    validator.validate(&check)?;
                    run.emit(GenerationEvent::EnvironmentValidated {
                        module,
                        file: check.file,
                    });
                }
                _ => {
                    debug!(%module, "no schema check for environment override");
                    run.emit(GenerationEvent::EnvironmentChecked {
                        module,
                        file: check.file,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Records events into the report and forwards them to the observer.
struct Run<'a> {
    observer: &'a mut dyn GenerationObserver,
    report: GenerationReport,
}

impl Run<'_> {
    fn emit(&mut self, event: GenerationEvent) {
        self.observer.on_event(&event);
        self.report.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::{ArtifactKind, Platform, SchemaCheck};
    use crate::error::InfragenError;
    use chrono::TimeZone;
    use serde_json::{Value, json};
    use std::collections::{BTreeMap, HashMap};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    struct FakeSource(HashMap<PathBuf, Value>);

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

    #[derive(Clone, Default)]
    struct FakeFs {
        files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
        existing: Arc<Vec<PathBuf>>,
    }

    impl Filesystem for FakeFs {
        fn create_dir_all(&self, _path: &Path) -> InfragenResult<()> {
            Ok(())
        }

        fn write_file(&self, path: &Path, content: &str) -> InfragenResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_owned());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.existing.iter().any(|p| p == path) || self.files.lock().unwrap().contains_key(path)
        }

        fn list_files(&self, _dir: &Path, _ext: &str) -> InfragenResult<Vec<PathBuf>> {
            Ok(Vec::new())
        }
    }

    /// Renders `<template path>` and records every template opened.
    #[derive(Clone, Default)]
    struct EchoRenderer(Arc<Mutex<Vec<PathBuf>>>);

    impl TemplateRenderer for EchoRenderer {
        fn render(&self, template: &Path, context: &RenderContext) -> InfragenResult<String> {
            self.0.lock().unwrap().push(template.to_path_buf());
            Ok(format!(
                "{} for {}",
                template.display(),
                context.as_value()["environment"]
            ))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingValidator(Arc<Mutex<Vec<SchemaCheck>>>);

    impl SchemaValidator for RecordingValidator {
        fn validate(&self, check: &SchemaCheck) -> InfragenResult<()> {
            self.0.lock().unwrap().push(check.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Collect(Vec<GenerationEvent>);

    impl GenerationObserver for Collect {
        fn on_event(&mut self, event: &GenerationEvent) {
            self.0.push(event.clone());
        }
    }

    fn docs(platform: &str, orchestrator: &str) -> HashMap<PathBuf, Value> {
        let pkg = Path::new("/repo/config/packages/core");
        let mut docs = HashMap::new();
        docs.insert(
            pkg.join("config.yaml"),
            json!({
                "infrastructure": {"platform": platform, "provider": "terraform"},
                "container_orchestration": {"orchestrator": orchestrator}
            }),
        );
        docs.insert(pkg.join("hosts.yaml"), json!({"hosts": []}));
        docs.insert(pkg.join("networks.yaml"), json!({}));
        docs.insert(pkg.join("platforms/proxmox.yaml"), json!({"proxmox": {"node_name": "pve"}}));
        docs.insert(pkg.join("orchestrators/kubespray.yaml"), json!({"kubespray": {}}));
        docs.insert(pkg.join("orchestrators/kind.yaml"), json!({"kind": {}}));
        docs.insert(pkg.join("platform/stacks.yaml"), json!({}));
        docs.insert(pkg.join("business/apps.yaml"), json!({}));
        docs
    }

    struct Harness {
        service: GenerateService,
        fs: FakeFs,
        renderer: EchoRenderer,
    }

    fn harness(docs: HashMap<PathBuf, Value>, existing: Vec<PathBuf>) -> Harness {
        let fs = FakeFs {
            existing: Arc::new(existing),
            ..FakeFs::default()
        };
        let renderer = EchoRenderer::default();
        let service = GenerateService::new(
            "/repo",
            Box::new(FakeSource(docs)),
            Box::new(fs.clone()),
            Box::new(renderer.clone()),
        )
        .with_clock(|| Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        Harness {
            service,
            fs,
            renderer,
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("development", "core")
    }

    #[test]
    fn proxmox_kubespray_writes_all_artifacts_manifest_last() {
        let h = harness(docs("proxmox", "kubespray"), Vec::new());
        let report = h.service.generate(&request(), &mut Collect::default()).unwrap();

        let out = Path::new("/repo/api/outputs/development");
        let expected = [
            out.join("terraform.tfvars"),
            out.join("kubespray/inventory.ini"),
            out.join("kubespray/group_vars/all.yaml"),
            out.join("kubespray/group_vars/k8s_cluster.yaml"),
            out.join("provisioner.json"),
            out.join("platform.yaml"),
            out.join("business.yaml"),
            out.join("kubesprayConfig.json"),
            out.join("metadata.json"),
        ];
        assert_eq!(report.written, expected);

        let manifest = report.manifest.unwrap();
        assert_eq!(manifest.master_config.platform, "proxmox");
        assert_eq!(manifest.config_package.version, "v1.0.0");
        assert_eq!(
            manifest.files["orchestrator_group_vars"],
            out.join("kubespray/group_vars").display().to_string()
        );
        assert!(!manifest.files.contains_key("orchestrator_config"));
    }

    #[test]
    fn platform_none_never_opens_infrastructure_template() {
        let h = harness(docs("none", "kind"), Vec::new());
        let report = h.service.generate(&request(), &mut Collect::default()).unwrap();

        let opened = h.renderer.0.lock().unwrap().clone();
        assert!(opened.iter().all(|p| !p.to_string_lossy().contains("terraform")));
        assert!(report.events.contains(&GenerationEvent::InfrastructureSkipped));

        let files = h.fs.files.lock().unwrap();
        let out = Path::new("/repo/api/outputs/development");
        assert!(!files.contains_key(&out.join("terraform.tfvars")));
        assert!(!files.contains_key(&out.join("kubesprayConfig.json")));
        assert!(files.contains_key(&out.join("kind/config.yaml")));
    }

    #[test]
    fn observer_sees_events_in_order() {
        let h = harness(docs("none", "kind"), Vec::new());
        let mut observer = Collect::default();
        let report = h.service.generate(&request(), &mut observer).unwrap();

        assert_eq!(observer.0, report.events);
        let rendered: Vec<_> = observer
            .0
            .iter()
            .filter_map(|e| match e {
                GenerationEvent::ArtifactRendered { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            rendered,
            [
                ArtifactKind::OrchestratorConfig,
                ArtifactKind::Provisioner,
                ArtifactKind::Platform,
                ArtifactKind::Business
            ]
        );
        assert!(matches!(
            observer.0.last(),
            Some(GenerationEvent::ManifestWritten { .. })
        ));
    }

    #[test]
    fn validate_only_writes_nothing() {
        let h = harness(docs("proxmox", "kubespray"), Vec::new());
        let req = GenerationRequest {
            validate_only: true,
            ..request()
        };
        let report = h.service.generate(&req, &mut Collect::default()).unwrap();

        assert!(report.written.is_empty());
        assert!(report.manifest.is_none());
        assert!(h.fs.files.lock().unwrap().is_empty());
    }

    #[test]
    fn unsupported_orchestrator_writes_nothing() {
        let h = harness(docs("proxmox", "swarm"), Vec::new());
        let err = h.service.generate(&request(), &mut Collect::default()).unwrap_err();

        assert_eq!(
            err,
            InfragenError::Domain(DomainError::unsupported_orchestrator("swarm"))
        );
        assert!(h.fs.files.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_environment_id_rejected() {
        let h = harness(docs("none", "kind"), Vec::new());
        let err = h
            .service
            .generate(&GenerationRequest::new("", "core"), &mut Collect::default())
            .unwrap_err();
        assert!(matches!(
            err,
            InfragenError::Domain(DomainError::MissingRequiredInput { .. })
        ));
    }

    #[test]
    fn environment_id_with_path_parts_rejected_before_loading() {
        for env in ["/tmp/escaped", "../prod", "eu/dev"] {
            let h = harness(docs("none", "kind"), Vec::new());
            let mut events = Collect::default();
            let err = h
                .service
                .generate(&GenerationRequest::new(env, "core"), &mut events)
                .unwrap_err();

            assert_eq!(
                err,
                InfragenError::Domain(DomainError::InvalidPathSegment {
                    field: "environment id",
                    value: env.into(),
                })
            );
            assert!(events.0.is_empty());
            assert!(h.fs.files.lock().unwrap().is_empty());
        }
    }

    #[test]
    fn relative_repo_root_yields_absolute_manifest_paths() {
        let cwd = std::env::current_dir().unwrap();
        let rooted: HashMap<PathBuf, Value> = docs("none", "kind")
            .into_iter()
            .map(|(path, doc)| {
                let rel = path.strip_prefix("/repo").unwrap().to_path_buf();
                (cwd.join("lab-repo").join(rel), doc)
            })
            .collect();
        let service = GenerateService::new(
            "lab-repo",
            Box::new(FakeSource(rooted)),
            Box::new(FakeFs::default()),
            Box::new(EchoRenderer::default()),
        );

        let report = service.generate(&request(), &mut Collect::default()).unwrap();

        let manifest = report.manifest.unwrap();
        assert!(!manifest.files.is_empty());
        for path in manifest.files.values() {
            assert!(Path::new(path).is_absolute(), "{path}");
            assert!(Path::new(path).starts_with(cwd.join("lab-repo/api/outputs/development")));
        }
    }

    #[test]
    fn environment_overrides_checked_with_and_without_schema() {
        let existing = vec![
            PathBuf::from("/repo/infrastructure/environments/development.yaml"),
            PathBuf::from("/repo/business/environments/development.yaml"),
            PathBuf::from("/repo/api/schemas/environments/infrastructure.schema.yml"),
        ];
        let validator = RecordingValidator::default();
        let mut h = harness(docs("none", "kind"), existing);
        h.service = h.service.with_validator(Box::new(validator.clone()));

        let req = GenerationRequest {
            validate_only: true,
            ..request()
        };
        let report = h.service.generate(&req, &mut Collect::default()).unwrap();

        let checks = validator.0.lock().unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].schema_name, "infrastructure_environment");
        assert!(report.events.contains(&GenerationEvent::EnvironmentChecked {
            module: EnvironmentModule::Business,
            file: PathBuf::from("/repo/business/environments/development.yaml"),
        }));
        assert!(report.events.contains(&GenerationEvent::ValidationPassed));
    }

    #[test]
    fn rerun_is_identical() {
        let h = harness(docs("proxmox", "kubespray"), Vec::new());
        h.service.generate(&request(), &mut Collect::default()).unwrap();
        let first = h.fs.files.lock().unwrap().clone();
        h.service.generate(&request(), &mut Collect::default()).unwrap();
        let second = h.fs.files.lock().unwrap().clone();
        assert_eq!(first, second);
        assert!(first.values().any(|c| c.contains("2025-03-01T12:00:00Z")));
    }

    #[test]
    fn selections_reported_on_load() {
        let h = harness(docs("proxmox", "kubespray"), Vec::new());
        let report = h.service.generate(&request(), &mut Collect::default()).unwrap();
        assert_eq!(
            report.events[0],
            GenerationEvent::ConfigLoaded {
                platform: Platform::Proxmox,
                orchestrator: crate::domain::Orchestrator::Kubespray,
                hosts: 0,
            }
        );
    }
}
