//! `infragen generate env`: run the generation pipeline for one environment.

use std::path::PathBuf;

use serde_json::json;
use tracing::{debug, instrument};

use infragen_adapters::{LocalFilesystem, MiniJinjaRenderer, YamlConfigSource, YamlValidatorCli};
use infragen_core::application::{GenerateService, GenerationReport, GenerationRequest};

use crate::{
    cli::{GenerateCommands, GenerateEnvArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    cmd: GenerateCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        GenerateCommands::Env(args) => {
            let repo_root = super::resolve_repo_root(&global, &config)?;
            generate_env(args, repo_root, &config, output)
        }
    }
}

#[instrument(skip_all, fields(environment = %args.id))]
fn generate_env(
    args: GenerateEnvArgs,
    repo_root: PathBuf,
    config: &AppConfig,
    mut output: OutputManager,
) -> CliResult<()> {
    let request = build_request(&args, config);
    debug!(repo_root = %repo_root.display(), package = %request.config_package, "starting generation");

    output.print(&format!("Generating artifacts for environment: {}", request.environment))?;
    output.print(&format!("Using config package: {}", request.config_package))?;

    let service = GenerateService::new(
        repo_root,
        Box::new(YamlConfigSource::new()),
        Box::new(LocalFilesystem::new()),
        Box::new(MiniJinjaRenderer::new()),
    )
    .with_validator(Box::new(YamlValidatorCli::new(config.validator.command.clone())));

    let report = service.generate(&request, &mut output)?;

    output.json(&report_json(&report))?;
    match &report.output_dir {
        Some(dir) => {
            output.success(&format!(
                "Environment '{}' artifacts generated successfully",
                report.environment
            ))?;
            output.print(&format!("Output directory: {}", dir.display()))?;
        }
        None => output.success("Validation complete (--validate-only)")?,
    }
    Ok(())
}

fn build_request(args: &GenerateEnvArgs, config: &AppConfig) -> GenerationRequest {
    let package = args
        .config
        .clone()
        .unwrap_or_else(|| config.defaults.config_package.clone());
    let mut request = GenerationRequest::new(args.id.clone(), package);
    request.skip_validation = args.skip_validate;
    request.validate_only = args.validate_only;
    request
}

fn report_json(report: &GenerationReport) -> serde_json::Value {
    json!({
        "environment": report.environment,
        "configPackage": report.config_package,
        "outputDir": report.output_dir,
        "manifestPath": report.manifest_path,
        "manifest": report.manifest,
        "written": report.written,
    })
}
