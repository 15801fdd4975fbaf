//! `infragen validate`: check repository definitions against their schemas.

use infragen_adapters::{LocalFilesystem, YamlValidatorCli};
use infragen_core::application::DefinitionValidationService;

use crate::{
    cli::{GlobalArgs, ValidateArgs, ValidateTarget},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: ValidateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let repo_root = super::resolve_repo_root(&global, &config)?;

    match args.target {
        ValidateTarget::Definitions => {
            let service = DefinitionValidationService::new(
                repo_root,
                Box::new(LocalFilesystem::new()),
                Box::new(YamlValidatorCli::new(config.validator.command.clone())),
            );
            let report = service.validate_definitions()?;

            for dir in &report.empty_dirs {
                output.warning(&format!("No definition files found in {}", dir.display()))?;
            }
            for file in &report.validated {
                output.success(&format!("Validated {}", file.display()))?;
            }
            output.json(&serde_json::json!({
                "validated": report.validated,
                "emptyDirs": report.empty_dirs,
            }))?;
            output.success("Definitions validated successfully.")?;
        }
    }
    Ok(())
}
