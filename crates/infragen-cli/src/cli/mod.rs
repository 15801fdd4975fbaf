//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "infragen",
    bin_name = "infragen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate environment artifacts from infrastructure config packages",
    long_about = "infragen merges a config package with per-environment overrides \
                  and renders infrastructure, orchestrator, provisioner, platform \
                  and business artifacts under api/outputs/<env>.",
    after_help = "EXAMPLES:\n\
        \x20 infragen generate env --id development\n\
        \x20 infragen generate env --id staging --config cloud --skip-validate\n\
        \x20 infragen validate --target definitions\n\
        \x20 infragen completions bash > /usr/share/bash-completion/completions/infragen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate artifacts.
    #[command(
        visible_alias = "gen",
        about = "Generate artifacts",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 infragen generate env --id development\n\
            \x20 infragen generate env --id development --validate-only"
    )]
    Generate(GenerateCommands),

    /// Validate repository definitions against their schemas.
    #[command(
        about = "Validate definitions",
        after_help = "EXAMPLES:\n\
            \x20 infragen validate\n\
            \x20 infragen validate --target definitions"
    )]
    Validate(ValidateArgs),

    /// Initialise an infragen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 infragen init           # user config directory\n\
            \x20 infragen init --local   # ./infragen.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 infragen completions bash > ~/.local/share/bash-completion/completions/infragen\n\
            \x20 infragen completions zsh  > ~/.zfunc/_infragen\n\
            \x20 infragen completions fish > ~/.config/fish/completions/infragen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the infragen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 infragen config get defaults.config_package\n\
            \x20 infragen config list\n\
            \x20 infragen config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum GenerateCommands {
    /// Render every artifact of one environment.
    Env(GenerateEnvArgs),
}

#[derive(Debug, Args)]
pub struct GenerateEnvArgs {
    /// Environment identifier.
    #[arg(long = "id", value_name = "ENV", help = "Environment identifier (e.g. development)")]
    pub id: String,

    /// Config package under `config/packages/`.
    #[arg(
        long = "config",
        value_name = "PACKAGE",
        help = "Config package identifier [default: defaults.config_package]"
    )]
    pub config: Option<String>,

    #[arg(
        long = "skip-validate",
        conflicts_with = "validate_only",
        help = "Skip environment override validation"
    )]
    pub skip_validate: bool,

    #[arg(long = "validate-only", help = "Load and validate without writing artifacts")]
    pub validate_only: bool,
}

// ── validate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(
        long = "target",
        value_enum,
        default_value = "definitions",
        help = "What to validate"
    )]
    pub target: ValidateTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidateTarget {
    /// Everything under `api/definitions`.
    Definitions,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `infragen.toml` in the current directory.
    #[arg(long = "local", help = "Create local configuration in current directory")]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `validator.command`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the user configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
