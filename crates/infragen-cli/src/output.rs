//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use console::Term;
use owo_colors::OwoColorize;

use infragen_core::application::{GenerationEvent, ports::GenerationObserver};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
    /// Set once the pipeline reports it, so later paths print relative.
    output_dir: Option<PathBuf>,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
            output_dir: None,
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet and JSON modes.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{2713}", msg, |s| s.green().bold().to_string())
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{26a0}", msg, |s| s.yellow().bold().to_string())
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{2139}", msg, |s| s.blue().bold().to_string())
    }

    /// Skipped-step indicator: `⊘ <msg>`.
    pub fn skipped(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{2298}", msg, |s| s.dimmed().to_string())
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Machine-readable document on stdout. Printed in JSON mode only,
    /// even when `--quiet` is set.
    pub fn json(&self, value: &serde_json::Value) -> io::Result<()> {
        if self.resolved_format != OutputFormat::Json {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }

    fn marked(&self, mark: &str, msg: &str, paint: impl Fn(&str) -> String) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("  {mark} {msg}")
        } else {
            format!("  {} {}", paint(mark), msg)
        };
        self.term.write_line(&line)
    }

    fn relative<'p>(&self, path: &'p Path) -> std::borrow::Cow<'p, str> {
        match self.output_dir.as_deref().and_then(|dir| path.strip_prefix(dir).ok()) {
            Some(rel) => rel.to_string_lossy(),
            None => path.to_string_lossy(),
        }
    }

    fn render_event(&mut self, event: &GenerationEvent) -> io::Result<()> {
        match event {
            GenerationEvent::ConfigLoaded {
                platform,
                orchestrator,
                hosts,
            } => {
                self.header("[1/7] Loading configuration")?;
                self.success(&format!(
                    "Master config loaded (platform: {platform}, orchestrator: {orchestrator})"
                ))?;
                self.success(&format!("Loaded {hosts} hosts"))
            }
            GenerationEvent::EnvironmentValidated { module, file } => {
                self.success(&format!("Validated {module} override {}", file.display()))
            }
            GenerationEvent::EnvironmentChecked { module, .. } => {
                self.info(&format!("Checked {module} override (no schema check)"))
            }
            GenerationEvent::ValidationSkipped => {
                self.header("[2/7] Validating environment overrides")?;
                self.skipped("Skipped (--skip-validate)")
            }
            GenerationEvent::ValidationPassed => {
                self.success("Environment validation passed")
            }
            GenerationEvent::TemplatesResolved {
                infrastructure,
                orchestrator,
            } => {
                self.header("[3/7] Resolving template paths")?;
                if let Some(name) = infrastructure.as_deref().and_then(Path::file_name) {
                    self.success(&format!("Infrastructure template: {}", name.to_string_lossy()))?;
                }
                self.success(&format!("Orchestrator templates: {orchestrator}"))
            }
            GenerationEvent::OutputDirReady { path } => {
                self.output_dir = Some(path.clone());
                self.header("[4/7] Resolving output paths")?;
                self.success(&format!("Output directory: {}", path.display()))?;
                self.header("[5/7] Rendering templates")
            }
            GenerationEvent::ArtifactRendered { path, .. } => {
                self.success(&format!("Generated: {}", self.relative(path)))
            }
            GenerationEvent::InfrastructureSkipped => {
                self.skipped("Skipped: infrastructure (platform=none)")
            }
            GenerationEvent::CompatibilityWritten { path } => {
                self.header("[6/7] Generating compatibility artifacts")?;
                self.success(&format!("Generated: {}", self.relative(path)))
            }
            GenerationEvent::ManifestWritten { path } => {
                self.header("[7/7] Generating metadata")?;
                self.success(&format!("Generated: {}", self.relative(path)))
            }
        }
    }
}

impl GenerationObserver for OutputManager {
    fn on_event(&mut self, event: &GenerationEvent) {
        // A closed stdout must not abort generation.
        if let Err(e) = self.render_event(event) {
            tracing::debug!(error = %e, "progress output failed");
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
