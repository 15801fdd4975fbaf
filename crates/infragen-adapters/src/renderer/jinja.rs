//! Template renderer backed by minijinja.

use std::io;
use std::path::Path;

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value};
use tracing::debug;

use infragen_core::{
    application::{ApplicationError, RenderStage, ports::TemplateRenderer},
    domain::RenderContext,
    error::InfragenResult,
};

use super::functions;

/// Renders template files with the helper function library.
///
/// A fresh environment is built and the template re-read on every call.
/// Undefined fields are errors, output is never escaped and a trailing
/// newline in the template is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniJinjaRenderer;

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        Self
    }

    fn environment<'source>() -> Environment<'source> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        functions::register(&mut env);
        env
    }

    /// Render template `source` named `name`.
    pub fn render_str(
        &self,
        name: &Path,
        source: &str,
        context: &RenderContext,
    ) -> InfragenResult<String> {
        let env = Self::environment();
        let display = name.display().to_string();
        let ctx = Value::from_serialize(context.as_value());
        env.render_named_str(&display, source, ctx)
            .map_err(|e| render_error(name, e))
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &Path, context: &RenderContext) -> InfragenResult<String> {
        let source = std::fs::read_to_string(template).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::SourceNotFound {
                what: "template".into(),
                path: template.to_path_buf(),
            },
            _ => ApplicationError::ReadFailure {
                path: template.to_path_buf(),
                reason: e.to_string(),
            },
        })?;
        debug!(template = %template.display(), "rendering");
        self.render_str(template, &source, context)
    }
}

fn render_error(template: &Path, e: minijinja::Error) -> infragen_core::error::InfragenError {
    let stage = match e.kind() {
        ErrorKind::SyntaxError => RenderStage::Parse,
        ErrorKind::UndefinedError
        | ErrorKind::UnknownFunction
        | ErrorKind::UnknownFilter
        | ErrorKind::UnknownTest
        | ErrorKind::UnknownMethod => RenderStage::MissingReference,
        _ => RenderStage::Execution,
    };
    ApplicationError::RenderFailure {
        template: template.to_path_buf(),
        stage,
        reason: e.to_string(),
    }
    .into()
}
