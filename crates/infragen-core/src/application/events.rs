//! Progress events emitted by the generation pipeline, in order.

use std::path::PathBuf;

use crate::domain::{ArtifactKind, EnvironmentModule, Orchestrator, Platform};

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// Step 1 finished.
    ConfigLoaded {
        platform: Platform,
        orchestrator: Orchestrator,
        hosts: usize,
    },
    /// An environment override file was checked against its schema.
    EnvironmentValidated {
        module: EnvironmentModule,
        file: PathBuf,
    },
    /// An environment override file exists but has no schema (or no
    /// validator is configured).
    EnvironmentChecked {
        module: EnvironmentModule,
        file: PathBuf,
    },
    ValidationSkipped,
    ValidationPassed,
    TemplatesResolved {
        infrastructure: Option<PathBuf>,
        orchestrator: Orchestrator,
    },
    OutputDirReady { path: PathBuf },
    ArtifactRendered { kind: ArtifactKind, path: PathBuf },
    /// Infrastructure is not rendered for platform `none`.
    InfrastructureSkipped,
    CompatibilityWritten { path: PathBuf },
    ManifestWritten { path: PathBuf },
}
