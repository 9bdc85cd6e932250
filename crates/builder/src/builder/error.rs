//! Error taxonomy for the build pipeline.

use std::path::PathBuf;

use thiserror::Error;

use super::pipeline::Stage;

pub type Result<T, E = BuildError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum BuildError {
    /// A required executable does not resolve on `PATH`.
    #[error("{program} not found on PATH. {hint}")]
    ToolchainMissing { program: String, hint: String },

    #[error("`{command}` failed ({})", describe_code(.code))]
    ExternalProcessFailure { command: String, code: Option<i32> },

    #[error("`{command}` could not be started: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool reported success but the expected output is missing.
    #[error("{step} completed but did not produce {}", .path.display())]
    PostconditionViolated { step: String, path: PathBuf },

    /// A stage that works inside the LAMMPS tree ran before it was fetched.
    #[error("{} not found. Run: lammpsweb-build fetch", .path.display())]
    NotProvisioned { path: PathBuf },

    /// Optional work that failed; callers swallow this.
    #[error("{step} skipped: {reason}")]
    BestEffortFailure { step: String, reason: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_best_effort(&self) -> bool {
        matches!(self, Self::BestEffortFailure { .. })
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// First fatal failure of a pipeline run, tagged with the stage that raised it.
#[derive(Error, Debug)]
#[error("aborted at stage {stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: BuildError,
}
