//! The linear build pipeline.
//!
//! Stages run strictly in [`Stage::ALL`] order. The first failure aborts the
//! run; nothing is retried or rolled back. Reruns rely on the idempotent
//! stages (provision, overlay, purge) to skip work already done.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::bundle;
use super::command::CommandRunner;
use super::config::PipelineConfig;
use super::customize;
use super::error::{PipelineError, Result};
use super::native;
use super::packages;
use super::vendor;
use super::wasm;
use super::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Preflight,
    Provision,
    Customize,
    SelectPackages,
    NativePrebuild,
    CrossCompile,
    Bundle,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Preflight,
        Stage::Provision,
        Stage::Customize,
        Stage::SelectPackages,
        Stage::NativePrebuild,
        Stage::CrossCompile,
        Stage::Bundle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Preflight => "preflight",
            Stage::Provision => "provision",
            Stage::Customize => "customize",
            Stage::SelectPackages => "select-packages",
            Stage::NativePrebuild => "native-prebuild",
            Stage::CrossCompile => "cross-compile",
            Stage::Bundle => "bundle",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One pipeline run over a workspace.
pub struct Pipeline<'a> {
    runner: &'a dyn CommandRunner,
    ws: &'a Workspace,
    config: &'a PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(runner: &'a dyn CommandRunner, ws: &'a Workspace, config: &'a PipelineConfig) -> Self {
        Self { runner, ws, config }
    }

    /// Run every stage. Returns the artifact path.
    pub fn run(&self) -> Result<PathBuf, PipelineError> {
        for stage in Stage::ALL {
            self.run_stage(stage)?;
        }
        Ok(self.ws.artifact())
    }

    /// Run a single stage, tagging any failure with it.
    pub fn run_stage(&self, stage: Stage) -> Result<(), PipelineError> {
        tracing::info!("=== {stage} ===");
        self.execute(stage)
            .map_err(|source| PipelineError { stage, source })
    }

    fn execute(&self, stage: Stage) -> Result<()> {
        let Self { runner, ws, config } = *self;
        match stage {
            Stage::Preflight => bundle::require_toolchain(runner).map(drop),
            Stage::Provision => vendor::ensure_provisioned(runner, ws, config).map(drop),
            Stage::Customize => customize::customize(ws, config),
            Stage::SelectPackages => packages::select_packages(runner, ws, &config.packages),
            Stage::NativePrebuild => native::prebuild_native(runner, ws, config.jobs),
            Stage::CrossCompile => wasm::cross_compile(runner, ws, config),
            Stage::Bundle => bundle::bundle(runner, ws, config).map(drop),
        }
    }
}
