//! Native prebuild: one serial-mode compile before paying for the wasm build.

use super::command::{jobs_flag, run_checked, CommandRunner, Invocation};
use super::error::{BuildError, Result};
use super::vendor;
use super::workspace::Workspace;

pub fn prebuild_native(runner: &dyn CommandRunner, ws: &Workspace, jobs: usize) -> Result<()> {
    let src_dir = vendor::require(ws)?;
    tracing::info!("=== Native prebuild ===");

    if let Err(err) = clean_machine(runner, ws) {
        tracing::warn!("{err}");
    }

    let make = Invocation::new("make", &src_dir).args([jobs_flag(jobs), "serial".into()]);
    run_checked(runner, &make)
}

/// `make clean-machine`. Every failure here is a [`BuildError::BestEffortFailure`].
pub fn clean_machine(runner: &dyn CommandRunner, ws: &Workspace) -> Result<()> {
    let step = "make clean-machine";
    let clean = Invocation::new("make", &ws.source_dir()).arg("clean-machine");
    run_checked(runner, &clean).map_err(|err| BuildError::BestEffortFailure {
        step: step.to_string(),
        reason: err.to_string(),
    })
}
