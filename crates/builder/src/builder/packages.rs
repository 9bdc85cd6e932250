//! Optional LAMMPS package selection (`make yes-<pkg> ...`).

use super::command::{run_checked, CommandRunner, Invocation};
use super::error::Result;
use super::vendor;
use super::workspace::Workspace;

/// Enable all packages with one `make` call, in list order.
pub fn select_packages(
    runner: &dyn CommandRunner,
    ws: &Workspace,
    packages: &[String],
) -> Result<()> {
    let src_dir = vendor::require(ws)?;
    if packages.is_empty() {
        tracing::info!("No packages selected");
        return Ok(());
    }

    tracing::info!("Installing packages: {}", packages.join(" "));
    let make = Invocation::new("make", &src_dir).args(packages.iter().cloned());
    run_checked(runner, &make)
}
