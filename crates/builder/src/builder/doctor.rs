//! Host tool check.

use std::path::PathBuf;

use serde::Serialize;

use super::bundle::{EMCC, EMSDK_HINT};
use super::command::CommandRunner;
use super::error::{BuildError, Result};

pub const REQUIRED_TOOLS: &[&str] = &["git", "make", "emcc"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCheck {
    pub name: &'static str,
    pub path: Option<PathBuf>,
}

pub fn check(runner: &dyn CommandRunner) -> Vec<ToolCheck> {
    REQUIRED_TOOLS
        .iter()
        .map(|&name| ToolCheck {
            name,
            path: runner.find_program(name),
        })
        .collect()
}

/// Print one line per tool; fail on the first missing one after reporting all.
pub fn run(runner: &dyn CommandRunner) -> Result<()> {
    let checks = check(runner);
    for tool in &checks {
        match &tool.path {
            Some(path) => eprintln!("[OK] {} ({})", tool.name, path.display()),
            None => eprintln!("[FAIL] missing `{}` in PATH", tool.name),
        }
    }

    match checks.into_iter().find(|t| t.path.is_none()) {
        Some(missing) => Err(BuildError::ToolchainMissing {
            program: missing.name.to_string(),
            hint: hint_for(missing.name).to_string(),
        }),
        None => Ok(()),
    }
}

fn hint_for(tool: &str) -> &'static str {
    if tool == EMCC {
        EMSDK_HINT
    } else {
        "Install it with the system package manager."
    }
}
