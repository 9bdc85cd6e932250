//! External process invocation.
//!
//! Stages never build shell strings. They describe a process as an
//! [`Invocation`] and hand it to a [`CommandRunner`], which blocks until the
//! child exits. [`SystemRunner`] is the real implementation; tests substitute
//! a recording fake.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::error::{BuildError, Result};

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Overlay applied on top of the inherited process environment.
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    pub fn new(program: &str, cwd: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            env: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn env(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env.insert(key.to_string(), value.into());
        self
    }

    /// Program followed by its arguments, space separated.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {})", self.command_line(), self.cwd.display())
    }
}

/// Exit status of a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl Exit {
    pub const SUCCESS: Exit = Exit { code: Some(0) };

    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

/// The seam between the pipeline and the host system.
pub trait CommandRunner {
    /// Run to completion and report the exit status.
    fn run(&self, invocation: &Invocation) -> Result<Exit>;

    /// Resolve an executable on the search path.
    fn find_program(&self, name: &str) -> Option<PathBuf>;
}

/// Runs real processes with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<Exit> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(&invocation.env)
            .status()
            .map_err(|source| BuildError::Spawn {
                command: invocation.command_line(),
                source,
            })?;

        Ok(Exit {
            code: status.code(),
        })
    }

    fn find_program(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// Run an invocation and treat any non-zero exit as fatal.
pub fn run_checked(runner: &dyn CommandRunner, invocation: &Invocation) -> Result<()> {
    tracing::info!("$ {invocation}");
    let exit = runner.run(invocation)?;
    if !exit.success() {
        return Err(BuildError::ExternalProcessFailure {
            command: invocation.command_line(),
            code: exit.code,
        });
    }
    Ok(())
}

/// `-jN` flag for make.
pub fn jobs_flag(jobs: usize) -> String {
    format!("-j{jobs}")
}

/// Recording runner for unit tests.
#[cfg(test)]
pub(crate) mod fake {
    use super::{CommandRunner, Exit, Invocation, Result};
    use crate::builder::workspace::Workspace;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Scratch workspace with an (empty) LAMMPS checkout in place.
    pub fn checkout() -> (TempDir, Workspace) {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path());
        std::fs::create_dir_all(ws.source_dir()).unwrap();
        (tmp, ws)
    }

    #[derive(Default)]
    pub struct FakeRunner {
        pub calls: RefCell<Vec<Invocation>>,
        programs: Vec<String>,
        failures: Vec<(String, i32)>,
    }

    impl FakeRunner {
        /// Programs that `find_program` resolves.
        #[must_use]
        pub fn with_programs(mut self, programs: &[&str]) -> Self {
            self.programs = programs.iter().map(ToString::to_string).collect();
            self
        }

        /// Exit with `code` for any command line starting with `prefix`.
        #[must_use]
        pub fn fail_on(mut self, prefix: &str, code: i32) -> Self {
            self.failures.push((prefix.to_string(), code));
            self
        }

        pub fn command_lines(&self) -> Vec<String> {
            self.calls.borrow().iter().map(Invocation::command_line).collect()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, invocation: &Invocation) -> Result<Exit> {
            self.calls.borrow_mut().push(invocation.clone());
            let line = invocation.command_line();
            let code = self
                .failures
                .iter()
                .find(|(prefix, _)| line.starts_with(prefix.as_str()))
                .map_or(0, |(_, code)| *code);
            Ok(Exit { code: Some(code) })
        }

        fn find_program(&self, name: &str) -> Option<PathBuf> {
            self.programs
                .iter()
                .any(|p| p == name)
                .then(|| PathBuf::from("/usr/bin").join(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_joins_args() {
        let inv = Invocation::new("make", Path::new("/ws/lammps/src"))
            .args(["yes-molecule", "yes-kspace"])
            .env("EM_CACHE", "/ws/.cache");
        assert_eq!(inv.command_line(), "make yes-molecule yes-kspace");
        assert_eq!(
            inv.to_string(),
            "make yes-molecule yes-kspace (in /ws/lammps/src)"
        );
        assert_eq!(inv.env.get("EM_CACHE").map(String::as_str), Some("/ws/.cache"));
    }

    #[test]
    fn test_exit_success() {
        assert!(Exit::SUCCESS.success());
        assert!(!Exit { code: Some(2) }.success());
        assert!(!Exit { code: None }.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ok = Invocation::new("sh", tmp.path()).args(["-c", "exit 0"]);
        let bad = Invocation::new("sh", tmp.path()).args(["-c", "exit 3"]);

        assert!(run_checked(&SystemRunner, &ok).is_ok());
        let err = run_checked(&SystemRunner, &bad).unwrap_err();
        assert!(matches!(
            err,
            BuildError::ExternalProcessFailure { ref command, code: Some(3) } if command == "sh -c exit 3"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_applies_env_overlay_and_cwd() {
        let tmp = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("sh", tmp.path())
            .args(["-c", "printf %s \"$LAMMPSWEB_TEST\" > out.txt"])
            .env("LAMMPSWEB_TEST", "overlay");

        run_checked(&SystemRunner, &inv).unwrap();
        let written = std::fs::read_to_string(tmp.path().join("out.txt")).unwrap();
        assert_eq!(written, "overlay");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("lammpsweb-no-such-program", tmp.path());
        assert!(matches!(
            SystemRunner.run(&inv),
            Err(BuildError::Spawn { .. })
        ));
        assert!(SystemRunner.find_program("lammpsweb-no-such-program").is_none());
    }
}
