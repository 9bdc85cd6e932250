//! Test doubles shared by the integration tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lammpsweb_builder::{BuildError, CommandRunner, Exit, Invocation, PipelineConfig, PurgeProfile};

/// Stands in for git, make and emcc.
///
/// - `git clone ... <dest>` creates `<dest>/src` with a few upstream units
/// - `make wasm` writes `lammps.js` into its working directory (unless disabled)
/// - anything else succeeds without side effects, unless told to fail
pub struct FakeHost {
    pub calls: RefCell<Vec<Invocation>>,
    programs: Vec<String>,
    failures: Vec<(String, i32)>,
    link_writes_artifact: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            programs: vec!["git".into(), "make".into(), "emcc".into()],
            failures: Vec::new(),
            link_writes_artifact: true,
        }
    }

    pub fn without_program(mut self, name: &str) -> Self {
        self.programs.retain(|p| p != name);
        self
    }

    pub fn fail_on(mut self, prefix: &str, code: i32) -> Self {
        self.failures.push((prefix.to_string(), code));
        self
    }

    pub fn link_produces_nothing(mut self) -> Self {
        self.link_writes_artifact = false;
        self
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Invocation::command_line).collect()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.command_lines()
            .iter()
            .filter(|l| l.starts_with(prefix))
            .count()
    }
}

impl CommandRunner for FakeHost {
    fn run(&self, invocation: &Invocation) -> Result<Exit, BuildError> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.command_line();

        if let Some((_, code)) = self.failures.iter().find(|(p, _)| line.starts_with(p.as_str())) {
            return Ok(Exit { code: Some(*code) });
        }

        match (invocation.program.as_str(), invocation.args.first().map(String::as_str)) {
            ("git", Some("clone")) => {
                let dest = PathBuf::from(invocation.args.last().unwrap());
                fake_checkout(&dest);
            }
            ("make", Some("wasm")) if self.link_writes_artifact => {
                std::fs::write(invocation.cwd.join("lammps.js"), "// emscripten output\n").unwrap();
            }
            _ => {}
        }
        Ok(Exit::SUCCESS)
    }

    fn find_program(&self, name: &str) -> Option<PathBuf> {
        self.programs
            .iter()
            .any(|p| p == name)
            .then(|| PathBuf::from("/opt/emsdk/bin").join(name))
    }
}

/// A minimal LAMMPS-shaped tree.
pub fn fake_checkout(dest: &Path) {
    let src = dest.join("src");
    std::fs::create_dir_all(&src).unwrap();
    for file in [
        "lammps.cpp",
        "lammps.h",
        "fix_imd.cpp",
        "fix_imd.h",
        "fix_ipi.cpp",
        "fix_ipi.h",
    ] {
        std::fs::write(src.join(file), format!("// upstream {file}\n")).unwrap();
    }
}

pub fn config(profile: PurgeProfile, vars: &[(&str, &str)]) -> PipelineConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    PipelineConfig::from_lookup(profile, |key| vars.get(key).cloned()).unwrap()
}
