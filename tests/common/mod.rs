//! Shared testing utilities for ptcase CLI tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Testing harness providing an isolated environment for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        std::fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        Self { root, work_dir }
    }

    /// Absolute path to the emulated `$HOME` directory.
    pub fn home(&self) -> &Path {
        self.root.path()
    }

    /// Path to the workspace directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for invoking the compiled `ptcase` binary.
    ///
    /// The command runs in an isolated directory with the API key unset;
    /// tests opt back in with `.env("OPENAI_API_KEY", ...)`.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("ptcase").expect("Failed to locate ptcase binary");
        cmd.current_dir(&self.work_dir).env("HOME", self.home()).env_remove("OPENAI_API_KEY");
        cmd
    }
}
