//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a scratch
//! directory with helpers to lay out fake AOCC and GCC installations, and a
//! runner for the binary that isolates it from the user's config.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory holding the installations a test works on.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create an executable shell script in the test project
    #[cfg(unix)]
    pub fn create_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        self.create_file(name, &format!("#!/bin/sh\n{body}\n"));
        let path = self.dir.path().join(name);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        path
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Lay out an installed toolchain under `name`
    ///
    /// `clang` prints a banner for `release`; `flang` is a symlink to
    /// `clang-driver`.
    #[cfg(unix)]
    pub fn create_toolchain(&self, name: &str, release: &str) -> PathBuf {
        self.create_script(
            &format!("{name}/bin/clang"),
            &format!("echo 'AMD clang version 16.0.3 (CLANG: AOCC_{release}-Build#1 2024_01_01)'"),
        );
        for binary in ["clang++", "clang-driver", "flang1", "flang2"] {
            self.create_file(&format!("{name}/bin/{binary}"), "\x7fELF");
        }
        std::os::unix::fs::symlink("clang-driver", self.dir.path().join(name).join("bin/flang"))
            .expect("Failed to create flang symlink");
        self.dir.path().join(name)
    }

    /// Lay out a GCC installation under `name` with libquadmath in `libdir`
    #[cfg(unix)]
    pub fn create_gcc(&self, name: &str, libdir: Option<&str>) -> PathBuf {
        self.create_script(&format!("{name}/bin/gcc"), "echo 'gcc (GCC) 12.2.0'");
        self.create_script(&format!("{name}/bin/g++"), "echo 'g++ (GCC) 12.2.0'");
        if let Some(libdir) = libdir {
            self.create_file(&format!("{name}/{libdir}/libquadmath.so.0"), "");
        }
        self.dir.path().join(name)
    }

    /// A stand-in for patchelf that appends its arguments to `patchelf.log`
    #[cfg(unix)]
    pub fn create_fake_patchelf(&self) -> PathBuf {
        let log = self.dir.path().join("patchelf.log");
        self.create_script(
            "tools/patchelf",
            &format!("echo \"$@\" >> '{}'", log.display()),
        )
    }

    /// Lines logged by the fake patchelf
    pub fn patchelf_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("patchelf.log"))
            .map(|log| log.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Command for the binary with config and cache dirs inside the project
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_aocc-integrator"));
        cmd.current_dir(self.path())
            .env("AOCC_INTEGRATOR_CONFIG_DIR", self.path().join("config"))
            .env("AOCC_INTEGRATOR_CACHE_DIR", self.path().join("cache"))
            .env_remove("AOCC_INTEGRATOR_PATCHELF")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run the binary with `args`
    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute aocc-integrator")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// `path` as a `&str` for command arguments
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("Non-UTF-8 temp path")
}

/// Combined stdout and stderr
pub fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
