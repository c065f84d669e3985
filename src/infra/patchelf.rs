//! Binary rpath rewriting
//!
//! The integrator rewrites the embedded runtime search path of the Fortran
//! front-ends. The rewrite is reached through the [`RpathPatcher`] trait so
//! the integrator can run against a fake in tests; [`Patchelf`] is the real
//! implementation and shells out to `patchelf`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::config::defaults;
use crate::error::RpathError;

/// Rewrites the runtime search path embedded in an executable
pub trait RpathPatcher {
    /// Replace the rpath of `binary` with `rpath`
    fn set_rpath(&self, binary: &Path, rpath: &Path) -> Result<(), RpathError>;
}

/// A patcher with its rpath argument fixed once and reused for every binary
pub struct BoundRpath<'a> {
    patcher: &'a dyn RpathPatcher,
    rpath: PathBuf,
}

impl<'a> BoundRpath<'a> {
    /// Bind `rpath` to `patcher`
    pub fn new(patcher: &'a dyn RpathPatcher, rpath: PathBuf) -> Self {
        Self { patcher, rpath }
    }

    /// The bound rpath
    pub fn rpath(&self) -> &Path {
        &self.rpath
    }

    /// Apply the bound rpath to `binary`
    ///
    /// An empty rpath is rejected before the patcher is invoked.
    pub fn apply(&self, binary: &Path) -> Result<(), RpathError> {
        if self.rpath.as_os_str().is_empty() {
            return Err(RpathError::EmptyRpath {
                path: binary.to_path_buf(),
            });
        }
        tracing::debug!(
            "Setting rpath of {} to {}",
            binary.display(),
            self.rpath.display()
        );
        self.patcher.set_rpath(binary, &self.rpath)
    }
}

/// `patchelf` command wrapper
#[derive(Debug, Clone)]
pub struct Patchelf {
    /// Path to the patchelf binary
    program: PathBuf,
}

impl Patchelf {
    /// Create a wrapper around a specific patchelf binary
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Resolve `program` (a bare name is looked up in PATH) and check that
    /// it is executable
    pub fn locate(program: &Path) -> Result<Self, RpathError> {
        which::which(program)
            .map(Self::new)
            .map_err(|_| RpathError::ToolNotFound)
    }

    /// Get the path to the patchelf binary
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Read back the rpath embedded in `binary`
    pub fn print_rpath(&self, binary: &Path) -> Result<String, RpathError> {
        let output = self.run(&[OsStr::new("--print-rpath")], binary)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run(&self, args: &[&OsStr], binary: &Path) -> Result<Output, RpathError> {
        let output = Command::new(&self.program)
            .args(args)
            .arg(binary)
            .output()
            .map_err(|e| RpathError::Spawn {
                tool: self.program.clone(),
                path: binary.to_path_buf(),
                error: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RpathError::Failed {
                tool: self.program.clone(),
                path: binary.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

impl Default for Patchelf {
    fn default() -> Self {
        Self::new(PathBuf::from(defaults::PATCHELF))
    }
}

impl RpathPatcher for Patchelf {
    fn set_rpath(&self, binary: &Path, rpath: &Path) -> Result<(), RpathError> {
        self.run(&[OsStr::new("--set-rpath"), rpath.as_os_str()], binary)
            .map(|_| ())
    }
}
