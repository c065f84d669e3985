//! Installed toolchain layout

use std::path::{Path, PathBuf};

use crate::error::PatchError;
use crate::infra::filesystem;

/// C and C++ front-ends that read a `<name>.cfg` file next to themselves
pub const CONFIG_FRONTENDS: [&str; 2] = ["clang", "clang++"];

/// Driver the Fortran wrapper delegates to
pub const C_FRONTEND: &str = "clang";

/// Public Fortran entry point, shipped as a symlink to the driver
pub const FORTRAN_DRIVER: &str = "flang";

/// Internal Fortran compiler binaries that link libquadmath
pub const FORTRAN_BINARIES: [&str; 2] = ["flang1", "flang2"];

/// An AOCC toolchain installed under a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainInstallation {
    root: PathBuf,
}

impl ToolchainInstallation {
    /// Describe the installation rooted at `root` without touching the disk
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Describe the installation rooted at `root`, which must have a `bin`
    /// directory
    ///
    /// A relative `root` is anchored at the working directory.
    pub fn open(root: &Path) -> Result<Self, PatchError> {
        let installation = Self::new(filesystem::absolute(root)?);
        if !installation.bin_dir().is_dir() {
            return Err(PatchError::MissingBinDir {
                path: installation.root,
            });
        }
        Ok(installation)
    }

    /// Installation root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the front-end executables
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Path to a front-end executable
    pub fn frontend(&self, name: &str) -> PathBuf {
        self.bin_dir().join(name)
    }

    /// Path to the config file a front-end loads on start-up
    pub fn config_file(&self, frontend: &str) -> PathBuf {
        self.bin_dir().join(format!("{frontend}.cfg"))
    }

    /// The C driver
    pub fn c_frontend(&self) -> PathBuf {
        self.frontend(C_FRONTEND)
    }

    /// The public Fortran driver
    pub fn fortran_driver(&self) -> PathBuf {
        self.frontend(FORTRAN_DRIVER)
    }

    /// The internal Fortran binaries, in patch order
    pub fn fortran_binaries(&self) -> Vec<PathBuf> {
        FORTRAN_BINARIES.iter().map(|b| self.frontend(b)).collect()
    }
}
