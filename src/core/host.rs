//! Host compiler reference
//!
//! Describes the GCC installation AOCC is paired with: where it lives and
//! whether it ships a C++ driver.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::library::LibrarySearch;
use crate::core::options::CompilerFamily;
use crate::error::HostError;
use crate::infra::filesystem;

/// Location of the host compiler the toolchain delegates to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCompilerReference {
    prefix: PathBuf,
    cxx: Option<PathBuf>,
    family: CompilerFamily,
}

impl HostCompilerReference {
    /// Create a reference from its parts
    pub fn new(prefix: PathBuf, cxx: Option<PathBuf>, family: CompilerFamily) -> Self {
        Self {
            prefix,
            cxx,
            family,
        }
    }

    /// Describe the compiler behind a C driver such as `gcc` or
    /// `/opt/gcc12/bin/gcc-12`
    ///
    /// Bare names are looked up in PATH. The prefix is the directory above
    /// the driver's `bin` directory, anchored at the working directory but
    /// not canonicalized; the C++ driver is the sibling `g++` with the same
    /// target prefix and version suffix, when present.
    pub fn from_cc(cc: &Path) -> Result<Self, HostError> {
        let found = if cc.components().count() == 1 {
            which::which(cc).map_err(|e| HostError::NotFound {
                name: cc.display().to_string(),
                error: e.to_string(),
            })?
        } else if cc.exists() {
            cc.to_path_buf()
        } else {
            return Err(HostError::NotFound {
                name: cc.display().to_string(),
                error: "no such file".to_string(),
            });
        };
        let driver = filesystem::absolute(&found)?;

        let bin_dir = driver.parent().ok_or_else(|| HostError::NoPrefix {
            path: driver.clone(),
        })?;
        let prefix = bin_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| HostError::NoPrefix {
                path: driver.clone(),
            })?;

        let name = driver
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let cxx = cxx_sibling(&name)
            .map(|cxx_name| bin_dir.join(cxx_name))
            .filter(|p| p.exists());

        let host = Self::new(
            prefix.to_path_buf(),
            cxx,
            CompilerFamily::from_driver_name(&name),
        );
        tracing::debug!(
            "Host compiler {} at prefix {} (C++ driver: {})",
            host.family,
            host.prefix.display(),
            host.cxx
                .as_deref()
                .map_or_else(|| "none".to_string(), |p| p.display().to_string())
        );
        Ok(host)
    }

    /// Installation prefix
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// C++ driver, if the installation has one
    pub fn cxx(&self) -> Option<&Path> {
        self.cxx.as_deref()
    }

    /// Compiler family
    pub fn family(&self) -> &CompilerFamily {
        &self.family
    }

    /// Whether this is the operating system's own compiler under `/usr`
    pub fn is_system_default(&self) -> bool {
        self.prefix == Path::new(defaults::SYSTEM_PREFIX)
    }

    /// Search for the Fortran runtime support library under this prefix
    pub fn libquadmath_search(&self) -> LibrarySearch {
        LibrarySearch::libquadmath(&self.prefix)
    }
}

/// Name of the C++ driver paired with a C driver name
fn cxx_sibling(cc_name: &str) -> Option<String> {
    cc_name
        .rfind("gcc")
        .map(|at| format!("{}g++{}", &cc_name[..at], &cc_name[at + 3..]))
}
