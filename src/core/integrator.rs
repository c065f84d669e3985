//! Post-install integration with a host GCC
//!
//! AOCC's front-ends need to find a full GCC installation (libstdc++, headers,
//! libquadmath) that is usually not the system one. The integrator makes that
//! happen after the tree is installed:
//!
//! 1. `clang.cfg` and `clang++.cfg` carry `--gcc-toolchain=<prefix>`, which
//!    clang reads on every invocation.
//! 2. `flang1` and `flang2` get their rpath pointed at the host's libquadmath.
//! 3. `flang` ignores `flang.cfg`, so its symlink is replaced by a shell
//!    wrapper that calls `clang` with the same flags plus an rpath for the
//!    programs it links.
//!
//! Steps 2 and 3 only run when the release needs them and the host is not the
//! system compiler. Any failure aborts the run and leaves whatever was already
//! written in place.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::defaults;
use crate::core::host::HostCompilerReference;
use crate::core::installation::{ToolchainInstallation, CONFIG_FRONTENDS};
use crate::error::PatchError;
use crate::infra::filesystem;
use crate::infra::patchelf::{BoundRpath, RpathPatcher};

/// State of the Fortran wrapper after a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum WrapperStatus {
    /// The Fortran fix did not apply
    Skipped,
    /// The symlink was replaced by a wrapper script
    Created(PathBuf),
    /// An identical wrapper was already in place
    AlreadyPresent(PathBuf),
}

/// What a patch run changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    /// Config files written
    pub config_files: Vec<PathBuf>,
    /// Directory holding libquadmath, when the Fortran fix ran
    pub library_dir: Option<PathBuf>,
    /// Binaries whose rpath was rewritten
    pub rpath_patched: Vec<PathBuf>,
    /// Fortran wrapper outcome
    pub wrapper: WrapperStatus,
}

impl Default for PatchReport {
    fn default() -> Self {
        Self {
            config_files: Vec::new(),
            library_dir: None,
            rpath_patched: Vec::new(),
            wrapper: WrapperStatus::Skipped,
        }
    }
}

/// `--gcc-toolchain=<prefix>`
pub fn gcc_toolchain_flag(prefix: &Path) -> String {
    format!("--gcc-toolchain={}", prefix.display())
}

/// Flags the Fortran wrapper passes to clang
pub fn fortran_flags(toolchain_flag: &str, library_dir: &Path) -> String {
    format!(
        "{toolchain_flag} -Wno-unused-command-line-argument \"-Wl,-rpath,{}\"",
        library_dir.display()
    )
}

/// Shell wrapper that runs `clang` under the caller's name with `flags`
pub fn wrapper_script(clang: &Path, flags: &str) -> String {
    format!(
        "#!/bin/sh\nexec -a \"$0\" \"{}\" {flags} \"$@\"\n",
        clang.display()
    )
}

/// Applies the host-compiler integration to an installed toolchain
pub struct Integrator<'a> {
    patcher: &'a dyn RpathPatcher,
    fortran_fix: bool,
}

impl<'a> Integrator<'a> {
    /// Create an integrator
    ///
    /// `fortran_fix` is the outcome of
    /// [`InstallOptions::fortran_fix_applies`](crate::core::options::InstallOptions::fortran_fix_applies).
    pub fn new(patcher: &'a dyn RpathPatcher, fortran_fix: bool) -> Self {
        Self {
            patcher,
            fortran_fix,
        }
    }

    /// Patch `installation` so its front-ends use `host`
    pub fn patch(
        &self,
        installation: &ToolchainInstallation,
        host: &HostCompilerReference,
    ) -> Result<PatchReport, PatchError> {
        if !installation.bin_dir().is_dir() {
            return Err(PatchError::MissingBinDir {
                path: installation.root().to_path_buf(),
            });
        }

        let toolchain_flag = gcc_toolchain_flag(host.prefix());
        let mut report = PatchReport {
            config_files: self.write_config_files(installation, host, &toolchain_flag)?,
            ..PatchReport::default()
        };

        if !self.fortran_fix {
            tracing::info!("Fortran front-ends need no patching for this release");
            return Ok(report);
        }
        if host.is_system_default() {
            tracing::info!(
                "Host compiler is under {}, skipping Fortran patching",
                defaults::SYSTEM_PREFIX
            );
            return Ok(report);
        }

        let library_dir = self.link_fortran_binaries(installation, host, &mut report)?;
        report.wrapper = self.write_fortran_wrapper(installation, &toolchain_flag, &library_dir)?;
        report.library_dir = Some(library_dir);

        Ok(report)
    }

    /// Write `clang.cfg` and `clang++.cfg`, replacing previous content
    fn write_config_files(
        &self,
        installation: &ToolchainInstallation,
        host: &HostCompilerReference,
        toolchain_flag: &str,
    ) -> Result<Vec<PathBuf>, PatchError> {
        if host.cxx().is_none() {
            tracing::warn!(
                "No C++ compiler found under {}, not writing clang config files",
                host.prefix().display()
            );
            return Ok(Vec::new());
        }

        let mut written = Vec::with_capacity(CONFIG_FRONTENDS.len());
        for frontend in CONFIG_FRONTENDS {
            let path = installation.config_file(frontend);
            filesystem::write_file(&path, toolchain_flag)?;
            tracing::info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Point the rpath of `flang1` and `flang2` at the host's libquadmath
    fn link_fortran_binaries(
        &self,
        installation: &ToolchainInstallation,
        host: &HostCompilerReference,
        report: &mut PatchReport,
    ) -> Result<PathBuf, PatchError> {
        let search = host.libquadmath_search();
        let library_dir = search.resolve().ok_or_else(|| PatchError::LibraryNotFound {
            prefix: host.prefix().to_path_buf(),
            searched: search.describe(),
        })?;

        let set_rpath = BoundRpath::new(self.patcher, library_dir.clone());
        for binary in installation.fortran_binaries() {
            set_rpath.apply(&binary)?;
            tracing::info!(
                "Set rpath of {} to {}",
                binary.display(),
                set_rpath.rpath().display()
            );
            report.rpath_patched.push(binary);
        }

        Ok(library_dir)
    }

    /// Replace the `flang` symlink with a wrapper script around `clang`
    fn write_fortran_wrapper(
        &self,
        installation: &ToolchainInstallation,
        toolchain_flag: &str,
        library_dir: &Path,
    ) -> Result<WrapperStatus, PatchError> {
        let flang = installation.fortran_driver();
        let script = wrapper_script(
            &installation.c_frontend(),
            &fortran_flags(toolchain_flag, library_dir),
        );

        if filesystem::is_regular_file(&flang)
            && filesystem::read_file(&flang).is_ok_and(|current| current == script)
        {
            tracing::info!("{} is already a wrapper script", flang.display());
            return Ok(WrapperStatus::AlreadyPresent(flang));
        }

        if !filesystem::is_symlink(&flang) {
            return Err(PatchError::NotASymlink { path: flang });
        }

        filesystem::remove_file(&flang)?;
        filesystem::create_executable(&flang, &script, defaults::WRAPPER_MODE)?;
        tracing::info!("Replaced {} with a wrapper script", flang.display());

        Ok(WrapperStatus::Created(flang))
    }
}
