//! CLI command for `aocc-integrator patch`
//!
//! Integrates an already installed toolchain with a host GCC.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use semver::Version;

use crate::cli::output::{is_json, print_detail, print_info, print_json, print_success};
use crate::core::catalog;
use crate::core::detect;
use crate::core::global_config::GlobalConfig;
use crate::core::host::HostCompilerReference;
use crate::core::installation::ToolchainInstallation;
use crate::core::integrator::{Integrator, PatchReport, WrapperStatus};
use crate::core::options::{CompilerFamily, InstallOptions};
use crate::infra::patchelf::Patchelf;

/// Arguments of the patch command
#[derive(Debug, Clone)]
pub struct PatchArgs {
    pub prefix: PathBuf,
    pub cc: PathBuf,
    pub toolchain_version: Option<String>,
    pub compiler: Option<String>,
    pub patchelf: Option<PathBuf>,
}

/// Execute the patch command
pub async fn execute(args: &PatchArgs, config: &GlobalConfig) -> Result<()> {
    let installation = ToolchainInstallation::open(&args.prefix)?;
    let host = resolve_host(&args.cc)?;

    let version = match &args.toolchain_version {
        Some(v) => catalog::parse_version(v)?,
        None => detect_installed_version(&installation)?,
    };
    let options = InstallOptions::new(version)
        .with_compiler(compiler_family(args.compiler.as_deref(), &host));
    options.validate()?;

    let patcher = resolve_patcher(&options, args.patchelf.as_deref(), config)?;

    print_info(&format!(
        "Patching AOCC {} at {} for {}",
        options.version,
        installation.root().display(),
        host.prefix().display()
    ));

    let report = Integrator::new(&patcher, options.fortran_fix_applies())
        .patch(&installation, &host)
        .with_context(|| format!("Failed to patch {}", installation.root().display()))?;

    if is_json() {
        return print_json(&serde_json::json!({
            "status": "success",
            "version": options.version.to_string(),
            "report": report,
        }));
    }
    print_patch_report(&report);
    print_success("Toolchain patched");
    Ok(())
}

/// Describe the host compiler behind `cc`
pub(crate) fn resolve_host(cc: &Path) -> Result<HostCompilerReference> {
    HostCompilerReference::from_cc(cc).context("Cannot locate the host compiler; pass --cc")
}

/// Family from the flag, or the one derived from the host driver name
pub(crate) fn compiler_family(flag: Option<&str>, host: &HostCompilerReference) -> CompilerFamily {
    flag.map_or_else(
        || host.family().clone(),
        |name| name.parse().unwrap_or_else(|e: std::convert::Infallible| match e {}),
    )
}

/// patchelf from the flag, then the config file, then PATH
///
/// Only resolved when the Fortran fix will run, so a host without patchelf can
/// still patch releases that do not need it.
pub(crate) fn resolve_patcher(
    options: &InstallOptions,
    flag: Option<&Path>,
    config: &GlobalConfig,
) -> Result<Patchelf> {
    if !options.fortran_fix_applies() {
        return Ok(Patchelf::default());
    }
    let program = flag.map_or_else(|| config.patchelf(), Path::to_path_buf);
    Patchelf::locate(&program).with_context(|| format!("Cannot use '{}'", program.display()))
}

fn detect_installed_version(installation: &ToolchainInstallation) -> Result<Version> {
    let clang = installation.c_frontend();
    detect::probe(&clang).with_context(|| {
        format!(
            "Cannot detect the AOCC release of {}; pass --toolchain-version",
            clang.display()
        )
    })
}

/// Human-readable summary of a patch run
pub(crate) fn print_patch_report(report: &PatchReport) {
    for path in &report.config_files {
        print_detail(&format!("wrote {}", path.display()));
    }
    if let Some(dir) = &report.library_dir {
        for binary in &report.rpath_patched {
            print_detail(&format!("rpath {} -> {}", binary.display(), dir.display()));
        }
    }
    match &report.wrapper {
        WrapperStatus::Skipped => {}
        WrapperStatus::Created(path) => print_detail(&format!("wrapper {}", path.display())),
        WrapperStatus::AlreadyPresent(path) => {
            print_detail(&format!("wrapper {} (unchanged)", path.display()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HostCompilerReference {
        HostCompilerReference::new(PathBuf::from("/opt/gcc12"), None, CompilerFamily::Gcc)
    }

    #[test]
    fn test_compiler_flag_overrides_driver_name() {
        assert_eq!(compiler_family(Some("clang"), &host()), CompilerFamily::Clang);
        assert_eq!(compiler_family(None, &host()), CompilerFamily::Gcc);
    }

    #[test]
    fn test_patcher_not_resolved_without_fortran_fix() {
        let options = InstallOptions::new(Version::new(6, 0, 0));
        let patcher = resolve_patcher(
            &options,
            Some(Path::new("/nonexistent/patchelf")),
            &GlobalConfig::default(),
        );
        assert!(patcher.is_ok());
    }

    #[test]
    fn test_missing_patchelf_is_an_error_when_needed() {
        let options = InstallOptions::new(Version::new(4, 2, 0));
        let patcher = resolve_patcher(
            &options,
            Some(Path::new("/nonexistent/patchelf")),
            &GlobalConfig::default(),
        );
        assert!(patcher.is_err());
    }
}
