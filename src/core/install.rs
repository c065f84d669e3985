//! Install flow
//!
//! Unpacks a release tarball into a prefix and integrates it with the host
//! compiler. The EULA gate and option validation run before anything touches
//! the disk.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::catalog;
use crate::core::host::HostCompilerReference;
use crate::core::installation::ToolchainInstallation;
use crate::core::integrator::{Integrator, PatchReport};
use crate::core::license::check_license;
use crate::core::options::InstallOptions;
use crate::error::InstallError;
use crate::infra::patchelf::RpathPatcher;
use crate::infra::{archive, download, filesystem};

/// Everything an install needs
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Release tarball
    pub archive: PathBuf,
    /// Installation prefix; created if missing
    pub prefix: PathBuf,
    /// Validated install options
    pub options: InstallOptions,
    /// Host compiler to integrate with
    pub host: HostCompilerReference,
    /// Expected sha256 of the archive; the catalog entry is used when unset
    pub expected_sha256: Option<String>,
}

/// Outcome of a successful install
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    /// Installation prefix
    pub prefix: PathBuf,
    /// Entries copied into the prefix
    pub entries: u64,
    /// Post-install patch outcome
    pub patch: PatchReport,
}

/// Install `request.archive` into `request.prefix` and patch it
pub fn install(
    request: &InstallRequest,
    patcher: &dyn RpathPatcher,
) -> Result<InstallReport, InstallError> {
    check_license(request.options.license_agreed)?;
    request.options.validate()?;

    verify_archive(request)?;

    let prefix = filesystem::absolute(&request.prefix)?;
    let staging = staging_dir(&prefix, &request.options);
    if staging.exists() {
        filesystem::remove_dir_all(&staging)?;
    }
    let unpacked = unpack(&request.archive, &staging, &prefix);
    if let Err(e) = filesystem::remove_dir_all(&staging) {
        tracing::warn!("{e}");
    }
    let entries = unpacked?;
    tracing::info!("Installed {entries} entries into {}", prefix.display());

    let installation = ToolchainInstallation::open(&prefix)?;
    let patch = Integrator::new(patcher, request.options.fortran_fix_applies())
        .patch(&installation, &request.host)?;

    Ok(InstallReport {
        prefix,
        entries,
        patch,
    })
}

fn verify_archive(request: &InstallRequest) -> Result<(), InstallError> {
    let expected = match &request.expected_sha256 {
        Some(sha) => sha.clone(),
        None => match catalog::find(&request.options.version) {
            Some(release) => release.sha256.to_string(),
            None => {
                tracing::warn!(
                    "No checksum known for AOCC {}, installing {} unverified",
                    request.options.version,
                    request.archive.display()
                );
                return Ok(());
            }
        },
    };

    tracing::info!("Verifying {}", request.archive.display());
    let actual = download::sha256_file(&request.archive)?;
    if !actual.eq_ignore_ascii_case(&expected) {
        return Err(InstallError::ChecksumMismatch {
            file: request.archive.display().to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn unpack(archive: &Path, staging: &Path, prefix: &Path) -> Result<u64, InstallError> {
    archive::extract_tar(archive, staging)?;
    let root = archive::content_root(staging)?;
    filesystem::create_dir_all(prefix)?;
    Ok(filesystem::copy_tree(&root, prefix)?)
}

/// Scratch directory next to the prefix, so the final copy stays on one
/// filesystem
fn staging_dir(prefix: &Path, options: &InstallOptions) -> PathBuf {
    let name = format!(".aocc-staging-{}", options.version);
    match prefix.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => prefix.join(name),
    }
}
