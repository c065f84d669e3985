//! Release tarball fetch logic
//!
//! Downloads a release into a directory, verifying its checksum. A file that
//! is already present and verifies is reused.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::catalog::AoccRelease;
use crate::error::DownloadError;
use crate::infra::download::{
    file_name_from_url, file_matches_sha256, DownloadManager, ProgressCallback,
};

/// A tarball to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    /// Download URL
    pub url: String,
    /// Expected sha256
    pub sha256: String,
}

impl FetchTarget {
    /// Target for a catalog release
    pub fn from_release(release: &AoccRelease) -> Self {
        Self {
            url: release.url.to_string(),
            sha256: release.sha256.to_string(),
        }
    }

    /// File name the tarball is stored under
    pub fn file_name(&self) -> &str {
        file_name_from_url(&self.url).unwrap_or("aocc-compiler.tar")
    }
}

/// Outcome of a fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    /// Path of the verified tarball
    pub path: PathBuf,
    /// Whether it was downloaded in this run
    pub downloaded: bool,
}

/// Fetch `target` into `dest_dir`
///
/// With `force` unset, an existing file that matches the checksum is reused.
/// A file that does not match is replaced.
pub async fn fetch_release(
    manager: &DownloadManager,
    target: &FetchTarget,
    dest_dir: &Path,
    force: bool,
    progress: Option<ProgressCallback>,
) -> Result<FetchOutcome, DownloadError> {
    let dest = dest_dir.join(target.file_name());

    if !force && dest.exists() {
        if file_matches_sha256(&dest, &target.sha256)? {
            tracing::info!("Using cached {}", dest.display());
            return Ok(FetchOutcome {
                path: dest,
                downloaded: false,
            });
        }
        tracing::warn!("{} does not match its checksum, downloading again", dest.display());
    }

    tracing::info!("Downloading {}", target.url);
    let result = manager
        .download_verified(&target.url, &dest, &target.sha256, progress)
        .await?;
    tracing::debug!("Downloaded {} bytes to {}", result.bytes, result.path.display());

    Ok(FetchOutcome {
        path: result.path,
        downloaded: true,
    })
}
