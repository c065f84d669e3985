//! Installed toolchain version detection
//!
//! AOCC front-ends print their release tag in the `--version` banner, e.g.
//! `AMD clang version 16.0.3 (CLANG: AOCC_4.2.0-Build#... )`. Older releases
//! use underscores (`AOCC_3_2_0`).

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use semver::Version;

use crate::error::DetectError;

fn release_tag() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"AOCC_(\d+)[._](\d+)[._](\d+)").ok())
        .as_ref()
}

/// Extract the AOCC release from a `--version` banner
pub fn detect_version(banner: &str) -> Option<Version> {
    let caps = release_tag()?.captures(banner)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Run `<clang> --version` and extract the AOCC release
pub fn probe(clang: &Path) -> Result<Version, DetectError> {
    let output = Command::new(clang)
        .arg("--version")
        .output()
        .map_err(|e| DetectError::Spawn {
            path: clang.to_path_buf(),
            error: e.to_string(),
        })?;

    let banner = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    tracing::debug!("{} --version: {}", clang.display(), banner.trim());

    detect_version(&banner).ok_or_else(|| DetectError::NoReleaseTag {
        path: clang.to_path_buf(),
    })
}
