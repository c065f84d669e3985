//! AOCC release catalog
//!
//! The releases this tool knows how to fetch and verify. Checksums are the
//! SHA256 of the vendor tarballs.

use semver::Version;

use crate::error::CatalogError;

/// A published AOCC release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AoccRelease {
    major: u64,
    minor: u64,
    patch: u64,
    /// SHA256 of the release tarball
    pub sha256: &'static str,
    /// Download URL of the release tarball
    pub url: &'static str,
    /// Whether this release is installed when no version is requested
    pub preferred: bool,
}

impl AoccRelease {
    /// Release version
    pub fn version(&self) -> Version {
        Version::new(self.major, self.minor, self.patch)
    }
}

const RELEASES: &[AoccRelease] = &[
    AoccRelease {
        major: 5,
        minor: 0,
        patch: 0,
        sha256: "966fac2d2c759e9de6e969c10ada7a7b306c113f7f1e07ea376829ec86380daa",
        url: "https://download.amd.com/developer/eula/aocc/aocc-5-0/aocc-compiler-5.0.0.tar",
        preferred: true,
    },
    AoccRelease {
        major: 4,
        minor: 2,
        patch: 0,
        sha256: "ed5a560ec745b24dc0685ccdcbde914843fb2f2dfbfce1ba592de4ffbce1ccab",
        url: "https://download.amd.com/developer/eula/aocc/aocc-4-2/aocc-compiler-4.2.0.tar",
        preferred: false,
    },
    AoccRelease {
        major: 4,
        minor: 1,
        patch: 0,
        sha256: "5b04bfdb751c68dfb9470b34235d76efa80a6b662a123c3375b255982cb52acd",
        url: "https://download.amd.com/developer/eula/aocc/aocc-4-1/aocc-compiler-4.1.0.tar",
        preferred: false,
    },
    AoccRelease {
        major: 4,
        minor: 0,
        patch: 0,
        sha256: "2729ec524cbc927618e479994330eeb72df5947e90cfcc49434009eee29bf7d4",
        url: "https://download.amd.com/developer/eula/aocc-compiler/aocc-compiler-4.0.0.tar",
        preferred: false,
    },
    AoccRelease {
        major: 3,
        minor: 2,
        patch: 0,
        sha256: "8493525b3df77f48ee16f3395a68ad4c42e18233a44b4d9282b25dbb95b113ec",
        url: "https://download.amd.com/developer/eula/aocc-compiler/aocc-compiler-3.2.0.tar",
        preferred: false,
    },
];

/// All known releases, newest first
pub fn releases() -> &'static [AoccRelease] {
    RELEASES
}

/// Release installed when no version is requested
pub fn preferred() -> &'static AoccRelease {
    RELEASES
        .iter()
        .find(|r| r.preferred)
        .unwrap_or(&RELEASES[0])
}

/// Look up an exact release
pub fn find(version: &Version) -> Option<&'static AoccRelease> {
    RELEASES.iter().find(|r| &r.version() == version)
}

/// Resolve a user-supplied version string, defaulting to the preferred release
pub fn resolve(requested: Option<&str>) -> Result<&'static AoccRelease, CatalogError> {
    let Some(requested) = requested else {
        return Ok(preferred());
    };

    let version = parse_version(requested)?;
    find(&version).ok_or_else(|| CatalogError::UnknownVersion {
        version: requested.to_string(),
        known: RELEASES.iter().map(|r| r.version().to_string()).collect(),
    })
}

/// Parse a version string, accepting `X.Y` as shorthand for `X.Y.0`
pub fn parse_version(input: &str) -> Result<Version, CatalogError> {
    let trimmed = input.trim().trim_start_matches('v');
    let normalized = if trimmed.matches('.').count() == 1 {
        format!("{trimmed}.0")
    } else {
        trimmed.to_string()
    };

    Version::parse(&normalized).map_err(|e| CatalogError::InvalidVersion {
        version: input.to_string(),
        reason: e.to_string(),
    })
}
