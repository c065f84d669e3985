//! Error types for aocc-integrator
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while patching an installed toolchain
#[derive(Error, Debug)]
pub enum PatchError {
    /// No candidate library directory contains libquadmath
    #[error("Could not find libquadmath under '{prefix}' (searched: {searched})")]
    LibraryNotFound { prefix: PathBuf, searched: String },

    /// The Fortran driver is a regular file where a symlink was expected
    #[error("'{path}' is not a symbolic link; refusing to replace it with a wrapper script")]
    NotASymlink { path: PathBuf },

    /// The installation has no executable directory
    #[error("Toolchain installation at '{path}' has no bin directory")]
    MissingBinDir { path: PathBuf },

    /// Writing or removing an artifact failed
    #[error(transparent)]
    Io(#[from] FilesystemError),

    /// Rewriting a binary's rpath failed
    #[error(transparent)]
    Rpath(#[from] RpathError),
}

/// Errors from the binary rpath rewriter
#[derive(Error, Debug)]
pub enum RpathError {
    /// patchelf is not installed
    #[error("patchelf not found in PATH. Install patchelf (0.17 or older) or pass --patchelf")]
    ToolNotFound,

    /// An empty rpath was requested
    #[error("Refusing to set an empty rpath on '{path}'")]
    EmptyRpath { path: PathBuf },

    /// The tool could not be started
    #[error("Failed to run '{tool}' on '{path}': {error}")]
    Spawn {
        tool: PathBuf,
        path: PathBuf,
        error: String,
    },

    /// The tool exited with a failure status
    #[error("'{tool}' failed for '{path}': {stderr}")]
    Failed {
        tool: PathBuf,
        path: PathBuf,
        stderr: String,
    },
}

/// EULA acceptance errors
#[derive(Error, Debug, PartialEq)]
pub enum LicenseError {
    /// The EULA has not been accepted
    #[error("Installation of {product} requires acceptance of the EULA (found at {url}). Pass --license-agreed or set `agreed = true` under [license] in the config file to confirm acceptance of the EULA")]
    NotAccepted { product: String, url: String },
}

/// Release catalog errors
#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    /// The version is well-formed but not a known release
    #[error("Unknown AOCC version '{version}'. Known versions: {}", known.join(", "))]
    UnknownVersion { version: String, known: Vec<String> },

    /// The version string could not be parsed
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },
}

/// Install option validation errors
#[derive(Error, Debug, PartialEq)]
pub enum OptionsError {
    /// The host compiler family cannot host AOCC
    #[error("AOCC requires a GCC host compiler, got '{family}'")]
    UnsupportedCompiler { family: String },
}

/// Host compiler resolution errors
#[derive(Error, Debug)]
pub enum HostError {
    /// The compiler driver could not be found
    #[error("Host compiler '{name}' not found: {error}")]
    NotFound { name: String, error: String },

    /// The driver path does not sit inside a `<prefix>/bin` layout
    #[error("Cannot derive an installation prefix from '{path}'")]
    NoPrefix { path: PathBuf },

    /// The driver path could not be made absolute
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Toolchain version detection errors
#[derive(Error, Debug, PartialEq)]
pub enum DetectError {
    /// The front-end could not be run
    #[error("Failed to run '{path}': {error}")]
    Spawn { path: PathBuf, error: String },

    /// The output carries no AOCC release tag
    #[error("No AOCC release tag in version output of '{path}'")]
    NoReleaseTag { path: PathBuf },
}

/// Download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    NetworkError { url: String, error: String },

    /// The server answered with a non-success status
    #[error("Downloading '{url}' failed with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Checksum verification failed
    #[error("Checksum verification failed for '{file}': expected {expected}, got {actual}")]
    ChecksumFailed {
        file: String,
        expected: String,
        actual: String,
    },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },

    /// Every attempt failed
    #[error("Download failed after {retries} attempts: {url}: {error}")]
    MaxRetriesExceeded {
        url: String,
        retries: u32,
        error: String,
    },
}

impl DownloadError {
    /// Whether another attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkError { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Archive extraction errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Reading the archive or writing an entry failed
    #[error("Failed to extract '{archive}': {error}")]
    Io { archive: PathBuf, error: String },

    /// An entry would be written outside the destination
    #[error("Archive '{archive}' contains an entry outside the destination: '{entry}'")]
    PathTraversal { archive: PathBuf, entry: PathBuf },

    /// The archive holds no entries
    #[error("Archive '{archive}' is empty")]
    Empty { archive: PathBuf },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to remove file or link
    #[error("Failed to remove '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// A relative path could not be anchored to the working directory
    #[error("Cannot resolve '{path}' against the current directory: {error}")]
    Absolute { path: PathBuf, error: String },

    /// Failed to change permissions
    #[error("Failed to set permissions on '{path}': {error}")]
    SetPermissions { path: PathBuf, error: String },

    /// Failed to copy a file, link, or directory entry
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

/// Install flow errors
#[derive(Error, Debug)]
pub enum InstallError {
    /// License gate rejected the install
    #[error(transparent)]
    License(#[from] LicenseError),

    /// Options were rejected
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// Archive checksum does not match the release
    #[error("Checksum mismatch for '{file}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    /// Archive could not be read for hashing
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Extraction failed
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Copying the tree failed
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Post-install patching failed
    #[error("Post-install patch failed: {0}")]
    Patch(#[from] PatchError),
}
