//! Default configuration values

/// Maximum number of download retry attempts
pub const MAX_DOWNLOAD_RETRIES: u32 = 3;

/// Base delay for download retry backoff (in milliseconds)
pub const DOWNLOAD_RETRY_DELAY_MS: u64 = 1000;

/// Longest pause between download attempts (in milliseconds)
pub const DOWNLOAD_RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Prefix of a compiler shipped by the operating system.
///
/// Compilers installed here are already on the default search paths, so the
/// Fortran front-ends need no rpath help.
pub const SYSTEM_PREFIX: &str = "/usr";

/// Library subdirectories probed under a host prefix, in order
pub const LIBRARY_SUBDIRS: &[&str] = &["lib64", "lib"];

/// GCC runtime library the Fortran front-ends link against
pub const QUADMATH_LIBRARY: &str = "libquadmath";

/// Newest major release whose Fortran front-ends need the rpath fix
pub const FORTRAN_FIX_MAX_MAJOR: u64 = 5;

/// Name of the rpath rewriting tool
pub const PATCHELF: &str = "patchelf";

/// Permission bits for generated wrapper scripts (rwxr-xr-x)
pub const WRAPPER_MODE: u32 = 0o755;
