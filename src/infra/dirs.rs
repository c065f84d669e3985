//! Platform-specific directory management
//!
//! Provides the cache and config directories. Follows the XDG Base Directory
//! Specification on Linux.
//!
//! Environment variables can override default directories:
//! - `AOCC_INTEGRATOR_CACHE_DIR` - Override cache directory
//! - `AOCC_INTEGRATOR_CONFIG_DIR` - Override config directory

use std::env;
use std::path::PathBuf;

/// Environment variable names for directory overrides
pub const ENV_CACHE_DIR: &str = "AOCC_INTEGRATOR_CACHE_DIR";
pub const ENV_CONFIG_DIR: &str = "AOCC_INTEGRATOR_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "aocc-integrator";

/// Subdirectory for release tarballs
const DOWNLOADS_SUBDIR: &str = "downloads";

/// Platform-specific directory provider
#[derive(Debug, Clone)]
pub struct AppDirs {
    cache_dir: PathBuf,
    config_dir: PathBuf,
}

impl AppDirs {
    /// Create a new `AppDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache_dir: Self::resolve_cache_dir(),
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use explicit directories
    #[must_use]
    pub fn with_dirs(cache_dir: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            config_dir,
        }
    }

    /// Get the cache directory path
    ///
    /// - Linux: `$XDG_CACHE_HOME/aocc-integrator` or `~/.cache/aocc-integrator`
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone()
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/aocc-integrator` or `~/.config/aocc-integrator`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the directory release tarballs are downloaded to
    #[must_use]
    pub fn downloads_dir(&self) -> PathBuf {
        self.cache_dir.join(DOWNLOADS_SUBDIR)
    }

    /// Get the global config file path
    ///
    /// Returns the path to `config.toml` in the config directory.
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    fn resolve_cache_dir() -> PathBuf {
        resolve(ENV_CACHE_DIR, dirs::cache_dir(), ".cache")
    }

    fn resolve_config_dir() -> PathBuf {
        resolve(ENV_CONFIG_DIR, dirs::config_dir(), ".config")
    }
}

/// Pick the environment override, then the platform directory, then a dot
/// directory under the home directory
fn resolve(var: &str, platform: Option<PathBuf>, home_subdir: &str) -> PathBuf {
    if let Some(path) = env::var_os(var).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    platform.map_or_else(
        || {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(home_subdir)
                .join(APP_NAME)
        },
        |p| p.join(APP_NAME),
    )
}

impl Default for AppDirs {
    fn default() -> Self {
        Self::new()
    }
}
