//! Global configuration management
//!
//! Reads settings from `config.toml` in the config directory. Command-line
//! flags take precedence over anything set here.

use crate::config::defaults;
use crate::infra::dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Global configuration error types
#[derive(Error, Debug)]
pub enum GlobalConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Global configuration for aocc-integrator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// EULA acceptance
    #[serde(default)]
    pub license: LicenseConfig,

    /// External tool locations
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Download settings
    #[serde(default)]
    pub download: DownloadConfig,
}

/// EULA acceptance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Accept the AOCC EULA for every install
    pub agreed: Option<bool>,
}

/// External tool locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// patchelf executable
    pub patchelf: Option<PathBuf>,
}

/// Download settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory release tarballs are stored in
    pub dir: Option<PathBuf>,

    /// Attempts per download
    pub retries: Option<u32>,
}

impl GlobalConfig {
    /// Load global configuration from the config directory
    ///
    /// A missing file yields the default configuration; an unparsable one is
    /// an error.
    pub fn load(dirs: &AppDirs) -> Result<Self, GlobalConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load global configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, GlobalConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GlobalConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let config = toml::from_str(&content).map_err(|e| GlobalConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Whether the EULA was accepted in the config file
    #[must_use]
    pub fn license_agreed(&self) -> bool {
        self.license.agreed.unwrap_or(false)
    }

    /// Get the effective patchelf program
    #[must_use]
    pub fn patchelf(&self) -> PathBuf {
        self.tools
            .patchelf
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::PATCHELF))
    }

    /// Get the effective downloads directory
    #[must_use]
    pub fn downloads_dir(&self, dirs: &AppDirs) -> PathBuf {
        self.download
            .dir
            .clone()
            .unwrap_or_else(|| dirs.downloads_dir())
    }

    /// Get the effective number of download attempts
    #[must_use]
    pub fn download_retries(&self) -> u32 {
        self.download
            .retries
            .unwrap_or(defaults::MAX_DOWNLOAD_RETRIES)
    }
}
