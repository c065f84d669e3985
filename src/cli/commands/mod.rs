//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod detect;
pub mod doctor;
pub mod fetch;
pub mod install;
pub mod patch;
pub mod versions;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::core::global_config::GlobalConfig;
use crate::infra::dirs::AppDirs;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Integrate an installed toolchain with a host GCC
    Patch {
        /// AOCC installation prefix
        #[arg(short, long)]
        prefix: PathBuf,

        /// Host C compiler driver (name in PATH or path)
        #[arg(long, default_value = "gcc")]
        cc: PathBuf,

        /// AOCC release of the installation (detected from clang if omitted)
        #[arg(long, value_name = "VERSION")]
        toolchain_version: Option<String>,

        /// Host compiler family (derived from --cc if omitted)
        #[arg(long)]
        compiler: Option<String>,

        /// patchelf executable
        #[arg(long, env = "AOCC_INTEGRATOR_PATCHELF")]
        patchelf: Option<PathBuf>,
    },

    /// Install a release tarball and integrate it with a host GCC
    Install {
        /// Release tarball
        #[arg(short, long)]
        archive: PathBuf,

        /// Installation prefix
        #[arg(short, long)]
        prefix: PathBuf,

        /// AOCC release contained in the tarball
        #[arg(long, value_name = "VERSION")]
        toolchain_version: Option<String>,

        /// Host C compiler driver (name in PATH or path)
        #[arg(long, default_value = "gcc")]
        cc: PathBuf,

        /// Host compiler family (derived from --cc if omitted)
        #[arg(long)]
        compiler: Option<String>,

        /// Accept the AOCC end user license agreement
        #[arg(long)]
        license_agreed: bool,

        /// Expected sha256 of the tarball (defaults to the known release checksum)
        #[arg(long)]
        sha256: Option<String>,

        /// patchelf executable
        #[arg(long, env = "AOCC_INTEGRATOR_PATCHELF")]
        patchelf: Option<PathBuf>,
    },

    /// Download a release tarball
    Fetch {
        /// AOCC release to download (defaults to the preferred release)
        #[arg(long, value_name = "VERSION")]
        toolchain_version: Option<String>,

        /// Directory to store the tarball in
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Download from a mirror instead of the release URL
        #[arg(long, requires = "sha256")]
        url: Option<String>,

        /// Expected sha256 when downloading from a mirror
        #[arg(long, requires = "url")]
        sha256: Option<String>,

        /// Download again even if a verified file exists
        #[arg(short, long)]
        force: bool,
    },

    /// List known AOCC releases
    Versions,

    /// Detect the AOCC release of an installed clang
    Detect {
        /// Path to clang
        clang: PathBuf,
    },

    /// Check system dependencies
    Doctor {
        /// Host C compiler driver to check
        #[arg(long, default_value = "gcc")]
        cc: PathBuf,

        /// patchelf executable to check
        #[arg(long, env = "AOCC_INTEGRATOR_PATCHELF")]
        patchelf: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Patch {
                prefix,
                cc,
                toolchain_version,
                compiler,
                patchelf,
            } => {
                let (_, config) = load_config()?;
                let args = patch::PatchArgs {
                    prefix,
                    cc,
                    toolchain_version,
                    compiler,
                    patchelf,
                };
                patch::execute(&args, &config).await
            }
            Self::Install {
                archive,
                prefix,
                toolchain_version,
                cc,
                compiler,
                license_agreed,
                sha256,
                patchelf,
            } => {
                let (_, config) = load_config()?;
                let args = install::InstallArgs {
                    archive,
                    prefix,
                    toolchain_version,
                    cc,
                    compiler,
                    license_agreed,
                    sha256,
                    patchelf,
                };
                install::execute(&args, &config).await
            }
            Self::Fetch {
                toolchain_version,
                output,
                url,
                sha256,
                force,
            } => {
                let (dirs, config) = load_config()?;
                let args = fetch::FetchArgs {
                    toolchain_version,
                    output,
                    mirror: url.zip(sha256),
                    force,
                };
                fetch::execute(&args, &config, &dirs).await
            }
            Self::Versions => versions::execute().await,
            Self::Detect { clang } => detect::execute(&clang).await,
            Self::Doctor { cc, patchelf } => {
                let dirs = AppDirs::new();
                doctor::execute(&cc, patchelf, &dirs).await
            }
        }
    }
}

/// Load the global config file
fn load_config() -> Result<(AppDirs, GlobalConfig)> {
    let dirs = AppDirs::new();
    let config = GlobalConfig::load(&dirs).with_context(|| {
        format!(
            "Invalid config file {}",
            dirs.global_config_path().display()
        )
    })?;
    Ok((dirs, config))
}
