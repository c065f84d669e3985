//! CLI command for `aocc-integrator install`

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::commands::patch::{compiler_family, print_patch_report, resolve_host, resolve_patcher};
use crate::cli::output::{create_spinner, is_json, print_json, print_success};
use crate::core::catalog;
use crate::core::global_config::GlobalConfig;
use crate::core::install::{install, InstallRequest};
use crate::core::options::InstallOptions;

/// Arguments of the install command
#[derive(Debug, Clone)]
pub struct InstallArgs {
    pub archive: PathBuf,
    pub prefix: PathBuf,
    pub toolchain_version: Option<String>,
    pub cc: PathBuf,
    pub compiler: Option<String>,
    pub license_agreed: bool,
    pub sha256: Option<String>,
    pub patchelf: Option<PathBuf>,
}

/// Execute the install command
pub async fn execute(args: &InstallArgs, config: &GlobalConfig) -> Result<()> {
    if !args.archive.is_file() {
        anyhow::bail!("Archive {} does not exist", args.archive.display());
    }

    // A checksum override allows installing builds the catalog does not list
    let version = match (&args.toolchain_version, &args.sha256) {
        (Some(v), Some(_)) => catalog::parse_version(v)?,
        (v, _) => catalog::resolve(v.as_deref())?.version(),
    };
    let host = resolve_host(&args.cc)?;
    let options = InstallOptions::new(version)
        .with_license_agreed(args.license_agreed || config.license_agreed())
        .with_compiler(compiler_family(args.compiler.as_deref(), &host));

    let patcher = if options.license_agreed && options.validate().is_ok() {
        resolve_patcher(&options, args.patchelf.as_deref(), config)?
    } else {
        // Let the install flow report the license or options error
        Default::default()
    };

    let request = InstallRequest {
        archive: args.archive.clone(),
        prefix: args.prefix.clone(),
        options,
        host,
        expected_sha256: args.sha256.clone(),
    };

    let spinner = create_spinner(&format!(
        "Installing AOCC {} into {}",
        request.options.version,
        request.prefix.display()
    ));
    let result = install(&request, &patcher);
    spinner.finish_and_clear();
    let report = result.with_context(|| {
        format!(
            "Failed to install {} into {}",
            request.archive.display(),
            request.prefix.display()
        )
    })?;

    if is_json() {
        return print_json(&serde_json::json!({
            "status": "success",
            "version": request.options.version.to_string(),
            "report": report,
        }));
    }
    print_patch_report(&report.patch);
    print_success(&format!(
        "Installed AOCC {} into {}",
        request.options.version,
        report.prefix.display()
    ));
    Ok(())
}
