//! CLI implementation for `aocc-integrator fetch`
//!
//! Downloads a release tarball into the downloads directory.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::output::{create_download_bar, is_json, print_json, print_success};
use crate::config::defaults;
use crate::core::catalog;
use crate::core::fetch::{fetch_release, FetchTarget};
use crate::core::global_config::GlobalConfig;
use crate::infra::dirs::AppDirs;
use crate::infra::download::{DownloadManager, ProgressCallback};

/// Arguments of the fetch command
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub toolchain_version: Option<String>,
    pub output: Option<PathBuf>,
    /// Mirror URL and its sha256
    pub mirror: Option<(String, String)>,
    pub force: bool,
}

/// Execute the fetch command
pub async fn execute(args: &FetchArgs, config: &GlobalConfig, dirs: &AppDirs) -> Result<()> {
    let release = catalog::resolve(args.toolchain_version.as_deref())?;
    let target = match &args.mirror {
        Some((url, sha256)) => FetchTarget {
            url: url.clone(),
            sha256: sha256.clone(),
        },
        None => FetchTarget::from_release(release),
    };
    let dest_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.downloads_dir(dirs));

    let manager = DownloadManager::with_config(
        config.download_retries(),
        defaults::DOWNLOAD_RETRY_DELAY_MS,
    );

    let bar = create_download_bar(0);
    let progress_bar = bar.clone();
    let progress: ProgressCallback = Box::new(move |done: u64, total: u64| {
        if total > 0 {
            progress_bar.set_length(total);
        }
        progress_bar.set_position(done);
    });

    let result = fetch_release(&manager, &target, &dest_dir, args.force, Some(progress)).await;
    bar.finish_and_clear();
    let outcome = result.with_context(|| format!("Failed to fetch {}", target.url))?;

    if is_json() {
        return print_json(&serde_json::json!({
            "status": "success",
            "version": release.version().to_string(),
            "path": outcome.path,
            "downloaded": outcome.downloaded,
        }));
    }

    if outcome.downloaded {
        print_success(&format!("Downloaded {}", outcome.path.display()));
    } else {
        print_success(&format!("{} is up to date", outcome.path.display()));
    }
    Ok(())
}
