//! CLI command for `aocc-integrator versions`

use anyhow::Result;

use crate::cli::output::{is_json, is_quiet, print_json};
use crate::core::catalog;

/// Execute the versions command
pub async fn execute() -> Result<()> {
    let releases = catalog::releases();

    if is_json() {
        let entries = releases
            .iter()
            .map(|r| {
                serde_json::json!({
                    "version": r.version().to_string(),
                    "preferred": r.preferred,
                    "sha256": r.sha256,
                    "url": r.url,
                })
            })
            .collect::<Vec<_>>();
        return print_json(&entries);
    }

    if is_quiet() {
        return Ok(());
    }

    for release in releases {
        let marker = if release.preferred { " (preferred)" } else { "" };
        println!("{}{marker}", release.version());
    }
    Ok(())
}
