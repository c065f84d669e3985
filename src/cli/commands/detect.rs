//! CLI command for `aocc-integrator detect`

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{is_json, print_json};
use crate::core::detect::probe;
use crate::core::options::InstallOptions;

/// Execute the detect command
pub async fn execute(clang: &Path) -> Result<()> {
    let version = probe(clang).with_context(|| format!("Cannot detect AOCC release of {}", clang.display()))?;
    let fortran_fix = InstallOptions::new(version.clone()).fortran_fix_applies();

    if is_json() {
        return print_json(&serde_json::json!({
            "version": version.to_string(),
            "fortran_fix": fortran_fix,
        }));
    }

    println!("{version}");
    Ok(())
}
