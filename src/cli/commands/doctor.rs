//! CLI command for `aocc-integrator doctor`
//!
//! Checks system dependencies and reports issues with suggestions.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::output::{is_json, is_quiet, print_detail, print_info, print_success, print_warning, status};
use crate::core::doctor::run_doctor;
use crate::core::global_config::GlobalConfig;
use crate::infra::dirs::AppDirs;

/// Execute the doctor command
pub async fn execute(cc: &Path, patchelf: Option<PathBuf>, dirs: &AppDirs) -> Result<()> {
    let config_path = dirs.global_config_path();
    // A broken config file is reported below rather than aborting
    let config = GlobalConfig::load_from_path(&config_path).unwrap_or_default();
    let patchelf = patchelf.unwrap_or_else(|| config.patchelf());

    let report = run_doctor(&patchelf, cc, &config_path);

    // JSON output mode
    if is_json() {
        let json_result = serde_json::json!({
            "status": if report.all_passed() { "success" } else if report.all_required_passed() { "warning" } else { "error" },
            "checks": report.checks,
            "config_issues": report.config_issues,
            "passed_count": report.passed_count(),
            "failed_count": report.failed_count(),
            "total_count": report.checks.len()
        });
        println!("{}", serde_json::to_string_pretty(&json_result)?);

        if !report.all_required_passed() {
            return Err(anyhow::anyhow!("Missing required dependencies"));
        }
        return Ok(());
    }

    // Quiet mode - only show errors
    if is_quiet() {
        let failed_required = report.failed_required();
        if !failed_required.is_empty() {
            for check in failed_required {
                eprintln!("{} Missing required: {}", status::ERROR, check.name);
            }
            return Err(anyhow::anyhow!("Missing required dependencies"));
        }
        return Ok(());
    }

    print_info("Checking system dependencies...");
    println!();

    for check in &report.checks {
        let version_str = check
            .version
            .as_ref()
            .map(|v| format!(" ({v})"))
            .unwrap_or_default();

        let required_str = if check.required { "" } else { " [optional]" };

        if check.passed {
            println!("  {} {}{version_str}{required_str}", status::SUCCESS, check.name);
        } else {
            println!("  {} {}{required_str}", status::ERROR, check.name);
            if let Some(error) = &check.error {
                print_detail(&format!("Error: {error}"));
            }
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("Suggestion: {suggestion}"));
            }
        }
    }

    if !report.config_issues.is_empty() {
        println!();
        print_warning("Configuration issues:");
        for issue in &report.config_issues {
            print_detail(&format!("• {issue}"));
        }
    }

    println!();
    let passed = report.passed_count();
    let total = report.checks.len();

    if report.all_passed() {
        print_success(&format!("All checks passed ({passed}/{total})"));
    } else if report.all_required_passed() {
        print_warning(&format!("{passed}/{total} checks passed"));
    } else {
        println!(
            "{} {passed}/{total} checks passed, {} failed",
            status::ERROR,
            report.failed_count()
        );
        return Err(anyhow::anyhow!(
            "Missing required dependencies. Run 'aocc-integrator doctor' for details."
        ));
    }

    Ok(())
}
