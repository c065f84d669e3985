//! Doctor command logic
//!
//! Checks the external tools an install or patch run relies on and reports
//! issues with suggestions.

use std::path::Path;
use std::process::Command;

use serde::Serialize;

use crate::core::global_config::GlobalConfig;

/// Result of a single dependency check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Name of the dependency being checked
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Version if available
    pub version: Option<String>,
    /// Error message if check failed
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    pub suggestion: Option<String>,
    /// Whether this is a required or optional dependency
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, version: Option<String>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            version,
            error: None,
            suggestion: None,
            required,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: Option<&str>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            version: None,
            error: Some(error.to_string()),
            suggestion: suggestion.map(String::from),
            required,
        }
    }
}

/// Overall doctor report
#[derive(Debug, Default, Serialize)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Configuration issues found
    pub config_issues: Vec<String>,
}

impl DoctorReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result
    pub fn add_check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    /// Add a configuration issue
    pub fn add_config_issue(&mut self, issue: String) {
        self.config_issues.push(issue);
    }

    /// Check if all required checks passed
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Check if all checks passed (including optional)
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed) && self.config_issues.is_empty()
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Count failed checks
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get all failed required checks
    pub fn failed_required(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .collect()
    }
}

/// Run `<program> --version` and extract a version from its output
///
/// `None` when the program cannot be run or exits with failure.
pub fn check_command_available(program: &Path) -> Option<String> {
    let output = Command::new(program).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    // Some tools print nothing parseable; being runnable is enough
    Some(extract_version(&combined).unwrap_or_else(|| "unknown".to_string()))
}

/// Extract version string from command output
fn extract_version(output: &str) -> Option<String> {
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:-\w+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn check_tool(name: &str, program: &Path, suggestion: &str, required: bool) -> CheckResult {
    match check_command_available(program) {
        Some(version) => CheckResult::pass(name, Some(version), required),
        None => CheckResult::fail(
            name,
            &format!("{} not found or not runnable", program.display()),
            Some(suggestion),
            required,
        ),
    }
}

/// Check patchelf, needed to patch the Fortran binaries
pub fn check_patchelf(program: &Path) -> CheckResult {
    check_tool(
        "patchelf",
        program,
        "Install patchelf (0.17 or older) with your package manager or set `patchelf` under [tools] in the config file",
        true,
    )
}

/// Check the host GCC
pub fn check_gcc(cc: &Path) -> CheckResult {
    check_tool(
        "Host GCC",
        cc,
        "Install GCC or pass --cc with the path to the gcc driver AOCC should use",
        true,
    )
}

/// Check that the config file parses
pub fn check_global_config(path: &Path) -> Vec<String> {
    match GlobalConfig::load_from_path(path) {
        Ok(_) => Vec::new(),
        Err(e) => vec![e.to_string()],
    }
}

/// Run all doctor checks
pub fn run_doctor(patchelf: &Path, cc: &Path, config_path: &Path) -> DoctorReport {
    let mut report = DoctorReport::new();

    report.add_check(check_patchelf(patchelf));
    report.add_check(check_gcc(cc));

    for issue in check_global_config(config_path) {
        report.add_config_issue(issue);
    }

    report
}
