//! Install options
//!
//! The settings an install or patch run is made with. They are collected once
//! at the command boundary and passed down immutably; nothing below this
//! layer reads global state or re-parses variant strings.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::Serialize;

use crate::config::defaults;
use crate::error::OptionsError;

/// Family of the host compiler AOCC is paired with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerFamily {
    /// GNU Compiler Collection
    Gcc,
    /// LLVM Clang
    Clang,
    /// Anything else
    Other(String),
}

impl CompilerFamily {
    /// Guess the family from a driver file name such as `gcc-12` or
    /// `x86_64-linux-gnu-gcc`
    pub fn from_driver_name(name: &str) -> Self {
        if name.contains("clang") {
            CompilerFamily::Clang
        } else if name.contains("gcc") || name.contains("g++") {
            CompilerFamily::Gcc
        } else {
            CompilerFamily::Other(name.to_string())
        }
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerFamily::Gcc => write!(f, "gcc"),
            CompilerFamily::Clang => write!(f, "clang"),
            CompilerFamily::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for CompilerFamily {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "gcc" | "gnu" => CompilerFamily::Gcc,
            "clang" | "llvm" => CompilerFamily::Clang,
            other => CompilerFamily::Other(other.to_string()),
        })
    }
}

/// Options for installing or patching one toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    /// Whether the user accepted the vendor EULA
    pub license_agreed: bool,
    /// Toolchain version being installed
    pub version: Version,
    /// Family of the host compiler
    pub compiler: CompilerFamily,
}

impl InstallOptions {
    /// Create options for `version` with a GCC host and the EULA not accepted
    pub fn new(version: Version) -> Self {
        Self {
            license_agreed: false,
            version,
            compiler: CompilerFamily::Gcc,
        }
    }

    /// Set EULA acceptance
    pub fn with_license_agreed(mut self, agreed: bool) -> Self {
        self.license_agreed = agreed;
        self
    }

    /// Set the host compiler family
    pub fn with_compiler(mut self, compiler: CompilerFamily) -> Self {
        self.compiler = compiler;
        self
    }

    /// Reject combinations the toolchain cannot be installed with
    pub fn validate(&self) -> Result<(), OptionsError> {
        match self.compiler {
            CompilerFamily::Gcc => Ok(()),
            ref other => Err(OptionsError::UnsupportedCompiler {
                family: other.to_string(),
            }),
        }
    }

    /// Whether the Fortran front-ends need the libquadmath rpath and the
    /// wrapper script
    ///
    /// Releases up to 5.x built against a GCC host need it.
    pub fn fortran_fix_applies(&self) -> bool {
        self.version.major <= defaults::FORTRAN_FIX_MAX_MAJOR
            && self.compiler == CompilerFamily::Gcc
    }
}
