//! aocc-integrator - install AMD's AOCC toolchain next to a host GCC
//!
//! AOCC's clang and flang front-ends need a full GCC installation to find
//! libstdc++, headers, and libquadmath. This crate installs release tarballs
//! and integrates them with such a host compiler.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic: catalog, options, integrator, install flow
//! - [`infra`] - Infrastructure layer (network, filesystem, processes)
//! - [`config`] - Constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
