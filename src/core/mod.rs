//! Core business logic module
//!
//! Filesystem and process side effects go through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`catalog`] - Known AOCC releases and their checksums
//! - [`options`] - Install options and the Fortran-fix predicate
//! - [`license`] - EULA gate
//! - [`host`] - Host compiler reference
//! - [`library`] - libquadmath lookup under a host prefix
//! - [`installation`] - Installed toolchain layout
//! - [`integrator`] - Config files, rpath patching, and the Fortran wrapper
//! - [`detect`] - Release detection from a clang banner
//! - [`install`] - Tarball install flow
//! - [`fetch`] - Release download
//! - [`doctor`] - System dependency checks
//! - [`global_config`] - Global configuration management

pub mod catalog;
pub mod detect;
pub mod doctor;
pub mod fetch;
pub mod global_config;
pub mod host;
pub mod install;
pub mod installation;
pub mod integrator;
pub mod library;
pub mod license;
pub mod options;
