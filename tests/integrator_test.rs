//! Library-level tests for the toolchain integrator
//!
//! Exercises the public API with an in-memory rpath patcher.

#![cfg(unix)]

mod common;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use aocc_integrator::core::host::HostCompilerReference;
use aocc_integrator::core::installation::ToolchainInstallation;
use aocc_integrator::core::integrator::{gcc_toolchain_flag, Integrator, WrapperStatus};
use aocc_integrator::core::options::{CompilerFamily, InstallOptions};
use aocc_integrator::error::RpathError;
use aocc_integrator::infra::patchelf::RpathPatcher;
use common::TestProject;
use proptest::prelude::*;
use semver::Version;

#[derive(Default)]
struct MemoryPatcher {
    rpaths: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl RpathPatcher for MemoryPatcher {
    fn set_rpath(&self, binary: &Path, rpath: &Path) -> Result<(), RpathError> {
        self.rpaths
            .borrow_mut()
            .push((binary.to_path_buf(), rpath.to_path_buf()));
        Ok(())
    }
}

#[test]
fn test_integrates_installation_found_on_disk() {
    let project = TestProject::new();
    let root = project.create_toolchain("aocc", "4.2.0");
    let gcc = project.create_gcc("gcc12", Some("lib64"));
    let host = HostCompilerReference::from_cc(&gcc.join("bin/gcc")).unwrap();
    let options = InstallOptions::new(Version::new(4, 2, 0));
    let patcher = MemoryPatcher::default();

    let installation = ToolchainInstallation::open(&root).unwrap();
    let report = Integrator::new(&patcher, options.fortran_fix_applies())
        .patch(&installation, &host)
        .unwrap();

    assert_eq!(report.library_dir, Some(gcc.join("lib64")));
    assert_eq!(
        *patcher.rpaths.borrow(),
        vec![
            (root.join("bin/flang1"), gcc.join("lib64")),
            (root.join("bin/flang2"), gcc.join("lib64")),
        ]
    );
    assert_eq!(report.wrapper, WrapperStatus::Created(root.join("bin/flang")));
}

#[test]
fn test_clang_host_skips_fortran_fix() {
    let project = TestProject::new();
    let root = project.create_toolchain("aocc", "4.2.0");
    let gcc = project.create_gcc("gcc12", Some("lib64"));
    let host = HostCompilerReference::from_cc(&gcc.join("bin/gcc")).unwrap();
    let options = InstallOptions::new(Version::new(4, 2, 0)).with_compiler(CompilerFamily::Clang);
    let patcher = MemoryPatcher::default();

    let report = Integrator::new(&patcher, options.fortran_fix_applies())
        .patch(&ToolchainInstallation::new(root), &host)
        .unwrap();

    assert_eq!(report.config_files.len(), 2);
    assert_eq!(report.wrapper, WrapperStatus::Skipped);
    assert!(patcher.rpaths.borrow().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_config_files_name_host_prefix(
        segments in proptest::collection::vec("[a-z][a-z0-9._-]{0,8}", 1..4)
    ) {
        let project = TestProject::new();
        let root = project.create_toolchain("aocc", "6.0.0");
        let prefix = PathBuf::from(format!("/{}", segments.join("/")));
        let host = HostCompilerReference::new(
            prefix.clone(),
            Some(prefix.join("bin/g++")),
            CompilerFamily::Gcc,
        );
        let patcher = MemoryPatcher::default();
        let integrator = Integrator::new(&patcher, false);
        let installation = ToolchainInstallation::new(root.clone());

        integrator.patch(&installation, &host).unwrap();
        let c = std::fs::read(root.join("bin/clang.cfg")).unwrap();
        let cxx = std::fs::read(root.join("bin/clang++.cfg")).unwrap();
        integrator.patch(&installation, &host).unwrap();

        let expected = gcc_toolchain_flag(&prefix);
        prop_assert_eq!(&c, expected.as_bytes());
        prop_assert_eq!(&c, &cxx);
        prop_assert_eq!(std::fs::read(root.join("bin/clang.cfg")).unwrap(), c);
    }
}
