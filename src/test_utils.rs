//! Test utilities
//!
//! Fakes for the external rpath tool, on-disk fixtures for toolchain and GCC
//! layouts, and proptest generators.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::RpathError;
use crate::infra::patchelf::RpathPatcher;

/// Rpath patcher that records calls instead of rewriting binaries
#[derive(Debug, Default)]
pub struct RecordingPatcher {
    calls: RefCell<Vec<(PathBuf, PathBuf)>>,
    fail: bool,
}

impl RecordingPatcher {
    /// A patcher whose every call fails
    pub fn failing() -> Self {
        Self {
            calls: RefCell::default(),
            fail: true,
        }
    }

    /// Recorded `(binary, rpath)` pairs in call order
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.borrow().clone()
    }

    /// Last rpath set on `binary`
    pub fn rpath_of(&self, binary: &Path) -> Option<PathBuf> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|(b, _)| b == binary)
            .map(|(_, r)| r.clone())
    }
}

impl RpathPatcher for RecordingPatcher {
    fn set_rpath(&self, binary: &Path, rpath: &Path) -> Result<(), RpathError> {
        if self.fail {
            return Err(RpathError::Failed {
                tool: PathBuf::from("patchelf"),
                path: binary.to_path_buf(),
                stderr: "not an ELF executable".to_string(),
            });
        }
        self.calls
            .borrow_mut()
            .push((binary.to_path_buf(), rpath.to_path_buf()));
        Ok(())
    }
}

/// Lay out an installed toolchain under `root`: `clang`, `clang++`, `flang1`,
/// `flang2` as regular files, `clang-driver` as the real driver and `flang` as
/// a symlink to it
#[cfg(unix)]
pub fn fake_toolchain(root: &Path) -> PathBuf {
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    for name in ["clang", "clang++", "clang-driver", "flang1", "flang2"] {
        std::fs::write(bin.join(name), "\x7fELF").unwrap();
    }
    std::os::unix::fs::symlink("clang-driver", bin.join("flang")).unwrap();
    root.to_path_buf()
}

/// Lay out a GCC installation under `prefix` with `libquadmath.so.0` in
/// `libdir` (when given) and a `g++` driver next to `gcc`
pub fn fake_gcc(prefix: &Path, libdir: Option<&str>) -> PathBuf {
    let bin = prefix.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join("gcc"), "").unwrap();
    std::fs::write(bin.join("g++"), "").unwrap();
    if let Some(libdir) = libdir {
        let dir = prefix.join(libdir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("libquadmath.so.0"), "").unwrap();
    }
    prefix.to_path_buf()
}

pub mod generators {
    use proptest::prelude::*;

    /// Generate an absolute install prefix such as `/opt/gcc-12`
    pub fn host_prefix() -> impl Strategy<Value = String> {
        proptest::collection::vec("[a-z][a-z0-9._-]{0,12}", 1..4)
            .prop_map(|parts| format!("/{}", parts.join("/")))
    }

    /// Generate a release-style version string
    pub fn release_version() -> impl Strategy<Value = (u64, u64, u64)> {
        (0u64..10, 0u64..10, 0u64..10)
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_recording_patcher_tracks_last_rpath() {
        let patcher = RecordingPatcher::default();
        patcher
            .set_rpath(Path::new("/a/flang1"), Path::new("/x"))
            .unwrap();
        patcher
            .set_rpath(Path::new("/a/flang1"), Path::new("/y"))
            .unwrap();

        assert_eq!(
            patcher.rpath_of(Path::new("/a/flang1")),
            Some(PathBuf::from("/y"))
        );
        assert_eq!(patcher.rpath_of(Path::new("/a/flang2")), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_host_prefix_generator(prefix in host_prefix()) {
            prop_assert!(prefix.starts_with('/'));
            prop_assert!(!prefix.ends_with('/'));
        }
    }
}
