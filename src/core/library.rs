//! Runtime library lookup under a host compiler prefix

use std::path::{Path, PathBuf};

use crate::config::defaults;

/// Ordered search for the directory holding a shared library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySearch {
    library: String,
    candidates: Vec<PathBuf>,
}

impl LibrarySearch {
    /// Search `prefix/lib64` then `prefix/lib` for `library`
    pub fn under_prefix(prefix: &Path, library: &str) -> Self {
        Self {
            library: library.to_string(),
            candidates: defaults::LIBRARY_SUBDIRS
                .iter()
                .map(|sub| prefix.join(sub))
                .collect(),
        }
    }

    /// Search for libquadmath under `prefix`
    pub fn libquadmath(prefix: &Path) -> Self {
        Self::under_prefix(prefix, defaults::QUADMATH_LIBRARY)
    }

    /// Directories probed, in order
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that holds a `<library>.*` file, if any
    pub fn resolve(&self) -> Option<PathBuf> {
        let found = self
            .candidates
            .iter()
            .find(|dir| contains_library(dir, &self.library))
            .cloned();

        match &found {
            Some(dir) => tracing::debug!("Found {} in {}", self.library, dir.display()),
            None => tracing::debug!("{} not found in {}", self.library, self.describe()),
        }
        found
    }

    /// Comma-separated list of candidates for error messages
    pub fn describe(&self) -> String {
        self.candidates
            .iter()
            .map(|c| c.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn contains_library(dir: &Path, library: &str) -> bool {
    let stem = format!("{library}.");
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .any(|entry| entry.file_name().to_string_lossy().starts_with(&stem))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prefers_lib64() {
        let temp = TempDir::new().unwrap();
        for sub in ["lib64", "lib"] {
            std::fs::create_dir_all(temp.path().join(sub)).unwrap();
            std::fs::write(temp.path().join(sub).join("libquadmath.so.0"), "").unwrap();
        }

        let found = LibrarySearch::libquadmath(temp.path()).resolve();

        assert_eq!(found, Some(temp.path().join("lib64")));
    }

    #[test]
    fn test_lib64_only() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("lib64")).unwrap();
        std::fs::create_dir_all(temp.path().join("lib")).unwrap();
        std::fs::write(temp.path().join("lib64/libquadmath.so.0"), "").unwrap();
        std::fs::write(temp.path().join("lib/libgomp.so.1"), "").unwrap();

        let found = LibrarySearch::libquadmath(temp.path()).resolve();

        assert_eq!(found, Some(temp.path().join("lib64")));
    }

    #[test]
    fn test_falls_back_to_lib() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("lib")).unwrap();
        std::fs::write(temp.path().join("lib/libquadmath.a"), "").unwrap();

        let found = LibrarySearch::libquadmath(temp.path()).resolve();

        assert_eq!(found, Some(temp.path().join("lib")));
    }

    #[test]
    fn test_not_found() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("lib64")).unwrap();
        std::fs::write(temp.path().join("lib64/libquadmathx.so"), "").unwrap();

        let search = LibrarySearch::libquadmath(temp.path());

        assert_eq!(search.resolve(), None);
        assert!(search.describe().contains("lib64"));
        assert!(search.describe().contains("lib"));
    }

    #[test]
    fn test_candidates_order() {
        let search = LibrarySearch::libquadmath(Path::new("/opt/gcc12"));
        assert_eq!(
            search.candidates(),
            &[
                PathBuf::from("/opt/gcc12/lib64"),
                PathBuf::from("/opt/gcc12/lib")
            ]
        );
    }
}
