//! Release archive extraction
//!
//! AOCC releases ship as plain tarballs; mirrors sometimes serve them
//! gzip-compressed. Entries are unpacked with their permission bits and
//! symlinks intact, and no entry may land outside the destination.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use crate::error::{ArchiveError, FilesystemError};

/// Extract `archive` into `dest`, creating `dest` if needed
///
/// Returns the number of entries unpacked.
pub fn extract_tar(archive: &Path, dest: &Path) -> Result<u64, ArchiveError> {
    let io_err = |e: std::io::Error| ArchiveError::Io {
        archive: archive.to_path_buf(),
        error: e.to_string(),
    };

    std::fs::create_dir_all(dest).map_err(io_err)?;
    tracing::info!("Extracting {} to {}", archive.display(), dest.display());

    let file = BufReader::new(File::open(archive).map_err(io_err)?);
    let reader: Box<dyn Read> = if is_gzip(archive) {
        Box::new(flate2::read::GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut tarball = tar::Archive::new(reader);
    tarball.set_preserve_permissions(true);
    tarball.set_overwrite(true);

    let mut unpacked = 0;
    for entry in tarball.entries().map_err(io_err)? {
        let mut entry = entry.map_err(io_err)?;
        let entry_path = entry.path().map_err(io_err)?.into_owned();
        validate_entry_path(archive, &entry_path)?;

        entry.unpack_in(dest).map_err(io_err)?;
        unpacked += 1;
    }

    if unpacked == 0 {
        return Err(ArchiveError::Empty {
            archive: archive.to_path_buf(),
        });
    }
    tracing::debug!("Unpacked {unpacked} entries from {}", archive.display());
    Ok(unpacked)
}

fn is_gzip(archive: &Path) -> bool {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// Reject absolute entries and entries that climb out with `..`
fn validate_entry_path(archive: &Path, entry: &Path) -> Result<(), ArchiveError> {
    let escapes = entry.is_absolute()
        || entry
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
    if escapes {
        return Err(ArchiveError::PathTraversal {
            archive: archive.to_path_buf(),
            entry: entry.to_path_buf(),
        });
    }
    Ok(())
}

/// Return the single top-level directory of an extracted tree, or `dir` itself
/// when the archive had several top-level entries
pub fn content_root(dir: &Path) -> Result<PathBuf, FilesystemError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| FilesystemError::ReadFile {
            path: dir.to_path_buf(),
            error: e.to_string(),
        })?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect::<Vec<_>>();

    match entries.as_slice() {
        [only] if only.is_dir() && !crate::infra::filesystem::is_symlink(only) => Ok(only.clone()),
        _ => Ok(dir.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Write a tarball holding `aocc-compiler-5.0.0/bin/clang` (mode 0755)
    /// and a `flang -> clang` symlink
    fn release_tarball(path: &Path) {
        let mut builder = tar::Builder::new(File::create(path).unwrap());

        let body = b"binary";
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, "aocc-compiler-5.0.0/bin/clang", &body[..])
            .unwrap();

        let mut link = tar::Header::new_gnu();
        link.set_entry_type(tar::EntryType::Symlink);
        link.set_size(0);
        link.set_mode(0o777);
        builder
            .append_link(&mut link, "aocc-compiler-5.0.0/bin/flang", "clang")
            .unwrap();

        builder.finish().unwrap();
    }

    #[test]
    fn test_content_root_strips_single_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("aocc-compiler-5.0.0/bin")).unwrap();

        let root = content_root(temp.path()).unwrap();

        assert_eq!(root, temp.path().join("aocc-compiler-5.0.0"));
    }

    #[test]
    fn test_content_root_keeps_flat_layout() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("bin")).unwrap();
        std::fs::create_dir_all(temp.path().join("lib")).unwrap();

        let root = content_root(temp.path()).unwrap();

        assert_eq!(root, temp.path());
    }

    #[test]
    fn test_extract_missing_archive_fails() {
        let temp = TempDir::new().unwrap();

        let result = extract_tar(&temp.path().join("missing.tar"), &temp.path().join("out"));

        assert!(matches!(result, Err(ArchiveError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_keeps_modes_and_symlinks() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("aocc-compiler-5.0.0.tar");
        release_tarball(&archive);
        let out = temp.path().join("out");

        assert_eq!(extract_tar(&archive, &out).unwrap(), 2);

        let root = content_root(&out).unwrap();
        assert_eq!(root, out.join("aocc-compiler-5.0.0"));
        let clang = root.join("bin/clang");
        assert_eq!(std::fs::read_to_string(&clang).unwrap(), "binary");
        assert_eq!(
            std::fs::metadata(&clang).unwrap().permissions().mode() & 0o777,
            0o755
        );
        assert_eq!(
            std::fs::read_link(root.join("bin/flang")).unwrap(),
            PathBuf::from("clang")
        );
    }

    #[test]
    fn test_extract_gzip_tarball() {
        let temp = TempDir::new().unwrap();
        let plain = temp.path().join("plain.tar");
        release_tarball(&plain);
        let archive = temp.path().join("aocc-compiler-5.0.0.tar.gz");
        let mut encoder = flate2::write::GzEncoder::new(
            File::create(&archive).unwrap(),
            flate2::Compression::fast(),
        );
        std::io::copy(&mut File::open(&plain).unwrap(), &mut encoder).unwrap();
        encoder.finish().unwrap();

        let out = temp.path().join("out");
        extract_tar(&archive, &out).unwrap();

        assert!(out.join("aocc-compiler-5.0.0/bin/clang").is_file());
    }

    #[test]
    fn test_empty_archive_rejected() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("empty.tar");
        tar::Builder::new(File::create(&archive).unwrap())
            .into_inner()
            .unwrap();

        let result = extract_tar(&archive, &temp.path().join("out"));

        assert!(matches!(result, Err(ArchiveError::Empty { .. })));
    }

    #[test]
    fn test_entry_paths_must_stay_inside_destination() {
        let archive = Path::new("aocc.tar");
        for bad in ["../escape", "bin/../../escape", "/etc/passwd"] {
            assert!(
                matches!(
                    validate_entry_path(archive, Path::new(bad)),
                    Err(ArchiveError::PathTraversal { .. })
                ),
                "{bad}"
            );
        }
        assert!(validate_entry_path(archive, Path::new("aocc-compiler-5.0.0/bin/clang")).is_ok());
    }
}
