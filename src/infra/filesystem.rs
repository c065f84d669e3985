//! Filesystem operations
//!
//! Handles file, link, and directory operations.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Remove a file or symbolic link
pub fn remove_file(path: &Path) -> Result<(), FilesystemError> {
    std::fs::remove_file(path).map_err(|e| FilesystemError::RemoveFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Write content to a file, replacing any previous content
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Anchor a relative `path` at the current directory
///
/// Symlinks and `..` are kept as written; only `.` components are dropped.
pub fn absolute(path: &Path) -> Result<PathBuf, FilesystemError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| FilesystemError::Absolute {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .fold(cwd, |acc, c| acc.join(c)))
}

/// Check whether `path` itself is a symbolic link (the link is not followed)
pub fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Check whether `path` itself is a regular file (links are not followed)
pub fn is_regular_file(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}

/// Create a new file that must not already exist, write `content`, and mark
/// it executable with `mode`
pub fn create_executable(path: &Path, content: &str, mode: u32) -> Result<(), FilesystemError> {
    let write_err = |e: std::io::Error| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    drop(file);

    set_mode(path, mode)
}

/// Set Unix permission bits on a file
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<(), FilesystemError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|e| {
        FilesystemError::SetPermissions {
            path: path.to_path_buf(),
            error: e.to_string(),
        }
    })
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> Result<(), FilesystemError> {
    Ok(())
}

/// Recursively copy `src` into `dest`, merging with existing content
///
/// Symbolic links are recreated as links rather than followed, and regular
/// files keep their permission bits.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<u64, FilesystemError> {
    create_dir_all(dest)?;
    let mut copied = 0;

    for entry in walkdir::WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| FilesystemError::Copy {
            from: src.to_path_buf(),
            to: dest.to_path_buf(),
            error: e.to_string(),
        })?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);
        let copy_err = |e: std::io::Error| FilesystemError::Copy {
            from: entry.path().to_path_buf(),
            to: target.clone(),
            error: e.to_string(),
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            let link = std::fs::read_link(entry.path()).map_err(copy_err)?;
            if std::fs::symlink_metadata(&target).is_ok() {
                remove_file(&target)?;
            }
            symlink(&link, &target).map_err(copy_err)?;
            copied += 1;
        } else {
            std::fs::copy(entry.path(), &target).map_err(copy_err)?;
            copied += 1;
        }
    }

    tracing::debug!(
        "Copied {copied} entries from {} to {}",
        src.display(),
        dest.display()
    );
    Ok(copied)
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(not(unix))]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::fs::copy(original, link).map(|_| ())
}
