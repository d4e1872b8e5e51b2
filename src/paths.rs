//! Lexical path resolution.
//!
//! Paths are made absolute against a base directory and normalized without
//! touching the filesystem, so symlinks are never resolved and the result is
//! stable for paths that do not exist yet.

use crate::error::ConvertError;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Joins `path` onto `base` (unless already absolute) and folds `.` and `..`.
pub(crate) fn resolve(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize(&joined)
}

pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Returns `dir` as an absolute, normalized path.
pub(crate) fn absolutize(dir: &Path) -> Result<PathBuf, ConvertError> {
    if dir.is_absolute() {
        Ok(normalize(dir))
    } else {
        let cwd = env::current_dir().map_err(|e| ConvertError::io(PathBuf::from("."), e))?;
        Ok(resolve(&cwd, dir))
    }
}

/// Immediate children of `dir`, in no particular order.
pub(crate) fn children(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    fs::read_dir(dir)
        .map_err(|e| ConvertError::io(dir, e))?
        .map(|entry| {
            entry
                .map(|entry| entry.path())
                .map_err(|e| ConvertError::io(dir, e))
        })
        .collect()
}
