//! Verbatim duplication into the mirrored destination.

use crate::engine::{fan_out, report_failure};
use crate::error::ConvertError;
use crate::paths;
use crate::types::ConversionOutcome;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Copies the file or directory subtree at `source` into `destination`.
///
/// A file lands at `destination/basename(source)`; a directory is mirrored as
/// `destination/basename(source)/...`. Every file copied counts as `copied`,
/// every file that can't be copied as `failed`. Entries that are neither
/// regular files nor directories are skipped.
pub fn copy_entry(source: &Path, destination: &Path) -> ConversionOutcome {
    copy_excluding(source, destination, None)
}

/// Like [`copy_entry`] but never descends into `exclude`.
pub(crate) fn copy_excluding(
    source: &Path,
    destination: &Path,
    exclude: Option<&Path>,
) -> ConversionOutcome {
    let metadata = match fs::symlink_metadata(source) {
        Ok(metadata) => metadata,
        Err(_e) => {
            #[cfg(feature = "logging")]
            tracing::debug!("Skipping {}: {}", source.display(), _e);
            return ConversionOutcome::default();
        }
    };

    if metadata.is_file() {
        return match copy_file(source, destination) {
            Ok(_) => ConversionOutcome::copied(),
            Err(e) => {
                report_failure(&e);
                ConversionOutcome::failed()
            }
        };
    }

    if metadata.is_dir() {
        let mirror = match source.file_name() {
            Some(name) => destination.join(name),
            None => destination.to_path_buf(),
        };
        let children = match paths::children(source) {
            Ok(children) => children,
            Err(e) => {
                report_failure(&e);
                return ConversionOutcome::default();
            }
        };
        let children = children
            .into_iter()
            .filter(|child| Some(child.as_path()) != exclude)
            .collect();
        return fan_out(children, |child| copy_excluding(&child, &mirror, exclude));
    }

    #[cfg(feature = "logging")]
    tracing::debug!("Skipping special file {}", source.display());
    ConversionOutcome::default()
}

/// Copies one file to `destination/basename(source)`, creating `destination`
/// as needed. Never overwrites: an existing target fails with
/// [`ConvertError::CopyError`].
pub fn copy_file(source: &Path, destination: &Path) -> Result<PathBuf, ConvertError> {
    let save_path = match source.file_name() {
        Some(name) => destination.join(name),
        None => destination.to_path_buf(),
    };
    let fail = |e: io::Error| ConvertError::CopyError {
        from: source.to_path_buf(),
        to: save_path.clone(),
        source: e,
    };

    let mut reader = File::open(source).map_err(fail)?;
    fs::create_dir_all(destination).map_err(fail)?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&save_path)
        .map_err(fail)?;
    if let Err(e) = io::copy(&mut reader, &mut writer) {
        drop(writer);
        let _ = fs::remove_file(&save_path);
        return Err(fail(e));
    }
    Ok(save_path)
}
