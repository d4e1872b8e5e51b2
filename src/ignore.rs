use crate::error::ConvertError;
use crate::paths;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Absolute paths that are copied verbatim instead of converted.
///
/// Membership is exact equality of normalized absolute paths: listing a
/// directory does not match its children by prefix. The traversal copies a
/// matched directory wholesale, so its contents are never converted either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    paths: HashSet<PathBuf>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from caller-supplied paths, resolved against `working_dir`.
    pub fn from_paths<I, P>(working_dir: &Path, entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = Self::new();
        for entry in entries {
            set.insert(paths::resolve(working_dir, entry.as_ref()));
        }
        set
    }

    /// Seeds the set with the destination root and the ignore file itself, then
    /// adds every non-empty line of `working_dir/ignore_file_name` if it exists.
    ///
    /// A missing ignore file is not an error; one that exists but can't be read
    /// as UTF-8 text fails with [`ConvertError::ConfigReadError`].
    pub fn load(
        working_dir: &Path,
        ignore_file_name: &str,
        destination_root: &Path,
    ) -> Result<Self, ConvertError> {
        let ignore_file = paths::resolve(working_dir, Path::new(ignore_file_name));
        let mut set = Self::new();
        set.insert(paths::normalize(destination_root));
        set.insert(ignore_file.clone());

        let contents = match fs::read_to_string(&ignore_file) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(set),
            Err(source) => {
                return Err(ConvertError::ConfigReadError {
                    path: ignore_file,
                    source,
                });
            }
        };

        for line in contents.lines().filter(|line| !line.is_empty()) {
            set.insert(paths::resolve(working_dir, Path::new(line)));
        }
        Ok(set)
    }

    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}
