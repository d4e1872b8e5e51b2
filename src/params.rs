//! Validation and normalization of the four conversion parameters.

use crate::catalog::{Charset, EncodingCatalog};
use crate::error::ConvertError;
use crate::options::ConvertOptions;
use crate::paths;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Raw, caller-supplied parameters. Absent and empty values take defaults.
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub source: Option<OsString>,
    pub destination: Option<OsString>,
    /// `None` means auto-detect per file.
    pub source_encoding: Option<OsString>,
    pub destination_encoding: Option<OsString>,
}

impl ConvertArgs {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn source(mut self, path: impl Into<OsString>) -> Self {
        self.source = Some(path.into());
        self
    }
    pub fn destination(mut self, path: impl Into<OsString>) -> Self {
        self.destination = Some(path.into());
        self
    }
    pub fn source_encoding(mut self, label: impl Into<OsString>) -> Self {
        self.source_encoding = Some(label.into());
        self
    }
    pub fn destination_encoding(mut self, label: impl Into<OsString>) -> Self {
        self.destination_encoding = Some(label.into());
        self
    }
}

/// A validated request for one entry of the traversal.
///
/// `destination` is the directory the entry's output is written into. It is
/// re-derived, never mutated, when descending into a subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_encoding: Option<Charset>,
    pub destination_encoding: Charset,
}

impl ConversionRequest {
    /// The same request for `child`, written into the same destination.
    pub(crate) fn with_source(&self, child: PathBuf) -> Self {
        Self {
            source: child,
            ..self.clone()
        }
    }

    /// The same request re-rooted under `destination`.
    pub(crate) fn with_destination(&self, destination: PathBuf) -> Self {
        Self {
            destination,
            ..self.clone()
        }
    }

    /// Where a file entry is saved: `destination/basename(source)`.
    pub fn save_path(&self) -> PathBuf {
        match self.source.file_name() {
            Some(name) => self.destination.join(name),
            None => self.destination.clone(),
        }
    }

    /// Fails when writing the output could land on the source itself: a file
    /// saved into its own directory, or a tree mirrored into the source or
    /// one of its ancestors.
    pub fn ensure_disjoint(&self) -> Result<(), ConvertError> {
        let overlaps = if self.source.is_dir() {
            self.source.starts_with(&self.destination)
        } else {
            self.save_path() == self.source
        };
        if overlaps {
            return Err(ConvertError::DestinationOverlapsSource {
                path: self.source.clone(),
                destination: self.destination.clone(),
            });
        }
        Ok(())
    }
}

pub struct ParamResolver<'a> {
    options: &'a ConvertOptions,
    catalog: &'a EncodingCatalog,
}

impl<'a> ParamResolver<'a> {
    pub fn new(options: &'a ConvertOptions, catalog: &'a EncodingCatalog) -> Self {
        Self { options, catalog }
    }

    /// Produces a canonical request. Only checks the filesystem for the
    /// existence of the source path.
    pub fn resolve(&self, args: &ConvertArgs) -> Result<ConversionRequest, ConvertError> {
        let source_encoding = label_arg("sourceEncoding", args.source_encoding.as_deref())?;
        let destination_encoding =
            label_arg("destinationEncoding", args.destination_encoding.as_deref())?;

        let working_dir = paths::absolutize(&self.options.working_dir)?;
        let source = match present(args.source.as_deref()) {
            Some(path) => paths::resolve(&working_dir, Path::new(path)),
            None => working_dir.clone(),
        };
        let destination = match present(args.destination.as_deref()) {
            Some(path) => paths::resolve(&working_dir, Path::new(path)),
            None => paths::resolve(&working_dir, &self.options.default_destination),
        };

        if !source.exists() {
            return Err(ConvertError::PathNotFound { path: source });
        }

        let source_encoding = source_encoding
            .map(|label| self.catalog.charset(label))
            .transpose()?;
        let destination_encoding = self
            .catalog
            .charset(destination_encoding.unwrap_or(self.options.default_encoding.as_str()))?;

        Ok(ConversionRequest {
            source,
            destination,
            source_encoding,
            destination_encoding,
        })
    }
}

fn present(value: Option<&OsStr>) -> Option<&OsStr> {
    value.filter(|v| !v.is_empty())
}

fn label_arg<'v>(
    argument: &'static str,
    value: Option<&'v OsStr>,
) -> Result<Option<&'v str>, ConvertError> {
    match present(value) {
        Some(v) => v
            .to_str()
            .map(Some)
            .ok_or(ConvertError::InvalidArgumentType { argument }),
        None => Ok(None),
    }
}
