use std::path::PathBuf;
use thiserror::Error;

/// Every way a conversion run, or a single entry inside it, can fail.
///
/// Request-level kinds abort the whole run before any traversal begins (see
/// [`ConvertError::is_fatal`]). Per-file kinds are recovered by the engine,
/// which falls back to copying the file verbatim.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("'{argument}': expected a Unicode string")]
    InvalidArgumentType { argument: &'static str },
    #[error("path to convert does not exist: {path}")]
    PathNotFound { path: PathBuf },
    #[error("destination {destination} would overwrite the source {path}")]
    DestinationOverlapsSource { path: PathBuf, destination: PathBuf },
    #[error("unsupported encoding: '{label}'")]
    UnsupportedEncoding {
        label: String,
        /// File whose content was auto-detected as `label`, if any.
        path: Option<PathBuf>,
    },
    #[error("missing read permissions: {path}")]
    PermissionDenied {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("can't read file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("can't convert, non-text file detected: {path}")]
    BinaryFileRejected { path: PathBuf },
    #[error("can't transcode {path} from {from} to {to}")]
    TranscodeError {
        path: PathBuf,
        from: &'static str,
        to: &'static str,
    },
    #[error("can't copy {from} to {to}: {source}")]
    CopyError {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("can't write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("can't read ignore file {path}: {source}")]
    ConfigReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("path to convert is not a file: {path}")]
    NotAFile { path: PathBuf },
    #[error("path to convert is neither a file nor a directory: {path}")]
    UnsupportedPathType { path: PathBuf },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("can't build worker pool: {0}")]
    ThreadPool(String),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unsupported(label: impl Into<String>) -> Self {
        ConvertError::UnsupportedEncoding {
            label: label.into(),
            path: None,
        }
    }

    /// Returns `true` for errors that abort a run instead of being recorded
    /// against a single file.
    pub fn is_fatal(&self) -> bool {
        match self {
            ConvertError::InvalidArgumentType { .. }
            | ConvertError::PathNotFound { .. }
            | ConvertError::DestinationOverlapsSource { .. }
            | ConvertError::ConfigReadError { .. }
            | ConvertError::NotAFile { .. }
            | ConvertError::UnsupportedPathType { .. }
            | ConvertError::Io { .. }
            | ConvertError::ThreadPool(_) => true,
            // Request-level encodings carry no path; detected ones do.
            ConvertError::UnsupportedEncoding { path, .. } => path.is_none(),
            _ => false,
        }
    }
}
