use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a file buffer is classified as binary before transcoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    /// A NUL byte in the first 4 KiB marks the file as binary.
    Simple,
    /// `content_inspector` classification (BOM aware).
    Accurate,
    /// Every file is treated as text.
    None,
}

/// Process-wide defaults made explicit, so callers and tests can inject them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Base for every relative path and for the ignore file lookup.
    pub working_dir: PathBuf,
    /// Destination root used when the caller supplies none.
    pub default_destination: PathBuf,
    pub ignore_file_name: String,
    /// Destination encoding used when the caller supplies none.
    pub default_encoding: String,
    pub binary_detection: BinaryDetection,
    /// Caps the number of worker threads. `None` fans out on the global pool.
    pub max_threads: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            default_destination: PathBuf::from("CONVERTED"),
            ignore_file_name: ".convIgnore".to_string(),
            default_encoding: "UTF-8".to_string(),
            binary_detection: BinaryDetection::Accurate,
            max_threads: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConvertBuilder {
    options: ConvertOptions,
}

impl ConvertBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.working_dir = dir.into();
        self
    }
    pub fn default_destination(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.default_destination = dir.into();
        self
    }
    pub fn ignore_file_name(mut self, name: impl Into<String>) -> Self {
        self.options.ignore_file_name = name.into();
        self
    }
    pub fn default_encoding(mut self, label: impl Into<String>) -> Self {
        self.options.default_encoding = label.into();
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn max_threads(mut self, threads: usize) -> Self {
        self.options.max_threads = Some(threads);
        self
    }
    pub fn unbounded_threads(mut self) -> Self {
        self.options.max_threads = None;
        self
    }
    pub fn build(self) -> ConvertOptions {
        self.options
    }
}
