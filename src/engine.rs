use crate::catalog::{Charset, EncodingCatalog};
use crate::copier;
use crate::error::ConvertError;
use crate::ignore::IgnoreSet;
use crate::options::ConvertOptions;
use crate::params::{ConversionRequest, ConvertArgs, ParamResolver};
use crate::paths;
use crate::types::{ConversionOutcome, ConvertedBuffer};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

/// Entry point for conversions. Holds the configuration and the codec catalog;
/// every call validates its own parameters and runs independently.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
    catalog: EncodingCatalog,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        let catalog = EncodingCatalog::new(options.binary_detection);
        Self { options, catalog }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn catalog(&self) -> &EncodingCatalog {
        &self.catalog
    }

    pub fn resolve(&self, args: &ConvertArgs) -> Result<ConversionRequest, ConvertError> {
        ParamResolver::new(&self.options, &self.catalog).resolve(args)
    }

    /// Converts a file or a directory tree, dispatching on the source type.
    ///
    /// `ignore` replaces the ignore file lookup when given. Request-level
    /// errors are returned before anything is written; per-file failures only
    /// show up in the outcome.
    pub fn convert(
        &self,
        args: &ConvertArgs,
        ignore: Option<&[PathBuf]>,
    ) -> Result<ConversionOutcome, ConvertError> {
        let request = self.writable(args)?;
        let metadata = fs::symlink_metadata(&request.source)
            .map_err(|e| ConvertError::io(&request.source, e))?;

        if metadata.is_file() {
            let ignore = self.ignore_set(&request, ignore)?;
            if ignore.contains(&request.source) {
                #[cfg(feature = "logging")]
                tracing::debug!("Ignored, copying as is: {}", request.source.display());
                return Ok(copier::copy_excluding(
                    &request.source,
                    &request.destination,
                    None,
                ));
            }
            return Ok(file_outcome(&self.catalog, &request));
        }
        if metadata.is_dir() {
            return self.directory(&request, ignore);
        }
        Err(ConvertError::UnsupportedPathType {
            path: request.source,
        })
    }

    /// Recursively converts the directory tree at the source path.
    pub fn convert_directory(
        &self,
        args: &ConvertArgs,
        ignore: Option<&[PathBuf]>,
    ) -> Result<ConversionOutcome, ConvertError> {
        let request = self.writable(args)?;
        self.directory(&request, ignore)
    }

    /// Converts a single file. Returns `true` if it was transcoded and `false`
    /// if it was copied verbatim instead.
    pub fn convert_file(&self, args: &ConvertArgs) -> Result<bool, ConvertError> {
        let request = self.writable(args)?;
        ensure_file(&request.source)?;
        convert_request_file(&self.catalog, &request)
    }

    /// Reads and re-encodes a file without writing anything.
    pub fn converted_buffer(
        &self,
        path: impl AsRef<Path>,
        source_encoding: Option<&str>,
        destination_encoding: Option<&str>,
    ) -> Result<ConvertedBuffer, ConvertError> {
        let mut args = ConvertArgs::new().source(path.as_ref().as_os_str());
        args.source_encoding = source_encoding.map(Into::into);
        args.destination_encoding = destination_encoding.map(Into::into);

        let request = self.resolve(&args)?;
        ensure_file(&request.source)?;
        transcode_file(
            &self.catalog,
            &request.source,
            request.source_encoding,
            request.destination_encoding,
        )
    }

    fn directory(
        &self,
        request: &ConversionRequest,
        ignore: Option<&[PathBuf]>,
    ) -> Result<ConversionOutcome, ConvertError> {
        let ignore = self.ignore_set(request, ignore)?;
        let children = paths::children(&request.source)?;

        #[cfg(feature = "logging")]
        tracing::debug!(
            "Converting {} into {} ({} ignored paths)",
            request.source.display(),
            request.destination.display(),
            ignore.len()
        );

        // The traversal root maps onto the destination root itself.
        let traversal = Traversal {
            catalog: &self.catalog,
            ignore: &ignore,
            output_root: &request.destination,
        };
        self.run(|| traversal.children(request, children))
    }

    /// Resolves a request that is safe to write: its output can't land on the
    /// source.
    fn writable(&self, args: &ConvertArgs) -> Result<ConversionRequest, ConvertError> {
        let request = self.resolve(args)?;
        request.ensure_disjoint()?;
        Ok(request)
    }

    fn ignore_set(
        &self,
        request: &ConversionRequest,
        ignore: Option<&[PathBuf]>,
    ) -> Result<IgnoreSet, ConvertError> {
        let working_dir = paths::absolutize(&self.options.working_dir)?;
        match ignore {
            Some(list) => Ok(IgnoreSet::from_paths(&working_dir, list)),
            None => IgnoreSet::load(
                &working_dir,
                &self.options.ignore_file_name,
                &request.destination,
            ),
        }
    }

    #[cfg(feature = "parallel")]
    fn run<F>(&self, work: F) -> Result<ConversionOutcome, ConvertError>
    where
        F: FnOnce() -> ConversionOutcome + Send,
    {
        match self.options.max_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| ConvertError::ThreadPool(e.to_string()))?;
                Ok(pool.install(work))
            }
            None => Ok(work()),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run<F>(&self, work: F) -> Result<ConversionOutcome, ConvertError>
    where
        F: FnOnce() -> ConversionOutcome + Send,
    {
        Ok(work())
    }
}

struct Traversal<'a> {
    catalog: &'a EncodingCatalog,
    ignore: &'a IgnoreSet,
    output_root: &'a Path,
}

impl Traversal<'_> {
    fn visit(&self, request: ConversionRequest) -> ConversionOutcome {
        if self.ignore.contains(&request.source) {
            #[cfg(feature = "logging")]
            tracing::debug!("Ignored, copying as is: {}", request.source.display());
            return copier::copy_excluding(
                &request.source,
                &request.destination,
                Some(self.output_root),
            );
        }

        let metadata = match fs::symlink_metadata(&request.source) {
            Ok(metadata) => metadata,
            Err(_e) => {
                #[cfg(feature = "logging")]
                tracing::debug!("Skipping {}: {}", request.source.display(), _e);
                return ConversionOutcome::default();
            }
        };

        if metadata.is_file() {
            return file_outcome(self.catalog, &request);
        }

        if metadata.is_dir() {
            let request = request.with_destination(request.save_path());
            return match paths::children(&request.source) {
                Ok(children) => self.children(&request, children),
                Err(e) => {
                    report_failure(&e);
                    ConversionOutcome::default()
                }
            };
        }

        #[cfg(feature = "logging")]
        tracing::debug!("Skipping special file {}", request.source.display());
        ConversionOutcome::default()
    }

    /// Visits `children` of the directory `request.source`, whose output goes
    /// into `request.destination`.
    fn children(&self, request: &ConversionRequest, children: Vec<PathBuf>) -> ConversionOutcome {
        let children = children
            .into_iter()
            .filter(|child| *child != request.destination && child != self.output_root)
            .collect();
        fan_out(children, |child| self.visit(request.with_source(child)))
    }
}

/// Visits every child concurrently and sums the outcomes once all have settled.
#[cfg(feature = "parallel")]
pub(crate) fn fan_out<F>(children: Vec<PathBuf>, visit: F) -> ConversionOutcome
where
    F: Fn(PathBuf) -> ConversionOutcome + Send + Sync,
{
    children.into_par_iter().map(visit).sum()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn fan_out<F>(children: Vec<PathBuf>, visit: F) -> ConversionOutcome
where
    F: Fn(PathBuf) -> ConversionOutcome,
{
    children.into_iter().map(visit).sum()
}

pub(crate) fn report_failure(error: &ConvertError) {
    #[cfg(feature = "logging")]
    tracing::warn!("{}", error);
    #[cfg(not(feature = "logging"))]
    let _ = error;
}

#[cfg(feature = "logging")]
fn report_detection(converted: &ConvertedBuffer, path: &Path) {
    if converted.detected {
        tracing::info!(
            "Detected encoding '{}' (confidence: {:.0}%): {}",
            converted.encoding,
            converted.confidence * 100.0,
            path.display()
        );
    }
}

fn ensure_file(path: &Path) -> Result<(), ConvertError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| ConvertError::io(path, e))?;
    if metadata.is_file() {
        Ok(())
    } else {
        Err(ConvertError::NotAFile {
            path: path.to_path_buf(),
        })
    }
}

fn file_outcome(catalog: &EncodingCatalog, request: &ConversionRequest) -> ConversionOutcome {
    match convert_request_file(catalog, request) {
        Ok(true) => ConversionOutcome::converted(),
        Ok(false) => ConversionOutcome::copied(),
        Err(e) => {
            report_failure(&e);
            ConversionOutcome::failed()
        }
    }
}

/// Transcodes one file and writes it to its save path, falling back to a
/// verbatim copy when the content can't be transcoded.
fn convert_request_file(
    catalog: &EncodingCatalog,
    request: &ConversionRequest,
) -> Result<bool, ConvertError> {
    let save_path = request.save_path();
    if save_path == request.source {
        return Err(ConvertError::WriteError {
            path: save_path,
            source: io::Error::new(io::ErrorKind::AlreadyExists, "save path is the source file"),
        });
    }

    let converted = match transcode_file(
        catalog,
        &request.source,
        request.source_encoding,
        request.destination_encoding,
    ) {
        Ok(converted) => converted,
        Err(e) => {
            report_failure(&e);
            copier::copy_file(&request.source, &request.destination)?;
            #[cfg(feature = "logging")]
            tracing::info!("Created a copy of {}", request.source.display());
            return Ok(false);
        }
    };

    #[cfg(feature = "logging")]
    report_detection(&converted, &request.source);

    fs::create_dir_all(&request.destination).map_err(|source| ConvertError::WriteError {
        path: request.destination.clone(),
        source,
    })?;
    if let Err(source) = fs::write(&save_path, &converted.buffer) {
        // Never leave a truncated output behind.
        if save_path.is_file() {
            let _ = fs::remove_file(&save_path);
        }
        return Err(ConvertError::WriteError {
            path: save_path,
            source,
        });
    }
    Ok(true)
}

/// Read, reject binaries, resolve the source encoding, transcode.
fn transcode_file(
    catalog: &EncodingCatalog,
    path: &Path,
    source_encoding: Option<Charset>,
    destination_encoding: Charset,
) -> Result<ConvertedBuffer, ConvertError> {
    let mut file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
            path: path.to_path_buf(),
            source,
        },
        _ => ConvertError::ReadError {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|source| ConvertError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

    if catalog.is_binary(&bytes) {
        return Err(ConvertError::BinaryFileRejected {
            path: path.to_path_buf(),
        });
    }

    let (charset, confidence, detected) = match source_encoding {
        Some(charset) => (charset, 1.0, false),
        None => {
            let detection = catalog.detect(&bytes);
            let charset = Charset::for_label(detection.label).ok_or_else(|| {
                ConvertError::UnsupportedEncoding {
                    label: detection.label.to_string(),
                    path: Some(path.to_path_buf()),
                }
            })?;
            (charset, detection.confidence, true)
        }
    };

    let buffer = catalog
        .transcode(&bytes, charset, destination_encoding)
        .ok_or_else(|| ConvertError::TranscodeError {
            path: path.to_path_buf(),
            from: charset.name(),
            to: destination_encoding.name(),
        })?;

    Ok(ConvertedBuffer {
        buffer,
        encoding: charset.name(),
        confidence,
        detected,
    })
}
