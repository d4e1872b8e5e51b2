//! # Reencode
//!
//! `reencode` converts a file or a whole directory tree from one character encoding
//! to another, writing the results into a mirrored output tree and leaving the source
//! untouched.
//!
//! Each regular file is read into memory, rejected if it looks binary, decoded with the
//! given (or auto-detected) source encoding and re-encoded with the destination
//! encoding. Files that can't be transcoded are copied verbatim instead, and paths
//! listed in the `.convIgnore` file of the working directory are always copied as is.
//! Every file ends up counted exactly once as converted, copied or failed.
//!
//! # Features
//!
//! - `parallel`: Converts sibling entries concurrently using Rayon.
//! - `logging`: Reports detected encodings and recovered failures via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use reencode::{ConvertArgs, ConvertBuilder, Converter};
//!
//! let converter = Converter::new(ConvertBuilder::new().working_dir(".").build());
//! let args = ConvertArgs::new()
//!     .source("legacy-docs")
//!     .destination("converted")
//!     .source_encoding("latin1")
//!     .destination_encoding("utf-8");
//!
//! let outcome = converter.convert(&args, None).expect("Failed to convert");
//! println!(
//!     "converted {}, copied {}, failed {}",
//!     outcome.converted, outcome.copied, outcome.failed
//! );
//! ```

mod catalog;
mod copier;
mod engine;
mod error;
mod ignore;
mod options;
mod params;
mod paths;
mod types;

pub mod output;

pub use catalog::{Charset, Detection, EncodingCatalog};
pub use copier::{copy_entry, copy_file};
pub use engine::Converter;
pub use error::ConvertError;
pub use ignore::IgnoreSet;
pub use options::{BinaryDetection, ConvertBuilder, ConvertOptions};
pub use params::{ConversionRequest, ConvertArgs, ParamResolver};
pub use types::{ConversionOutcome, ConvertedBuffer};
