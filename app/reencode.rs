//! Command-line interface for reencode.
//!
//! This binary converts a file or a directory tree between character encodings
//! and prints how many files were converted, copied and failed.

use clap::{Parser, ValueEnum};
use reencode::{BinaryDetection, ConvertArgs, ConvertBuilder, Converter, output};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::exit;

/// Positional placeholder meaning "use the default".
const DEFAULT_PLACEHOLDER: &str = "-u";

/// reencode — re-encode files into a mirrored output tree
#[derive(Parser)]
#[command(name = "reencode", version, about, long_about = None)]
struct Cli {
    /// Encoding of the source files ("-u" to auto-detect per file)
    #[arg(allow_hyphen_values = true)]
    from_encoding: OsString,

    /// Encoding to convert to ("-u" for UTF-8)
    #[arg(allow_hyphen_values = true)]
    to_encoding: OsString,

    /// File or directory to convert ("-u" for the current directory)
    #[arg(allow_hyphen_values = true)]
    path_to_convert: OsString,

    /// Directory to save the results into (default ./CONVERTED)
    #[arg(allow_hyphen_values = true)]
    save_dir: Option<OsString>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pretty output (indented JSON)
    #[arg(short, long)]
    pretty: bool,

    /// Binary detection strategy
    #[arg(long, default_value = "accurate", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// Worker threads (unbounded if not set)
    #[arg(long)]
    threads: Option<usize>,

    /// Paths to copy instead of converting (can be repeated; replaces .convIgnore)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => output::OutputFormat::Json,
            OutputFormat::Text => output::OutputFormat::Text,
        }
    }
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

fn positional(value: OsString) -> Option<OsString> {
    (value != DEFAULT_PLACEHOLDER).then_some(value)
}

impl Cli {
    fn into_parts(self) -> (Converter, ConvertArgs, Vec<PathBuf>, OutputFormat, bool) {
        let mut builder = ConvertBuilder::new().binary_detection(self.binary_detection);
        builder = if let Some(threads) = self.threads {
            builder.max_threads(threads)
        } else {
            builder.unbounded_threads()
        };

        let args = ConvertArgs {
            source: positional(self.path_to_convert),
            destination: self.save_dir.and_then(positional),
            source_encoding: positional(self.from_encoding),
            destination_encoding: positional(self.to_encoding),
        };

        (
            Converter::new(builder.build()),
            args,
            self.ignore,
            self.format,
            self.pretty,
        )
    }
}

#[cfg(feature = "logging")]
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    init_logging();

    let (converter, args, ignore, format, pretty) = cli.into_parts();
    let ignore = (!ignore.is_empty()).then_some(ignore.as_slice());

    match converter.convert(&args, ignore) {
        Ok(outcome) => println!("{}", output::format_outcome(&outcome, format.into(), pretty)),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}
