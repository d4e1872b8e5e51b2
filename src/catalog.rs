//! Codec lookup, binary classification and encoding detection.
//!
//! Encodings are resolved by their WHATWG labels through `encoding_rs`, so
//! `"latin1"`, `"ISO-8859-1"` and `"cp1252"` all name the same codec.
//! Detection combines BOM sniffing, ASCII/UTF-8 validation and `chardetng`.

use crate::error::ConvertError;
use crate::options::BinaryDetection;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, REPLACEMENT, UTF_8, UTF_16BE, UTF_16LE};
use std::borrow::Cow;
use std::fmt;

/// Bytes inspected by [`BinaryDetection::Simple`].
const SIMPLE_SNIFF_LEN: usize = 4096;
/// Confidence reported for non-ASCII input that is valid UTF-8.
const UTF8_CONFIDENCE: f32 = 0.99;
/// Upper bound for statistical guesses; only a BOM or explicit label is certain.
const GUESS_CEILING: f32 = 0.9;

/// A codec known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset(&'static Encoding);

impl Charset {
    pub fn utf8() -> Self {
        Self(UTF_8)
    }

    /// Looks up a label case-insensitively, ignoring surrounding whitespace.
    ///
    /// Labels that map to the `replacement` pseudo-encoding are rejected:
    /// that codec can only produce errors.
    pub fn for_label(label: &str) -> Option<Self> {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) if encoding != REPLACEMENT => Some(Self(encoding)),
            _ => None,
        }
    }

    /// Canonical name of the codec, e.g. `windows-1252` for `latin1`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.0
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of auto-detection: the most likely label and how sure we are of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub label: &'static str,
    /// In `0.0..=1.0`.
    pub confidence: f32,
}

/// Wraps the codecs, the binary classifier and the detector behind one API.
#[derive(Debug, Clone, Copy)]
pub struct EncodingCatalog {
    binary_detection: BinaryDetection,
}

impl Default for EncodingCatalog {
    fn default() -> Self {
        Self::new(BinaryDetection::Accurate)
    }
}

impl EncodingCatalog {
    pub fn new(binary_detection: BinaryDetection) -> Self {
        Self { binary_detection }
    }

    pub fn is_known(&self, label: &str) -> bool {
        Charset::for_label(label).is_some()
    }

    /// Validates a label, failing with [`ConvertError::UnsupportedEncoding`].
    pub fn charset(&self, label: &str) -> Result<Charset, ConvertError> {
        Charset::for_label(label).ok_or_else(|| ConvertError::unsupported(label))
    }

    pub fn is_binary(&self, bytes: &[u8]) -> bool {
        match self.binary_detection {
            BinaryDetection::Simple => bytes[..bytes.len().min(SIMPLE_SNIFF_LEN)].contains(&0),
            BinaryDetection::Accurate => content_inspector::inspect(bytes).is_binary(),
            BinaryDetection::None => false,
        }
    }

    /// Guesses the encoding of `bytes`.
    pub fn detect(&self, bytes: &[u8]) -> Detection {
        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            return Detection {
                label: encoding.name(),
                confidence: 1.0,
            };
        }
        if Encoding::ascii_valid_up_to(bytes) == bytes.len() {
            return Detection {
                label: UTF_8.name(),
                confidence: 1.0,
            };
        }
        if Encoding::utf8_valid_up_to(bytes) == bytes.len() {
            return Detection {
                label: UTF_8.name(),
                confidence: UTF8_CONFIDENCE,
            };
        }

        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        let guess = detector.guess(None, false);

        let (text, _) = guess.decode_without_bom_handling(bytes);
        let total = text.chars().count().max(1);
        let replaced = text
            .chars()
            .filter(|&c| c == char::REPLACEMENT_CHARACTER)
            .count();
        let clean = (total - replaced) as f32 / total as f32;
        Detection {
            label: guess.name(),
            confidence: GUESS_CEILING * clean,
        }
    }

    /// Strictly decodes `bytes`, dropping a BOM that belongs to `charset`.
    ///
    /// Returns `None` if the input is malformed for `charset`.
    pub fn decode<'a>(&self, bytes: &'a [u8], charset: Charset) -> Option<Cow<'a, str>> {
        let (text, had_errors) = charset.0.decode_with_bom_removal(bytes);
        if had_errors { None } else { Some(text) }
    }

    /// Encodes `text`, returning `None` if some character has no mapping.
    pub fn encode<'a>(&self, text: &'a str, charset: Charset) -> Option<Cow<'a, [u8]>> {
        // encoding_rs decodes UTF-16 but never encodes to it.
        if charset.0 == UTF_16LE {
            return Some(Cow::Owned(
                text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            ));
        }
        if charset.0 == UTF_16BE {
            return Some(Cow::Owned(
                text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            ));
        }
        let (bytes, _, had_errors) = charset.0.encode(text);
        if had_errors { None } else { Some(bytes) }
    }

    /// Decodes with `from` then encodes with `to`.
    pub fn transcode(&self, bytes: &[u8], from: Charset, to: Charset) -> Option<Vec<u8>> {
        let text = self.decode(bytes, from)?;
        let encoded = self.encode(&text, to)?;
        Some(encoded.into_owned())
    }
}
