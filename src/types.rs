use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Per-entry counts of a traversal or sub-traversal.
///
/// Every file visited lands in exactly one bucket; directories contribute the
/// sum of their children and nothing for themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub converted: usize,
    pub copied: usize,
    pub failed: usize,
}

impl ConversionOutcome {
    pub fn converted() -> Self {
        Self {
            converted: 1,
            ..Self::default()
        }
    }

    pub fn copied() -> Self {
        Self {
            copied: 1,
            ..Self::default()
        }
    }

    pub fn failed() -> Self {
        Self {
            failed: 1,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.converted + self.copied + self.failed
    }
}

impl Add for ConversionOutcome {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            converted: self.converted + rhs.converted,
            copied: self.copied + rhs.copied,
            failed: self.failed + rhs.failed,
        }
    }
}

impl AddAssign for ConversionOutcome {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ConversionOutcome {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

// `total` is derived, so it is written out but never stored.
impl Serialize for ConversionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ConversionOutcome", 4)?;
        state.serialize_field("converted", &self.converted)?;
        state.serialize_field("copied", &self.copied)?;
        state.serialize_field("failed", &self.failed)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

/// Re-encoded content of one file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedBuffer {
    pub buffer: Vec<u8>,
    /// Canonical name of the source encoding that was used.
    pub encoding: &'static str,
    /// `1.0` when the source encoding was supplied rather than detected.
    pub confidence: f32,
    /// Whether `encoding` came from auto-detection.
    pub detected: bool,
}
