//! Comparator
//!
//! Total order over byte-sequence keys. Fixed when a buffer is created and
//! assumed to match the order of any snapshot stream merged with it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::TxnBufError;

/// Key order used by buffers, cursors and the union iterator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparator {
    /// Byte-lexicographic order
    #[default]
    Ascending,

    /// Reverse byte-lexicographic order
    Descending,
}

impl Comparator {
    /// Compare two keys under this order
    #[inline]
    pub fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        match self {
            Comparator::Ascending => a.cmp(b),
            Comparator::Descending => b.cmp(a),
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, Comparator::Ascending)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Ascending => write!(f, "asc"),
            Comparator::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for Comparator {
    type Err = TxnBufError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Comparator::Ascending),
            "desc" | "descending" => Ok(Comparator::Descending),
            other => Err(TxnBufError::Config(format!("unknown key order '{}'", other))),
        }
    }
}
