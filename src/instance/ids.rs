//! Newtype identifiers for edges and segments.
//!
//! Kept distinct at the type level so a segment id can never be passed where
//! an edge id is expected, even though both are allocated from the same
//! `1..=n` sequence per instance.

use std::fmt;

/// Identifier of a prune edge, unique within one [`crate::instance::Instance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct EdgeId(pub u32);

/// Identifier of a segment, unique within one [`crate::instance::Instance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct SegmentId(pub u32);

impl EdgeId {
    /// Zero-based index into a dense `Vec` keyed by this id.
    #[inline]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl SegmentId {
    /// Zero-based index into a dense `Vec` keyed by this id.
    #[inline]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}
