//! Segments: maximal atom runs covered by an identical set of prune edges.

use std::collections::BTreeSet;

use crate::cost::{segment_weight, Cost};

use super::ids::{EdgeId, SegmentId};

/// A maximal contiguous atom range `[i, j]` covered by the same prune edges.
#[derive(Debug, Clone)]
pub struct Segment {
    pub sid: SegmentId,
    pub i: u32,
    pub j: u32,
    pub eid: BTreeSet<EdgeId>,
}

impl Segment {
    pub fn new(sid: SegmentId, i: u32, j: u32) -> Self {
        Self {
            sid,
            i,
            j,
            eid: BTreeSet::new(),
        }
    }

    /// `2^(j-i+1)`, the cost paid by whichever edge covers this segment first.
    pub fn weight(&self) -> Cost {
        segment_weight(self.i, self.j)
    }
}
