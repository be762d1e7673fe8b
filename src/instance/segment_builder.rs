//! Derives segments from a set of prune edges and cross-links them.
//!
//! Mirrors `NMR.segments` in the original Python solver: walk the sorted
//! union of covered atoms, group consecutive atoms with identical covering
//! sets into one segment, then link every `(edge, segment)` pair where the
//! edge covers the segment.

use std::collections::{BTreeMap, BTreeSet};

use super::edge::Edge;
use super::ids::SegmentId;
use super::segment::Segment;

/// Builds segments for `edges` and populates `edge.sid` / `segment.eid`.
///
/// `edges` must already be restricted to prune edges (`j >= i + 4`).
pub fn build_segments(edges: &mut [Edge]) -> Vec<Segment> {
    if edges.is_empty() {
        return Vec::new();
    }

    // I: every atom covered by some edge, with the set of edges covering it.
    let mut covered: BTreeMap<u32, BTreeSet<usize>> = BTreeMap::new();
    for (idx, edge) in edges.iter().enumerate() {
        for atom in (edge.i + 3)..=edge.j {
            covered.entry(atom).or_default().insert(idx);
        }
    }

    let atoms: Vec<u32> = covered.keys().copied().collect();

    let mut segments = Vec::new();
    let mut next_sid = 1u32;

    let mut run_start = atoms[0];
    let mut run_cover = &covered[&run_start];
    let mut run_end = run_start;

    for &atom in &atoms[1..] {
        let cover = &covered[&atom];
        if cover == run_cover {
            run_end = atom;
        } else {
            segments.push(Segment::new(SegmentId(next_sid), run_start, run_end));
            next_sid += 1;
            run_start = atom;
            run_end = atom;
            run_cover = cover;
        }
    }
    segments.push(Segment::new(SegmentId(next_sid), run_start, run_end));

    // Cross-link: O(|S| * |E|).
    for segment in &mut segments {
        for edge in edges.iter_mut() {
            if edge.covers(segment.i, segment.j) {
                edge.sid.insert(segment.sid);
                segment.eid.insert(edge.eid);
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ids::EdgeId;

    fn edge(eid: u32, i: u32, j: u32) -> Edge {
        Edge::new(EdgeId(eid), i, j)
    }

    #[test]
    fn test_a_segments() {
        // Same layout as the `testA` scenario in tests/scenarios.rs: one edge
        // spanning atoms 4..15 overlapped by two narrower edges, plus an
        // isolated tail edge, producing segments (4,5) (6,10) (11,15) (18,20).
        let mut edges = vec![
            edge(1, 3, 10),
            edge(2, 1, 15),
            edge(3, 8, 15),
            edge(4, 15, 20),
        ];
        let segments = build_segments(&mut edges);
        let ranges: Vec<(u32, u32)> = segments.iter().map(|s| (s.i, s.j)).collect();
        assert_eq!(ranges, vec![(4, 5), (6, 10), (11, 15), (18, 20)]);
    }

    #[test]
    fn every_segment_has_an_incident_edge() {
        let mut edges = vec![edge(1, 1, 8), edge(2, 2, 20)];
        let segments = build_segments(&mut edges);
        for s in &segments {
            assert!(!s.eid.is_empty());
        }
    }

    #[test]
    fn cross_links_are_bidirectional() {
        let mut edges = vec![edge(1, 1, 8), edge(2, 2, 20)];
        let segments = build_segments(&mut edges);
        for edge in &edges {
            for &sid in &edge.sid {
                let seg = segments.iter().find(|s| s.sid == sid).unwrap();
                assert!(seg.eid.contains(&edge.eid));
            }
        }
    }

    #[test]
    fn idempotent_up_to_ids() {
        let mut edges_a = vec![edge(1, 1, 8), edge(2, 2, 20), edge(3, 11, 15)];
        let mut edges_b = edges_a.clone();
        let segs_a = build_segments(&mut edges_a);
        let segs_b = build_segments(&mut edges_b);
        let ranges_a: Vec<(u32, u32)> = segs_a.iter().map(|s| (s.i, s.j)).collect();
        let ranges_b: Vec<(u32, u32)> = segs_b.iter().map(|s| (s.i, s.j)).collect();
        assert_eq!(ranges_a, ranges_b);
    }

    #[test]
    fn no_prune_edges_yields_no_segments() {
        let mut edges: Vec<Edge> = Vec::new();
        assert!(build_segments(&mut edges).is_empty());
    }
}
