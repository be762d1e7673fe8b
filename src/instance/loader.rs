//! Reads a `.nmr` edge list and builds the edge/segment tables.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{NmrError, NmrResult};

use super::edge::Edge;
use super::ids::EdgeId;
use super::segment::Segment;
use super::segment_builder::build_segments;

/// The edge and segment tables for one problem instance, immutable after
/// construction.
#[derive(Debug)]
pub struct Instance {
    /// Prune edges, dense-indexed by `EdgeId::index()`.
    pub edges: Vec<Edge>,
    /// Segments, dense-indexed by `SegmentId::index()`.
    pub segments: Vec<Segment>,
    /// Highest atom index referenced by any row (backbone or prune).
    pub nnodes: u32,
}

impl Instance {
    /// Parses `path`: one edge per line, first two whitespace-separated
    /// columns are 1-based atom indices `i j` with `i < j`. Extra columns
    /// are tolerated and ignored. Edges with `j <= i + 3` are backbone and
    /// discarded; the rest are prune edges, numbered in file order.
    pub fn load(path: impl AsRef<Path>) -> NmrResult<Instance> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut nnodes = 0u32;
        let mut prune_edges: Vec<Edge> = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let mut cols = trimmed.split_whitespace();
            let i: u32 = cols
                .next()
                .ok_or_else(|| NmrError::parse(path, line_no + 1, "missing first column"))?
                .parse()
                .map_err(|_| NmrError::parse(path, line_no + 1, "first column is not an integer"))?;
            let j: u32 = cols
                .next()
                .ok_or_else(|| NmrError::parse(path, line_no + 1, "missing second column"))?
                .parse()
                .map_err(|_| NmrError::parse(path, line_no + 1, "second column is not an integer"))?;

            if j <= i {
                return Err(NmrError::parse(
                    path,
                    line_no + 1,
                    format!("expected i < j, got i={i} j={j}"),
                ));
            }

            nnodes = nnodes.max(i).max(j);

            if j > i + 3 {
                let eid = EdgeId(prune_edges.len() as u32 + 1);
                prune_edges.push(Edge::new(eid, i, j));
            }
        }

        let segments = build_segments(&mut prune_edges);

        Ok(Instance {
            edges: prune_edges,
            segments,
            nnodes,
        })
    }

    pub fn edge(&self, eid: EdgeId) -> &Edge {
        &self.edges[eid.index()]
    }

    pub fn segment(&self, sid: super::ids::SegmentId) -> &Segment {
        &self.segments[sid.index()]
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// All edge ids in file order, the input key set for every solver.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.iter().map(|e| e.eid).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_nmr(rows: &[(u32, u32)]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for (i, j) in rows {
            writeln!(f, "{i} {j} 1.0 1.0 N CA ALA VAL", i = i, j = j).unwrap();
        }
        f
    }

    #[test]
    fn backbone_edges_are_discarded() {
        let f = write_nmr(&[(1, 2), (2, 4), (1, 8)]);
        let inst = Instance::load(f.path()).unwrap();
        assert_eq!(inst.num_edges(), 1);
        assert_eq!(inst.edges[0].i, 1);
        assert_eq!(inst.edges[0].j, 8);
    }

    #[test]
    fn nnodes_is_max_endpoint_including_backbone() {
        let f = write_nmr(&[(1, 2), (10, 14)]);
        let inst = Instance::load(f.path()).unwrap();
        assert_eq!(inst.nnodes, 14);
    }

    #[test]
    fn empty_instance_has_no_edges_or_segments() {
        let f = write_nmr(&[]);
        let inst = Instance::load(f.path()).unwrap();
        assert_eq!(inst.num_edges(), 0);
        assert_eq!(inst.num_segments(), 0);
    }

    #[test]
    fn malformed_row_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "not-a-number 8").unwrap();
        let err = Instance::load(f.path()).unwrap_err();
        assert!(matches!(err, NmrError::Parse { .. }));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "1 8 1.23e+00 1.23e+00 N CA ALA VAL").unwrap();
        let inst = Instance::load(f.path()).unwrap();
        assert_eq!(inst.num_edges(), 1);
    }
}
