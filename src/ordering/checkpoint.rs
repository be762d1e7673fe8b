//! Versioned, atomically-written checkpoint for a suspended BB run.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NmrError, NmrResult};
use crate::instance::{EdgeId, SegmentId};

const CHECKPOINT_VERSION: u32 = 1;

/// On-disk snapshot of a BB run, enough to resume via `BBPerm::start_from`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BbCheckpoint {
    pub version: u32,
    pub idx: u64,
    pub order: Vec<u64>,
    pub order_opt: Vec<u64>,
    pub cost_ub: u128,
    /// `C`: per-segment coverage counters, as `(sid, count)` pairs.
    pub counters: Vec<(u64, u32)>,
    /// `U`: ids of segments still uncovered.
    pub uncovered: Vec<u64>,
}

impl BbCheckpoint {
    pub fn new(
        idx: isize,
        order: &[EdgeId],
        order_opt: &[EdgeId],
        cost_ub: u128,
        counters: &[(SegmentId, u32)],
        uncovered: &[SegmentId],
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            idx: idx.max(-1) as u64,
            order: order.iter().map(|e| e.0 as u64).collect(),
            order_opt: order_opt.iter().map(|e| e.0 as u64).collect(),
            cost_ub,
            counters: counters.iter().map(|&(sid, c)| (sid.0 as u64, c)).collect(),
            uncovered: uncovered.iter().map(|s| s.0 as u64).collect(),
        }
    }

    /// Writes to a temporary sibling file then renames into place, so a
    /// crash mid-write never leaves a half-written checkpoint at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> NmrResult<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let writer = BufWriter::new(file);
            bincode::serialize_into(writer, self)
                .map_err(|e| NmrError::checkpoint(e.to_string()))?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Loads and validates a checkpoint. Per the error-handling design, any
    /// read failure, deserialization error, or version mismatch is treated
    /// uniformly as "checkpoint missing" — callers fall back to a fresh
    /// solve rather than propagating the error.
    pub fn load(path: impl AsRef<Path>) -> Option<BbCheckpoint> {
        let file = File::open(path).ok()?;
        let reader = BufReader::new(file);
        let checkpoint: BbCheckpoint = bincode::deserialize_from(reader).ok()?;
        if checkpoint.version != CHECKPOINT_VERSION {
            log::warn!(
                "checkpoint version mismatch: found {}, expected {CHECKPOINT_VERSION}",
                checkpoint.version
            );
            return None;
        }
        Some(checkpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.ckpt");

        let checkpoint = BbCheckpoint::new(
            2,
            &[EdgeId(1), EdgeId(2), EdgeId(3)],
            &[EdgeId(3), EdgeId(1), EdgeId(2)],
            168,
            &[(SegmentId(1), 1), (SegmentId(2), 0)],
            &[SegmentId(2)],
        );
        checkpoint.save(&path).unwrap();

        let loaded = BbCheckpoint::load(&path).unwrap();
        assert_eq!(loaded.idx, 2);
        assert_eq!(loaded.order, vec![1, 2, 3]);
        assert_eq!(loaded.order_opt, vec![3, 1, 2]);
        assert_eq!(loaded.cost_ub, 168);
        assert_eq!(loaded.counters, vec![(1, 1), (2, 0)]);
        assert_eq!(loaded.uncovered, vec![2]);
    }

    #[test]
    fn missing_file_is_none_not_an_error() {
        assert!(BbCheckpoint::load("/nonexistent/path/to/checkpoint").is_none());
    }

    #[test]
    fn version_mismatch_is_treated_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.ckpt");
        let mut checkpoint = BbCheckpoint::new(0, &[], &[], u128::MAX, &[], &[]);
        checkpoint.version = CHECKPOINT_VERSION + 1;
        checkpoint.save(&path).unwrap();
        assert!(BbCheckpoint::load(&path).is_none());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.ckpt");
        BbCheckpoint::new(0, &[], &[], u128::MAX, &[], &[])
            .save(&path)
            .unwrap();
        assert!(!path.with_extension("tmp").exists());
        assert!(path.exists());
    }
}
