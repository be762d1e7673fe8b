//! Branch-and-Bound solver: drives `BBPerm` with incremental coverage
//! counters, an upper bound seeded from SBBU, and a lower bound from the
//! uncovered-segment relaxation.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::cost::Cost;
use crate::instance::{EdgeId, Instance, SegmentId};

use super::checkpoint::BbCheckpoint;
use super::cost::{cost_relax, order_cost};
use super::perm::BBPerm;
use super::sbbu::{order_sbbu, OrderResult};

/// Result of a (possibly timed-out) BB run.
#[derive(Debug, Clone)]
pub struct BbResult {
    pub order: Vec<EdgeId>,
    pub cost: Cost,
    pub timeout: bool,
}

/// BB's own mirror of the permutation under construction, kept one step
/// behind `BBPerm`'s internal order so rewinds can diff against it.
struct BbState {
    mirror: Vec<Option<EdgeId>>,
    idx: isize,
    counters: Vec<u32>,
    uncovered: BTreeSet<SegmentId>,
    partial_cost: Cost,
}

impl BbState {
    fn new(n_edges: usize, n_segments: usize, all_segments: impl Iterator<Item = SegmentId>) -> Self {
        Self {
            mirror: vec![None; n_edges],
            idx: -1,
            counters: vec![0; n_segments],
            uncovered: all_segments.collect(),
            partial_cost: Cost::ZERO,
        }
    }

    /// Undoes every mirror entry that no longer matches `perm`'s internal
    /// order, starting from the current cursor and working backward. This
    /// touches only the abandoned suffix: once an entry matches, the loop
    /// stops, since everything below it is still part of the live prefix.
    fn rewind(&mut self, perm: &BBPerm, instance: &Instance) {
        while self.idx >= 0 && perm.order_slots()[self.idx as usize] != self.mirror[self.idx as usize] {
            let eid = self.mirror[self.idx as usize]
                .take()
                .expect("mirror slot below idx is always occupied");
            let mut cost_edge = Cost::new(1);
            let mut any = false;
            for &sid in &instance.edge(eid).sid {
                self.counters[sid.index()] -= 1;
                if self.counters[sid.index()] == 0 {
                    any = true;
                    cost_edge = cost_edge.saturating_mul(instance.segment(sid).weight());
                    self.uncovered.insert(sid);
                }
            }
            if any {
                self.partial_cost = self.partial_cost.saturating_sub(cost_edge);
            }
            self.idx -= 1;
        }
    }

    fn append(&mut self, eid: EdgeId, idx: isize, instance: &Instance) {
        self.mirror[idx as usize] = Some(eid);
        let mut cost_edge = Cost::new(1);
        let mut any = false;
        for &sid in &instance.edge(eid).sid {
            self.counters[sid.index()] += 1;
            if self.counters[sid.index()] == 1 {
                any = true;
                cost_edge = cost_edge.saturating_mul(instance.segment(sid).weight());
                self.uncovered.remove(&sid);
            }
        }
        if any {
            self.partial_cost = self.partial_cost.saturating_add(cost_edge);
        }
        self.idx = idx;
    }

    fn counters_snapshot(&self) -> Vec<(SegmentId, u32)> {
        self.counters
            .iter()
            .enumerate()
            .map(|(i, &count)| (SegmentId(i as u32 + 1), count))
            .collect()
    }
}

/// Runs exhaustive Branch-and-Bound over all edge permutations, pruning
/// with `cost_relax`. `checkpoint_path`, if given, is consulted on entry (to
/// resume an interrupted run) and written to on timeout.
pub fn order_bb(instance: &Instance, tmax: Duration, checkpoint_path: Option<&Path>) -> BbResult {
    let n = instance.num_edges();
    if n == 0 {
        return BbResult {
            order: Vec::new(),
            cost: Cost::ZERO,
            timeout: false,
        };
    }

    let OrderResult { order: sbbu_order, cost: sbbu_cost } = order_sbbu(instance);
    let mut order_opt = sbbu_order;
    let mut cost_ub = sbbu_cost;

    let mut perm = BBPerm::new(instance.edge_ids());
    let mut state = BbState::new(n, instance.num_segments(), instance.segments.iter().map(|s| s.sid));

    if let Some(path) = checkpoint_path {
        if let Some(ckpt) = BbCheckpoint::load(path) {
            let prefix: Vec<EdgeId> = ckpt.order.iter().map(|&v| EdgeId(v as u32)).collect();
            perm.start_from(ckpt.idx as isize, &prefix);
            order_opt = ckpt.order_opt.iter().map(|&v| EdgeId(v as u32)).collect();
            cost_ub = Cost::new(ckpt.cost_ub);
            for (i, &eid) in prefix.iter().enumerate() {
                state.mirror[i] = Some(eid);
            }
            state.idx = ckpt.idx as isize;
            for &(sid_raw, count) in &ckpt.counters {
                state.counters[SegmentId(sid_raw as u32).index()] = count;
            }
            state.uncovered = ckpt.uncovered.iter().map(|&sid| SegmentId(sid as u32)).collect();
            state.partial_cost = order_cost(&prefix, instance, Cost::INFINITY);
            log::info!("resumed BB from checkpoint at idx {}", ckpt.idx);
        }
    }

    let start = Instant::now();
    let mut timeout = false;

    let mut next_eid = perm.next();
    while let Some(eid) = next_eid {
        state.rewind(&perm, instance);
        state.append(eid, perm.idx(), instance);
        let cost_lb = state.partial_cost.saturating_add(cost_relax(&state.uncovered, instance));

        if start.elapsed() >= tmax {
            timeout = true;
            if let Some(path) = checkpoint_path {
                let ckpt = BbCheckpoint::new(
                    perm.idx(),
                    &perm.current_order(),
                    &order_opt,
                    cost_ub.0,
                    &state.counters_snapshot(),
                    &state.uncovered.iter().copied().collect::<Vec<_>>(),
                );
                if let Err(err) = ckpt.save(path) {
                    log::warn!("failed to save BB checkpoint: {err}");
                }
            }
            break;
        }

        if cost_lb >= cost_ub {
            perm.prune();
        } else if perm.is_complete() {
            cost_ub = cost_lb;
            order_opt = perm.current_order();
        }

        next_eid = perm.next();
    }

    BbResult {
        order: order_opt,
        cost: cost_ub,
        timeout,
    }
}
