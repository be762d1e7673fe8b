//! `order_cost` and `cost_relax`: the objective and its lower-bound relaxation.

use std::collections::BTreeSet;

use crate::cost::Cost;
use crate::instance::{EdgeId, Instance, SegmentId};

/// Cost of a complete or partial edge ordering.
///
/// Walks `order`, keeping a running set `paid` of segments already covered.
/// Each edge pays the product of the weights of the segments it covers for
/// the first time; an edge that covers nothing new pays `0`, not `1` — the
/// asymmetry the cost model depends on. Returns early with [`Cost::INFINITY`]
/// once the running total would reach `cost_ub`.
pub fn order_cost(order: &[EdgeId], instance: &Instance, cost_ub: Cost) -> Cost {
    let mut paid: BTreeSet<SegmentId> = BTreeSet::new();
    let mut total = Cost::ZERO;

    for &eid in order {
        let edge = instance.edge(eid);
        let mut marginal = Cost::new(1);
        let mut newly_covered = false;
        for &sid in &edge.sid {
            if paid.insert(sid) {
                newly_covered = true;
                marginal = marginal.saturating_mul(instance.segment(sid).weight());
            }
        }
        if newly_covered {
            total = total.saturating_add(marginal);
        }
        if total >= cost_ub {
            return Cost::INFINITY;
        }
    }

    total
}

/// Lower-bound contribution of the segments in `uncovered`: each must be paid
/// at least its own weight by some future edge.
pub fn cost_relax(uncovered: &BTreeSet<SegmentId>, instance: &Instance) -> Cost {
    uncovered
        .iter()
        .fold(Cost::ZERO, |acc, &sid| acc.saturating_add(instance.segment(sid).weight()))
}
