//! Greedy baseline: repeatedly pick the edge of minimum marginal cost.

use std::collections::BTreeSet;

use crate::cost::Cost;
use crate::instance::{EdgeId, Instance, SegmentId};

use super::cost::order_cost;
use super::sbbu::OrderResult;

/// Marginal cost of covering `edge`'s segments not already in `paid`.
fn marginal_cost(edge_sid: &BTreeSet<SegmentId>, paid: &BTreeSet<SegmentId>, instance: &Instance) -> Cost {
    let mut cost = Cost::new(1);
    let mut any_new = false;
    for sid in edge_sid {
        if !paid.contains(sid) {
            any_new = true;
            cost = cost.saturating_mul(instance.segment(*sid).weight());
        }
    }
    if any_new {
        cost
    } else {
        Cost::ZERO
    }
}

/// Greedily selects, at each step, the remaining edge with the smallest
/// marginal cost (ties broken by ascending edge id for determinism).
pub fn order_greedy(instance: &Instance) -> OrderResult {
    let mut remaining: Vec<EdgeId> = instance.edge_ids();
    let mut paid: BTreeSet<SegmentId> = BTreeSet::new();
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_cost = marginal_cost(&instance.edge(remaining[0]).sid, &paid, instance);
        for (idx, &eid) in remaining.iter().enumerate().skip(1) {
            let cost = marginal_cost(&instance.edge(eid).sid, &paid, instance);
            if cost < best_cost {
                best_cost = cost;
                best_idx = idx;
            }
        }
        let chosen = remaining.remove(best_idx);
        for &sid in &instance.edge(chosen).sid {
            paid.insert(sid);
        }
        order.push(chosen);
    }

    let cost = order_cost(&order, instance, Cost::INFINITY);
    OrderResult { order, cost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::loader::Instance as Inst;
    use std::io::Write;

    #[test]
    fn disjoint_edges_sum_their_segment_weights() {
        // Two non-overlapping minimal prune edges, each covering its own
        // 2-atom segment (weight 4); no edge ordering can do better.
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "1 5").unwrap();
        writeln!(f, "10 14").unwrap();
        let inst = Inst::load(f.path()).unwrap();
        let result = order_greedy(&inst);
        assert_eq!(result.cost, Cost::new(4) + Cost::new(4));
    }

    #[test]
    fn visits_every_edge_exactly_once() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "3 10").unwrap();
        writeln!(f, "1 15").unwrap();
        writeln!(f, "8 15").unwrap();
        writeln!(f, "15 20").unwrap();
        let inst = Inst::load(f.path()).unwrap();
        let result = order_greedy(&inst);
        let mut sorted = result.order.clone();
        sorted.sort();
        assert_eq!(sorted, vec![EdgeId(1), EdgeId(2), EdgeId(3), EdgeId(4)]);
    }
}
