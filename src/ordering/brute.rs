//! Brute-force oracle: exhaustive permutation scan with no pruning at all,
//! used only as a ground truth in tests and for small instances.

use crate::cost::Cost;
use crate::error::{NmrError, NmrResult};
use crate::instance::Instance;

use super::cost::order_cost;
use super::perm::BBPerm;
use super::sbbu::OrderResult;

/// Hard cap on `|E|` for [`order_brute`]: factorial blowup makes anything
/// past this impractical even as a test oracle.
pub const MAX_BRUTE_EDGES: usize = 9;

/// Scans every permutation of `instance`'s edges via `BBPerm` with `prune()`
/// never called, keeping the minimum-cost one. Returns
/// [`NmrError::TooManyEdgesForBruteForce`] rather than silently running for
/// an impractical amount of time.
pub fn order_brute(instance: &Instance) -> NmrResult<OrderResult> {
    let n = instance.num_edges();
    if n > MAX_BRUTE_EDGES {
        return Err(NmrError::TooManyEdgesForBruteForce { n, limit: MAX_BRUTE_EDGES });
    }
    if n == 0 {
        return Ok(OrderResult { order: Vec::new(), cost: Cost::ZERO });
    }

    let mut perm = BBPerm::new(instance.edge_ids());
    let mut best_order = Vec::new();
    let mut best_cost = Cost::INFINITY;

    while perm.next().is_some() {
        if perm.is_complete() {
            let candidate = perm.current_order();
            let cost = order_cost(&candidate, instance, Cost::INFINITY);
            if cost < best_cost {
                best_cost = cost;
                best_order = candidate;
            }
        }
    }

    Ok(OrderResult { order: best_order, cost: best_cost })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::loader::Instance as Inst;
    use std::io::Write;

    #[test]
    fn finds_the_same_optimum_as_bb() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "3 10").unwrap();
        writeln!(f, "1 15").unwrap();
        writeln!(f, "8 15").unwrap();
        writeln!(f, "15 20").unwrap();
        let inst = Inst::load(f.path()).unwrap();
        let result = order_brute(&inst).unwrap();
        assert_eq!(result.cost, Cost::new(76));
    }

    #[test]
    fn empty_instance_is_trivial() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let inst = Inst::load(f.path()).unwrap();
        let result = order_brute(&inst).unwrap();
        assert!(result.order.is_empty());
        assert_eq!(result.cost, Cost::ZERO);
    }

    #[test]
    fn refuses_instances_past_the_size_guard() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        // 10 disjoint minimal prune edges -> 10 edges, over the MAX_BRUTE_EDGES=9 cap.
        let mut atom = 1u32;
        for _ in 0..10 {
            writeln!(f, "{} {}", atom, atom + 4).unwrap();
            atom += 6;
        }
        let inst = Inst::load(f.path()).unwrap();
        let err = order_brute(&inst).unwrap_err();
        assert!(matches!(err, NmrError::TooManyEdgesForBruteForce { n: 10, limit: 9 }));
    }
}
