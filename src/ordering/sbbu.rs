//! SBBU baseline: sort edges by `(j, i)` ascending.

use crate::cost::Cost;
use crate::instance::{EdgeId, Instance};

use super::cost::order_cost;

/// Result of running a baseline or search ordering algorithm.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub order: Vec<EdgeId>,
    pub cost: Cost,
}

/// Sorts edges by ascending `(j, i)`, the fixed baseline every other solver
/// uses to seed its initial upper bound.
pub fn order_sbbu(instance: &Instance) -> OrderResult {
    let mut order = instance.edge_ids();
    order.sort_by_key(|&eid| instance.edge(eid).sort_key());
    let cost = order_cost(&order, instance, Cost::INFINITY);
    OrderResult { order, cost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sorts_by_j_then_i() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "5 20").unwrap();
        writeln!(f, "1 10").unwrap();
        writeln!(f, "2 10").unwrap();
        let inst = Instance::load(f.path()).unwrap();
        let result = order_sbbu(&inst);
        // eid1=(5,20), eid2=(1,10), eid3=(2,10) -> sorted by (j,i): eid2(1,10) < eid3(2,10) < eid1(5,20)
        assert_eq!(result.order, vec![EdgeId(2), EdgeId(3), EdgeId(1)]);
    }

    #[test]
    fn empty_instance_has_zero_cost() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let inst = Instance::load(f.path()).unwrap();
        let result = order_sbbu(&inst);
        assert!(result.order.is_empty());
        assert_eq!(result.cost, Cost::ZERO);
    }
}
