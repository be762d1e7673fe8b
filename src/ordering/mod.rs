//! The four (plus one oracle) ordering algorithms and the shared cost model
//! and permutation machinery they're built from.

pub mod branch_bound;
pub mod brute;
pub mod checkpoint;
pub mod cost;
pub mod greedy;
pub mod perm;
pub mod priority_tree;
pub mod sbbu;

pub use branch_bound::{order_bb, BbResult};
pub use brute::{order_brute, MAX_BRUTE_EDGES};
pub use checkpoint::BbCheckpoint;
pub use cost::{cost_relax, order_cost};
pub use greedy::order_greedy;
pub use perm::BBPerm;
pub use priority_tree::{order_priority_tree, PtResult};
pub use sbbu::{order_sbbu, OrderResult};
