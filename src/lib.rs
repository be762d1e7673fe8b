//! # nmr-order
//!
//! Prune-edge ordering engine for NMR-based molecular distance geometry.
//!
//! Given a set of "prune edges" over a linear chain of atoms, this crate
//! computes an edge ordering that minimizes a multiplicative coverage cost,
//! used to bound the search tree of a downstream Branch-and-Prune molecular
//! reconstruction (not itself part of this crate).
//!
//! ## Components
//!
//! - [`instance`] — loads a `.nmr` file into edge/segment tables.
//! - [`cost`] — saturating cost arithmetic shared by the model and solvers.
//! - [`ordering`] — the cost model plus five ordering algorithms: `SBBU`,
//!   greedy, Branch-and-Bound, Priority-Tree, and a brute-force oracle.
//!
//! ## Example
//!
//! ```ignore
//! use nmr_order::instance::Instance;
//! use nmr_order::ordering::order_sbbu;
//!
//! let instance = Instance::load("chain.nmr")?;
//! let result = order_sbbu(&instance);
//! println!("SBBU cost: {}", result.cost);
//! ```

pub mod cost;
pub mod error;
pub mod instance;
pub mod ordering;

pub use error::{NmrError, NmrResult};
pub use instance::Instance;
