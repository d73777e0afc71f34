//! Tree-based valuation engines.

pub mod convertible;
pub mod eso;
pub mod lattice;

pub use convertible::{ConvertibleLatticeEngine, NODE_LOG_DEPTH};
pub use eso::EsoLatticeEngine;
pub use lattice::CrrLattice;
