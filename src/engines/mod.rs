//! Valuation engine implementations.

pub mod host;
pub mod refixing;
pub mod tree;

pub use host::host_unit_value;
pub use refixing::{RefixingSchedule, WA_SHARES_OUTSTANDING_FALLBACK};
pub use tree::{ConvertibleLatticeEngine, CrrLattice, EsoLatticeEngine, NODE_LOG_DEPTH};
