//! Deal input, per-security dispatch, and portfolio aggregation.

pub mod aggregate;
pub mod deal;

pub use aggregate::{price_deal, price_security, DealResult, SecurityFailure, SecurityReport};
pub use deal::{Deal, DealSecurity};
