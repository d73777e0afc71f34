//! Mezzanine is a valuation library for hybrid equity-linked securities —
//! redeemable convertible preferred stock (RCPS), convertible bonds (CB),
//! convertible preferred stock (CPS), and employee stock options (ESO) —
//! priced on a common Cox-Ross-Rubinstein binomial lattice with a
//! host/derivative decomposition and deal-level aggregation.
//!
//! Each convertible is split into a straight *host* (coupons plus
//! redemption discounted on the risky curve) and an embedded
//! *derivative* (the residual attributable to convertibility, early
//! exercise, and anti-dilution refixing). The lattice discounts the
//! debt and equity legs asymmetrically, applies the holder/issuer
//! decision cascade at every node, and rewrites the conversion price
//! along a pre-computed refixing schedule. ESOs share the tree with a
//! vesting gate, a behavioral exercise boundary, and per-step
//! employee-attrition decay.
//!
//! References used across modules:
//! - Cox, Ross and Rubinstein (1979) for the lattice parameterization.
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.),
//!   convertible and employee-option chapters.
//! - Tsiveriotis and Fernandes (1998) for the split debt/equity
//!   discounting of convertibles.
//!
//! Numerical considerations:
//! - The weekly grid pins its last node to the maturity date, so the
//!   terminal stub may be short while the lattice step stays uniform.
//! - The zero bootstrap is the identity on annually compounded yields,
//!   a documented V1 approximation.
//! - The CRR up-probability is intentionally not clamped; see
//!   [`engines::CrrLattice::up_probability`].
//!
//! # Feature Flags
//! - `parallel`: rayon-powered fan-out of the per-security loop in
//!   [`portfolio::price_deal`].
//!
//! # Quick Start
//! Value a convertible bond:
//! ```rust
//! use chrono::NaiveDate;
//! use mezzanine::engines::ConvertibleLatticeEngine;
//! use mezzanine::instruments::{
//!     AntiDilution, ConvertibleKind, ConvertibleTerms, Participation,
//! };
//! use mezzanine::market::Market;
//!
//! let market = Market::builder()
//!     .valuation_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
//!     .spot(15_000.0)
//!     .volatility(0.35)
//!     .risk_free_rate(0.035)
//!     .credit_spread(0.02)
//!     .build()
//!     .unwrap();
//!
//! let terms = ConvertibleTerms {
//!     maturity_date: NaiveDate::from_ymd_opt(2028, 1, 1).unwrap(),
//!     face_total: 1_000_000_000.0,
//!     share_count: 0.0,
//!     coupon_rate: 0.02,
//!     dividend_rate: 0.0,
//!     redemption_premium: 0.05,
//!     initial_conversion_price: 20_000.0,
//!     conversion_ratio_override: None,
//!     anti_dilution: AntiDilution::None,
//!     refixing_floor: None,
//!     reset_events: Vec::new(),
//!     participation: Participation::NonParticipating,
//!     participation_cap: None,
//!     issuer_call: None,
//!     holder_put: None,
//!     stepwise_risk_free: None,
//!     stepwise_spread: None,
//! };
//!
//! let valuation = ConvertibleLatticeEngine::default()
//!     .price(ConvertibleKind::Cb, &terms, &market)
//!     .unwrap();
//! assert!(valuation.fair_value_total > 0.0);
//! assert!(valuation.fair_value_deriv.abs() < valuation.fair_value_host);
//! ```
//!
//! Interpolate a market curve:
//! ```rust
//! use mezzanine::rates::TenorCurve;
//!
//! let curve = TenorCurve::new(vec![(1.0, 0.03), (5.0, 0.04)]);
//! let y = curve.yield_at(3.0);
//! assert!(y > 0.03 && y < 0.04);
//! ```

pub mod core;
pub mod engines;
pub mod instruments;
pub mod market;
pub mod portfolio;
pub mod rates;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::{ConvertibleLatticeEngine, EsoLatticeEngine};
    pub use crate::instruments::*;
    pub use crate::market::*;
    pub use crate::portfolio::*;
    pub use crate::rates::*;
}
