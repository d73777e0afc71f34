//! Common domain types and library-wide result/error structures.

use chrono::NaiveDate;

use crate::rates::CurveSource;

/// Side of the book a security sits on.
///
/// The engines always value the long (holder) position; the sign is
/// applied exactly once when a valuation is attributed to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Position {
    /// Long the security.
    Holder,
    /// Short the security (issuer's books).
    Issuer,
}

impl Position {
    /// Returns +1.0 for holders and -1.0 for issuers.
    pub fn sign(self) -> f64 {
        match self {
            Self::Holder => 1.0,
            Self::Issuer => -1.0,
        }
    }
}

/// Decision taken at a lattice node during backward induction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NodeDecision {
    /// Continuation value retained.
    Hold,
    /// Holder converts voluntarily.
    Convert,
    /// Issuer calls and the holder takes cash.
    Called,
    /// Issuer calls and the holder is forced into conversion.
    CalledForcedConversion,
    /// Holder puts the security back at the put price.
    Put,
    /// Redemption at maturity.
    MaturityRedeem,
    /// Conversion at maturity.
    MaturityConvert,
    /// Participating payoff taken at maturity.
    MaturityParticipate,
    /// Option not yet vested; exercise unavailable.
    Unvested,
    /// Early exercise at the behavioral share-price boundary.
    ExerciseSuboptimal,
    /// In-the-money exercise at option maturity.
    MaturityExercise,
    /// Option lapses worthless at maturity.
    MaturityLapse,
}

/// Sampled state of a single lattice node.
///
/// Logs are captured for `t <= min(N, 5)`; they are a diagnostic
/// payload, not a stable interface.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeLog {
    /// Time step of the node.
    pub step: usize,
    /// Up-move count within the step.
    pub index: usize,
    /// Share price at the node.
    pub spot: f64,
    /// Debt-leg value carried at the node.
    pub debt: f64,
    /// Equity-leg value carried at the node.
    pub equity: f64,
    /// Decision taken at the node.
    pub decision: NodeDecision,
    /// Effective conversion price at the step, when applicable.
    pub conversion_price: Option<f64>,
}

/// Scalar diagnostics attached to every valuation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValuationMeta {
    /// Number of lattice steps `N`.
    pub steps: usize,
    /// Uniform lattice step in years.
    pub dt: f64,
    /// CRR up factor.
    pub up: f64,
    /// CRR down factor.
    pub down: f64,
    /// Valuation date.
    pub valuation_date: NaiveDate,
    /// Maturity date.
    pub maturity_date: NaiveDate,
    /// Which input produced the stepwise discount arrays.
    pub curve_source: CurveSource,
    /// Effective conversion price at the terminal step, when applicable.
    pub final_conversion_price: Option<f64>,
    /// First-step finite-difference delta (diagnostic only).
    pub delta: Option<f64>,
    /// Boundary approximations applied during the run.
    pub warnings: Vec<String>,
}

/// Valuation of a single security, long position unless re-signed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SecurityValuation {
    /// Fair value of the whole holding, signed by position.
    pub fair_value_total: f64,
    /// Fair value per share / per option for per-unit instruments.
    pub fair_value_per_share: Option<f64>,
    /// Host (straight) component of the total.
    pub fair_value_host: f64,
    /// Embedded-derivative component (`total - host`).
    pub fair_value_deriv: f64,
    /// Non-negative derivative asset partition.
    pub fair_value_deriv_asset: f64,
    /// Non-negative derivative liability partition.
    pub fair_value_deriv_liab: f64,
    /// Debt-leg value at the root, scaled and signed.
    pub debt_component: f64,
    /// Equity-leg value at the root, scaled and signed.
    pub equity_component: f64,
    /// Sampled lattice nodes.
    pub node_logs: Vec<NodeLog>,
    /// Scalar diagnostics.
    pub meta: ValuationMeta,
}

impl SecurityValuation {
    /// Non-negative asset partition of the total.
    pub fn asset(&self) -> f64 {
        self.fair_value_total.max(0.0)
    }

    /// Non-negative liability partition of the total.
    pub fn liability(&self) -> f64 {
        (-self.fair_value_total).max(0.0)
    }

    /// Applies the position sign to every signed field.
    ///
    /// The engines value the long position; attributing the valuation
    /// to the issuer flips totals and recomputes the derivative
    /// asset/liability partitions. Node logs and meta are unsigned
    /// diagnostics and stay as computed.
    pub fn with_position(mut self, position: Position) -> Self {
        let sign = position.sign();
        self.fair_value_total *= sign;
        self.fair_value_per_share = self.fair_value_per_share.map(|v| v * sign);
        self.fair_value_host *= sign;
        self.fair_value_deriv *= sign;
        self.fair_value_deriv_asset = self.fair_value_deriv.max(0.0);
        self.fair_value_deriv_liab = (-self.fair_value_deriv).max(0.0);
        self.debt_component *= sign;
        self.equity_component *= sign;
        self
    }
}

/// Engine errors surfaced by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PricingError {
    /// Input validation error.
    InvalidInput(String),
    /// Required market datum is unavailable.
    MarketDataMissing(String),
    /// Numerical issue (overflow, invalid state, etc.).
    NumericalError(String),
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::MarketDataMissing(msg) => write!(f, "market data missing: {msg}"),
            Self::NumericalError(msg) => write!(f, "numerical error: {msg}"),
        }
    }
}

impl std::error::Error for PricingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::CurveSource;
    use approx::assert_relative_eq;

    fn sample() -> SecurityValuation {
        SecurityValuation {
            fair_value_total: 120.0,
            fair_value_per_share: Some(1.2),
            fair_value_host: 100.0,
            fair_value_deriv: 20.0,
            fair_value_deriv_asset: 20.0,
            fair_value_deriv_liab: 0.0,
            debt_component: 100.0,
            equity_component: 20.0,
            node_logs: Vec::new(),
            meta: ValuationMeta {
                steps: 10,
                dt: 0.02,
                up: 1.05,
                down: 1.0 / 1.05,
                valuation_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                maturity_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                curve_source: CurveSource::Flat,
                final_conversion_price: None,
                delta: None,
                warnings: Vec::new(),
            },
        }
    }

    #[test]
    fn issuer_position_flips_sign_and_partitions() {
        let long = sample();
        let short = sample().with_position(Position::Issuer);

        assert_relative_eq!(short.fair_value_total, -long.fair_value_total);
        assert_relative_eq!(short.fair_value_deriv, -20.0);
        assert_relative_eq!(short.fair_value_deriv_asset, 0.0);
        assert_relative_eq!(short.fair_value_deriv_liab, 20.0);
        assert_relative_eq!(short.liability(), 120.0);
        assert_relative_eq!(short.asset(), 0.0);
    }

    #[test]
    fn holder_position_is_identity() {
        let valuation = sample().with_position(Position::Holder);
        assert_relative_eq!(valuation.fair_value_total, 120.0);
        assert_relative_eq!(valuation.fair_value_deriv_asset, 20.0);
    }
}
