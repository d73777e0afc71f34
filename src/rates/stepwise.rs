//! Per-step discrete forward rates driving the lattice discounting.
//!
//! Each lattice step discounts with its own risk-free forward and
//! credit-spread forward. The arrays are resolved from the strongest
//! available source: explicit per-security arrays, then bootstrapped
//! market curves, then the flat scalar fallbacks.

use crate::rates::curve::{CurvePair, ZeroCurve};

/// Which input actually produced the stepwise arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CurveSource {
    /// Caller-supplied stepwise arrays used verbatim.
    Explicit,
    /// Arrays extracted from bootstrapped market curves.
    Bootstrapped,
    /// Constant arrays from the flat scalar rates.
    Flat,
}

/// Stepwise risk-free and credit-spread forwards, one entry per step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepwiseRates {
    /// Risk-free forward per step, length `N`.
    pub risk_free: Vec<f64>,
    /// Credit-spread forward per step, length `N`.
    pub spread: Vec<f64>,
    /// Source that produced the arrays.
    pub source: CurveSource,
}

/// Discrete forward between bracketing discount factors:
/// `f = (DF(t1)/DF(t2) - 1) / dt` over each `[t*dt, (t+1)*dt)`.
fn forwards_from_zero_curve(zero: &ZeroCurve, steps: usize, dt: f64) -> Vec<f64> {
    (0..steps)
        .map(|t| {
            let df1 = zero.discount_factor(t as f64 * dt);
            let df2 = zero.discount_factor((t + 1) as f64 * dt);
            (df1 / df2 - 1.0) / dt
        })
        .collect()
}

impl StepwiseRates {
    /// Resolves the per-step arrays for an `N`-step lattice.
    ///
    /// Resolution order per leg: an explicit array of length `>= N` is
    /// used verbatim (truncated to `N`); otherwise market curves are
    /// bootstrapped and forwards extracted; otherwise the flat scalar
    /// populates a constant array. The reported source is the
    /// strongest one used by either leg.
    pub fn resolve(
        explicit_risk_free: Option<&[f64]>,
        explicit_spread: Option<&[f64]>,
        curves: Option<&CurvePair>,
        flat_risk_free: f64,
        flat_spread: f64,
        steps: usize,
        dt: f64,
    ) -> Self {
        let explicit_rf = explicit_risk_free.filter(|rates| rates.len() >= steps);
        let explicit_cs = explicit_spread.filter(|rates| rates.len() >= steps);

        let zero_pair = curves.map(|pair| {
            (
                ZeroCurve::from_par_yields(pair.risk_free.clone()),
                ZeroCurve::from_par_yields(pair.spread.clone()),
            )
        });

        let (risk_free, rf_source) = match (explicit_rf, &zero_pair) {
            (Some(rates), _) => (rates[..steps].to_vec(), CurveSource::Explicit),
            (None, Some((zero_rf, _))) => (
                forwards_from_zero_curve(zero_rf, steps, dt),
                CurveSource::Bootstrapped,
            ),
            (None, None) => (vec![flat_risk_free; steps], CurveSource::Flat),
        };
        let (spread, cs_source) = match (explicit_cs, &zero_pair) {
            (Some(rates), _) => (rates[..steps].to_vec(), CurveSource::Explicit),
            (None, Some((_, zero_cs))) => (
                forwards_from_zero_curve(zero_cs, steps, dt),
                CurveSource::Bootstrapped,
            ),
            (None, None) => (vec![flat_spread; steps], CurveSource::Flat),
        };

        let source = match (rf_source, cs_source) {
            (CurveSource::Explicit, _) | (_, CurveSource::Explicit) => CurveSource::Explicit,
            (CurveSource::Bootstrapped, _) | (_, CurveSource::Bootstrapped) => {
                CurveSource::Bootstrapped
            }
            _ => CurveSource::Flat,
        };

        Self {
            risk_free,
            spread,
            source,
        }
    }

    /// Number of steps covered.
    pub fn len(&self) -> usize {
        self.risk_free.len()
    }

    /// True when the arrays are empty (degenerate grid).
    pub fn is_empty(&self) -> bool {
        self.risk_free.is_empty()
    }
}
