//! Par-yield curve interpolation and the simplified zero bootstrap.
//!
//! The market quotes two curves on a fixed tenor grid: a risk-free
//! curve and a corporate curve; the credit-spread curve is their
//! pointwise difference. Interpolation is linear in yield with flat
//! extrapolation at both ends.

/// Standard quotation tenors (in years) for market yield curves.
pub const STANDARD_TENORS: [f64; 12] = [
    0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 7.0, 10.0,
];

/// Piecewise-linear yield curve on a tenor grid.
///
/// Yields are interpolated linearly between bracketing tenors and held
/// flat outside the quoted range.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TenorCurve {
    points: Vec<(f64, f64)>,
}

impl TenorCurve {
    /// Creates a curve from unsorted `(tenor, yield)` nodes.
    ///
    /// Non-positive tenors are dropped; nodes are sorted by tenor.
    pub fn new(mut points: Vec<(f64, f64)>) -> Self {
        points.retain(|(tenor, _)| *tenor > 0.0);
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { points }
    }

    /// Creates a flat curve at a single level.
    pub fn flat(level: f64) -> Self {
        Self {
            points: vec![(1.0, level)],
        }
    }

    /// Curve nodes in tenor order.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Returns true when the curve holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Interpolated yield at `tenor`.
    ///
    /// Flat extrapolation below the first and above the last node; an
    /// empty curve reads as zero.
    pub fn yield_at(&self, tenor: f64) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        if tenor <= first.0 {
            return first.1;
        }
        let last = self.points[self.points.len() - 1];
        if tenor >= last.0 {
            return last.1;
        }

        for window in self.points.windows(2) {
            let (t1, y1) = window[0];
            let (t2, y2) = window[1];
            if tenor <= t2 {
                let w = (tenor - t1) / (t2 - t1);
                return y1 + w * (y2 - y1);
            }
        }
        last.1
    }
}

/// Zero-rate curve derived from annually compounded par yields.
///
/// The bootstrap is the identity mapping: each input yield is treated
/// as the annually compounded zero rate at its tenor, giving
/// `DF(t) = (1 + r)^(-t)`. The full recursive par bootstrap is a
/// deliberate V1 approximation, not a defect; intermediate tenors
/// interpolate linearly on zero rates before discounting.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroCurve {
    curve: TenorCurve,
}

impl ZeroCurve {
    /// Bootstraps (identity) a zero curve from a par-yield curve.
    pub fn from_par_yields(curve: TenorCurve) -> Self {
        Self { curve }
    }

    /// Annually compounded zero rate at `tenor`.
    pub fn zero_rate(&self, tenor: f64) -> f64 {
        self.curve.yield_at(tenor)
    }

    /// Discount factor `(1 + r)^(-t)` at `tenor`.
    pub fn discount_factor(&self, tenor: f64) -> f64 {
        if tenor <= 0.0 {
            return 1.0;
        }
        (1.0 + self.zero_rate(tenor)).powf(-tenor)
    }
}

/// The two curves feeding stepwise rate extraction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurvePair {
    /// Risk-free par-yield curve.
    pub risk_free: TenorCurve,
    /// Credit-spread curve (corporate minus risk-free, in yield terms).
    pub spread: TenorCurve,
}

impl CurvePair {
    /// Creates a pair from an explicit risk-free and spread curve.
    pub fn new(risk_free: TenorCurve, spread: TenorCurve) -> Self {
        Self { risk_free, spread }
    }

    /// Builds the pair from risk-free and corporate par-yield curves.
    ///
    /// The spread curve is the pointwise `corporate - risk_free`
    /// difference sampled on the standard tenor grid.
    pub fn from_par_yields(risk_free: TenorCurve, corporate: &TenorCurve) -> Self {
        let spread = TenorCurve::new(
            STANDARD_TENORS
                .iter()
                .map(|&tenor| (tenor, corporate.yield_at(tenor) - risk_free.yield_at(tenor)))
                .collect(),
        );
        Self { risk_free, spread }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_interpolation_between_nodes() {
        let curve = TenorCurve::new(vec![(1.0, 0.03), (2.0, 0.05)]);
        assert_relative_eq!(curve.yield_at(1.5), 0.04, epsilon = 1e-12);
        assert_relative_eq!(curve.yield_at(1.25), 0.035, epsilon = 1e-12);
    }

    #[test]
    fn flat_extrapolation_both_ends() {
        let curve = TenorCurve::new(vec![(0.5, 0.02), (5.0, 0.04)]);
        assert_relative_eq!(curve.yield_at(0.1), 0.02, epsilon = 1e-12);
        assert_relative_eq!(curve.yield_at(30.0), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn unsorted_nodes_are_ordered() {
        let curve = TenorCurve::new(vec![(5.0, 0.05), (1.0, 0.03)]);
        assert_relative_eq!(curve.yield_at(3.0), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn zero_curve_discount_factor_identity() {
        let zero = ZeroCurve::from_par_yields(TenorCurve::flat(0.05));
        assert_relative_eq!(zero.discount_factor(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            zero.discount_factor(2.0),
            (1.0f64 + 0.05).powf(-2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn spread_curve_is_pointwise_difference() {
        let rf = TenorCurve::new(vec![(1.0, 0.03), (10.0, 0.04)]);
        let corp = TenorCurve::new(vec![(1.0, 0.05), (10.0, 0.07)]);
        let pair = CurvePair::from_par_yields(rf, &corp);
        assert_relative_eq!(pair.spread.yield_at(1.0), 0.02, epsilon = 1e-12);
        assert_relative_eq!(pair.spread.yield_at(10.0), 0.03, epsilon = 1e-12);
    }
}
