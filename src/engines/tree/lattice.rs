//! Cox-Ross-Rubinstein lattice parameters.

/// CRR share-price tree: `u = exp(sigma * sqrt(dt))`, `d = 1/u`, node
/// `(t, i)` holding `spot * u^i * d^(t-i)` after `i` up-moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrrLattice {
    /// Share price at the root.
    pub spot: f64,
    /// Up factor.
    pub up: f64,
    /// Down factor.
    pub down: f64,
    /// Uniform step in years.
    pub dt: f64,
    /// Number of steps `N`.
    pub steps: usize,
}

impl CrrLattice {
    /// Builds the lattice parameters for a flat volatility.
    pub fn new(spot: f64, volatility: f64, dt: f64, steps: usize) -> Self {
        let up = (volatility * dt.sqrt()).exp();
        Self {
            spot,
            up,
            down: 1.0 / up,
            dt,
            steps,
        }
    }

    /// Share price at node `(t, i)`.
    pub fn node(&self, t: usize, i: usize) -> f64 {
        self.spot * self.up.powi(i as i32) * self.down.powi((t - i) as i32)
    }

    /// Per-step risk-neutral up probability under rate `rate`.
    ///
    /// Not clamped to [0, 1]: with tiny volatility the CRR probability
    /// can leave the unit interval, and the induction remains well
    /// defined because equal child values make the expectation exact.
    pub fn up_probability(&self, rate: f64) -> f64 {
        ((rate * self.dt).exp() - self.down) / (self.up - self.down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn up_down_are_reciprocal() {
        let lattice = CrrLattice::new(10_000.0, 0.35, 7.0 / 365.0, 52);
        assert_relative_eq!(lattice.up * lattice.down, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn tree_recombines() {
        let lattice = CrrLattice::new(10_000.0, 0.35, 7.0 / 365.0, 52);
        // Up then down equals down then up equals the root.
        assert_relative_eq!(lattice.node(2, 1), 10_000.0, epsilon = 1e-9);
        assert_relative_eq!(
            lattice.node(5, 3),
            10_000.0 * lattice.up.powi(3) * lattice.down.powi(2),
            epsilon = 1e-9
        );
    }

    #[test]
    fn probability_is_risk_neutral() {
        let lattice = CrrLattice::new(100.0, 0.2, 0.01, 100);
        let q = lattice.up_probability(0.05);
        let expected_growth = q * lattice.up + (1.0 - q) * lattice.down;
        assert_relative_eq!(expected_growth, (0.05f64 * 0.01).exp(), epsilon = 1e-12);
    }
}
