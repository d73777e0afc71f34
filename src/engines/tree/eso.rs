//! Backward-induction engine for employee stock options.
//!
//! Single equity leg on the shared CRR tree. Exercise is gated twice:
//! nodes before the vesting end stay unvested, and vested holders only
//! exercise once the share price reaches the behavioral boundary
//! `m * strike` (a suboptimal-exercise proxy). Employee attrition
//! applies a per-step survival multiplier to every node value after
//! the decision, so deep-in-the-money early exercise becomes rational
//! once attrition outweighs remaining time value.

use crate::core::{NodeDecision, NodeLog, PricingError, SecurityValuation, ValuationMeta};
use crate::engines::tree::convertible::NODE_LOG_DEPTH;
use crate::engines::tree::lattice::CrrLattice;
use crate::instruments::EsoTerms;
use crate::market::Market;
use crate::rates::{StepwiseRates, TimeGrid};

/// Lattice engine for employee stock options.
#[derive(Debug, Clone)]
pub struct EsoLatticeEngine {
    /// Deepest step for which node logs are captured.
    pub node_log_depth: usize,
}

impl Default for EsoLatticeEngine {
    fn default() -> Self {
        Self {
            node_log_depth: NODE_LOG_DEPTH,
        }
    }
}

impl EsoLatticeEngine {
    /// Values the long position in an option grant.
    pub fn price(
        &self,
        terms: &EsoTerms,
        market: &Market,
    ) -> Result<SecurityValuation, PricingError> {
        terms.validate()?;

        let grid = TimeGrid::weekly(market.valuation_date, terms.maturity_date);
        if grid.is_degenerate() {
            return Ok(zero_valuation(&grid, market));
        }

        let n = grid.steps();
        let dt = grid.dt();
        let lattice = CrrLattice::new(market.spot, market.volatility, dt, n);
        // ESO discounting is risk-free only; no credit-spread leg.
        let rates = StepwiseRates::resolve(
            terms.stepwise_risk_free.as_deref(),
            None,
            market.curves.as_ref(),
            market.risk_free_rate,
            0.0,
            n,
            dt,
        );

        let vesting_end = terms.vesting_end.unwrap_or(terms.maturity_date);
        let survival = (-terms.exit_rate * dt).exp();
        let boundary = terms.early_exercise_multiple * terms.strike;

        let mut values = vec![0.0_f64; n + 1];
        let mut logs: Vec<NodeLog> = Vec::new();

        for i in 0..=n {
            let spot = lattice.node(n, i);
            let intrinsic = (spot - terms.strike).max(0.0);
            values[i] = intrinsic;
            if n <= self.node_log_depth {
                logs.push(NodeLog {
                    step: n,
                    index: i,
                    spot,
                    debt: 0.0,
                    equity: intrinsic,
                    decision: if intrinsic > 0.0 {
                        NodeDecision::MaturityExercise
                    } else {
                        NodeDecision::MaturityLapse
                    },
                    conversion_price: None,
                });
            }
        }

        for t in (0..n).rev() {
            let rf = rates.risk_free[t];
            let q = lattice.up_probability(rf);
            let discount = (-rf * dt).exp();
            let vested = grid.date(t) >= vesting_end;

            for i in 0..=t {
                let continuation = discount * (q * values[i + 1] + (1.0 - q) * values[i]);
                let spot = lattice.node(t, i);
                let intrinsic = (spot - terms.strike).max(0.0);

                let (value, decision) = if !vested {
                    (continuation, NodeDecision::Unvested)
                } else if spot >= boundary && intrinsic > continuation {
                    (intrinsic, NodeDecision::ExerciseSuboptimal)
                } else {
                    (continuation, NodeDecision::Hold)
                };

                values[i] = value * survival;

                if t <= self.node_log_depth {
                    logs.push(NodeLog {
                        step: t,
                        index: i,
                        spot,
                        debt: 0.0,
                        equity: values[i],
                        decision,
                        conversion_price: None,
                    });
                }
            }
        }

        logs.sort_by_key(|log| (log.step, log.index));

        let per_option = values[0];
        let total = per_option * terms.option_count;
        Ok(SecurityValuation {
            fair_value_total: total,
            fair_value_per_share: Some(per_option),
            fair_value_host: 0.0,
            fair_value_deriv: total,
            fair_value_deriv_asset: total.max(0.0),
            fair_value_deriv_liab: (-total).max(0.0),
            debt_component: 0.0,
            equity_component: total,
            node_logs: logs,
            meta: ValuationMeta {
                steps: n,
                dt,
                up: lattice.up,
                down: lattice.down,
                valuation_date: market.valuation_date,
                maturity_date: terms.maturity_date,
                curve_source: rates.source,
                final_conversion_price: None,
                delta: None,
                warnings: Vec::new(),
            },
        })
    }
}

fn zero_valuation(grid: &TimeGrid, market: &Market) -> SecurityValuation {
    let dt = grid.dt();
    let lattice = CrrLattice::new(market.spot, market.volatility, dt, 0);
    SecurityValuation {
        fair_value_total: 0.0,
        fair_value_per_share: Some(0.0),
        fair_value_host: 0.0,
        fair_value_deriv: 0.0,
        fair_value_deriv_asset: 0.0,
        fair_value_deriv_liab: 0.0,
        debt_component: 0.0,
        equity_component: 0.0,
        node_logs: Vec::new(),
        meta: ValuationMeta {
            steps: 0,
            dt,
            up: lattice.up,
            down: lattice.down,
            valuation_date: market.valuation_date,
            maturity_date: grid.date(grid.steps()),
            curve_source: crate::rates::CurveSource::Flat,
            final_conversion_price: None,
            delta: None,
            warnings: Vec::new(),
        },
    }
}
