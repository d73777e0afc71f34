//! Backward-induction engine for RCPS, CB, and CPS.
//!
//! The lattice carries two value legs per node: the debt leg `D`
//! (host carry, discounted on the risky curve and accruing the
//! periodic cash) and the equity leg `E` (converted-equity carry,
//! discounted risk-free). A node that converts moves its whole value
//! into the equity leg; the split at the root is the debt/equity
//! decomposition of the hybrid.
//!
//! Decision order within a node is fixed: voluntary conversion first
//! (the holder optimizes), then the issuer call (the issuer minimizes
//! against the already-optimized holder, who receives the better of
//! cash and conversion when called), then the holder put as the final
//! floor. Participating RCPS realizes the participation benefit only
//! at the redemption horizon; early converters take the plain
//! conversion value.

use crate::core::{NodeDecision, NodeLog, PricingError, SecurityValuation, ValuationMeta};
use crate::engines::host::host_unit_value;
use crate::engines::refixing::{RefixingSchedule, WA_SHARES_OUTSTANDING_FALLBACK};
use crate::engines::tree::lattice::CrrLattice;
use crate::instruments::{AntiDilution, ConvertibleKind, ConvertibleTerms, Participation};
use crate::market::Market;
use crate::rates::{StepwiseRates, TimeGrid};

/// Node logs are sampled for steps `t <= min(N, NODE_LOG_DEPTH)`.
pub const NODE_LOG_DEPTH: usize = 5;

/// Lattice engine for the three convertible variants.
#[derive(Debug, Clone)]
pub struct ConvertibleLatticeEngine {
    /// Deepest step for which node logs are captured.
    pub node_log_depth: usize,
}

impl Default for ConvertibleLatticeEngine {
    fn default() -> Self {
        Self {
            node_log_depth: NODE_LOG_DEPTH,
        }
    }
}

impl ConvertibleLatticeEngine {
    /// Values the long position in a convertible security.
    pub fn price(
        &self,
        kind: ConvertibleKind,
        terms: &ConvertibleTerms,
        market: &Market,
    ) -> Result<SecurityValuation, PricingError> {
        terms.validate(kind)?;

        let grid = TimeGrid::weekly(market.valuation_date, terms.maturity_date);
        let schedule = RefixingSchedule::build(terms, &grid);

        let per_share = kind.is_per_share();
        let face_unit = if per_share {
            terms.face_total / terms.share_count
        } else {
            terms.face_total
        };
        let multiplier = if per_share { terms.share_count } else { 1.0 };

        if grid.is_degenerate() {
            return Ok(zero_valuation(&grid, market, &schedule, per_share));
        }

        let n = grid.steps();
        let dt = grid.dt();
        let lattice = CrrLattice::new(market.spot, market.volatility, dt, n);
        let rates = StepwiseRates::resolve(
            terms.stepwise_risk_free.as_deref(),
            terms.stepwise_spread.as_deref(),
            market.curves.as_ref(),
            market.risk_free_rate,
            market.credit_spread,
            n,
            dt,
        );

        let redemption = face_unit * (1.0 + terms.redemption_premium);
        let cash_rate = if per_share {
            terms.coupon_rate + terms.dividend_rate
        } else {
            terms.coupon_rate
        };
        let coupon = face_unit * cash_rate * dt;
        let participating =
            kind == ConvertibleKind::Rcps && terms.participation == Participation::Participating;

        // Effective conversion ratio per step; an explicit override is
        // honored only without an anti-dilution policy.
        let ratios: Vec<f64> = (0..=n)
            .map(|t| match terms.conversion_ratio_override {
                Some(ratio) if terms.anti_dilution == AntiDilution::None => ratio,
                _ => face_unit / schedule.conversion_price(t),
            })
            .collect();

        let mut debt = vec![0.0_f64; n + 1];
        let mut equity = vec![0.0_f64; n + 1];
        let mut logs: Vec<NodeLog> = Vec::new();
        let hold_terminal = redemption + coupon;

        for i in 0..=n {
            let spot = lattice.node(n, i);
            let conv_base = spot * ratios[n];
            let (conversion, participated) = if participating {
                let uncapped = hold_terminal + conv_base;
                let double_dip = terms
                    .participation_cap
                    .map_or(uncapped, |cap| uncapped.min(face_unit * cap));
                if double_dip >= conv_base {
                    (double_dip, true)
                } else {
                    (conv_base, false)
                }
            } else {
                (conv_base, false)
            };

            let decision;
            if conversion > hold_terminal {
                debt[i] = 0.0;
                equity[i] = conversion;
                decision = if participated {
                    NodeDecision::MaturityParticipate
                } else {
                    NodeDecision::MaturityConvert
                };
            } else {
                debt[i] = hold_terminal;
                equity[i] = 0.0;
                decision = NodeDecision::MaturityRedeem;
            }

            if n <= self.node_log_depth {
                logs.push(NodeLog {
                    step: n,
                    index: i,
                    spot,
                    debt: debt[i],
                    equity: equity[i],
                    decision,
                    conversion_price: Some(schedule.conversion_price(n)),
                });
            }
        }

        let mut delta_up = if n == 1 { debt[1] + equity[1] } else { 0.0 };
        let mut delta_down = if n == 1 { debt[0] + equity[0] } else { 0.0 };

        for t in (0..n).rev() {
            let rf = rates.risk_free[t];
            let cs = rates.spread[t];
            let q = lattice.up_probability(rf);
            let df_risk_free = (-rf * dt).exp();
            let df_risky = (-(rf + cs) * dt).exp();
            let step_date = grid.date(t);
            // Periodic cash pays at step ends 1..N; the terminal payment
            // already sits in the maturity hold value and the valuation
            // node accrues none.
            let accrual = if t == 0 { 0.0 } else { coupon };

            for i in 0..=t {
                let debt_cont = df_risky * (q * debt[i + 1] + (1.0 - q) * debt[i]) + accrual;
                let equity_cont = df_risk_free * (q * equity[i + 1] + (1.0 - q) * equity[i]);
                let spot = lattice.node(t, i);
                let conversion = spot * ratios[t];

                let mut debt_val = debt_cont;
                let mut equity_val = equity_cont;
                let mut decision = NodeDecision::Hold;

                if conversion > debt_val + equity_val {
                    debt_val = 0.0;
                    equity_val = conversion;
                    decision = NodeDecision::Convert;
                }

                if let Some(call) = &terms.issuer_call {
                    if call.contains(step_date) {
                        let holder_payoff = call.price.max(conversion);
                        if holder_payoff < debt_val + equity_val {
                            if conversion > call.price {
                                debt_val = 0.0;
                                equity_val = conversion;
                                decision = NodeDecision::CalledForcedConversion;
                            } else {
                                debt_val = call.price;
                                equity_val = 0.0;
                                decision = NodeDecision::Called;
                            }
                        }
                    }
                }

                if let Some(put) = &terms.holder_put {
                    if put.contains(step_date) && put.price > debt_val + equity_val {
                        debt_val = put.price;
                        equity_val = 0.0;
                        decision = NodeDecision::Put;
                    }
                }

                debt[i] = debt_val;
                equity[i] = equity_val;

                if t <= self.node_log_depth {
                    logs.push(NodeLog {
                        step: t,
                        index: i,
                        spot,
                        debt: debt_val,
                        equity: equity_val,
                        decision,
                        conversion_price: Some(schedule.conversion_price(t)),
                    });
                }
            }

            if t == 1 {
                delta_down = debt[0] + equity[0];
                delta_up = debt[1] + equity[1];
            }
        }

        logs.sort_by_key(|log| (log.step, log.index));

        let host_unit = host_unit_value(coupon, redemption, &rates, dt);
        let hybrid_unit = debt[0] + equity[0];
        let derivative_unit = hybrid_unit - host_unit;

        let spot_up = market.spot * lattice.up;
        let spot_down = market.spot * lattice.down;
        let delta = if (spot_up - spot_down).abs() > 1.0e-14 {
            (delta_up - delta_down) / (spot_up - spot_down)
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        if schedule.used_shares_fallback() {
            warnings.push(format!(
                "weighted-average reset missing shares_outstanding_before; used fallback {WA_SHARES_OUTSTANDING_FALLBACK}"
            ));
        }

        let derivative_total = derivative_unit * multiplier;
        Ok(SecurityValuation {
            fair_value_total: hybrid_unit * multiplier,
            fair_value_per_share: per_share.then_some(hybrid_unit),
            fair_value_host: host_unit * multiplier,
            fair_value_deriv: derivative_total,
            fair_value_deriv_asset: derivative_total.max(0.0),
            fair_value_deriv_liab: (-derivative_total).max(0.0),
            debt_component: debt[0] * multiplier,
            equity_component: equity[0] * multiplier,
            node_logs: logs,
            meta: ValuationMeta {
                steps: n,
                dt,
                up: lattice.up,
                down: lattice.down,
                valuation_date: market.valuation_date,
                maturity_date: terms.maturity_date,
                curve_source: rates.source,
                final_conversion_price: Some(schedule.final_conversion_price()),
                delta: Some(delta),
                warnings,
            },
        })
    }
}

/// All-zero valuation for a maturity at or before the valuation date;
/// only the meta fields carry information.
fn zero_valuation(
    grid: &TimeGrid,
    market: &Market,
    schedule: &RefixingSchedule,
    per_share: bool,
) -> SecurityValuation {
    let dt = grid.dt();
    let lattice = CrrLattice::new(market.spot, market.volatility, dt, 0);
    SecurityValuation {
        fair_value_total: 0.0,
        fair_value_per_share: per_share.then_some(0.0),
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
            final_conversion_price: Some(schedule.final_conversion_price()),
            delta: None,
            warnings: Vec::new(),
        },
    }
}
