//! Per-security dispatch and deal-level aggregation.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{Position, PricingError, SecurityValuation};
use crate::engines::{ConvertibleLatticeEngine, EsoLatticeEngine};
use crate::instruments::{ConvertibleKind, Security};
use crate::market::Market;
use crate::portfolio::deal::Deal;

/// Successful valuation of one deal holding.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SecurityReport {
    /// Reporting name of the holding.
    pub name: String,
    /// Position the valuation is signed for.
    pub position: Position,
    /// The signed valuation.
    pub valuation: SecurityValuation,
}

/// An isolated per-security failure; the rest of the deal still
/// aggregates.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SecurityFailure {
    /// Reporting name of the holding.
    pub name: String,
    /// The error that excluded it from the totals.
    pub error: PricingError,
}

/// Deal-level aggregate of the per-security valuations.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DealResult {
    /// Reporting name of the deal.
    pub deal_name: String,
    /// Sum of signed fair values.
    pub total_value: f64,
    /// Sum of signed host components.
    pub host_value: f64,
    /// Sum of signed derivative components.
    pub derivative_value: f64,
    /// Sum of per-security non-negative asset partitions.
    pub total_asset: f64,
    /// Sum of per-security non-negative liability partitions.
    pub total_liability: f64,
    /// Sum of per-security derivative asset partitions.
    pub derivative_asset: f64,
    /// Sum of per-security derivative liability partitions.
    pub derivative_liability: f64,
    /// `total_value / underlying_num_shares` when shares are positive.
    pub price_per_share: Option<f64>,
    /// Per-security valuations in deal order.
    pub securities: Vec<SecurityReport>,
    /// Securities excluded from the totals.
    pub failures: Vec<SecurityFailure>,
}

/// Values one security for a position under a market snapshot.
pub fn price_security(
    security: &Security,
    position: Position,
    market: &Market,
) -> Result<SecurityValuation, PricingError> {
    let valuation = match security {
        Security::Rcps(terms) => {
            ConvertibleLatticeEngine::default().price(ConvertibleKind::Rcps, terms, market)?
        }
        Security::Cb(terms) => {
            ConvertibleLatticeEngine::default().price(ConvertibleKind::Cb, terms, market)?
        }
        Security::Cps(terms) => {
            ConvertibleLatticeEngine::default().price(ConvertibleKind::Cps, terms, market)?
        }
        Security::Eso(terms) => EsoLatticeEngine::default().price(terms, market)?,
    };
    Ok(valuation.with_position(position))
}

/// Prices every security in the deal and aggregates the results.
///
/// Pricings are independent; per-security failures are isolated into
/// [`DealResult::failures`] and excluded from the totals. With the
/// `parallel` feature the per-security loop fans out over rayon;
/// reporting order is preserved either way.
pub fn price_deal(deal: &Deal) -> Result<DealResult, PricingError> {
    let market = deal.market()?;

    let price_one = |holding: &crate::portfolio::deal::DealSecurity| {
        price_security(&holding.security, holding.position, &market)
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Result<SecurityValuation, PricingError>> =
        deal.securities.par_iter().map(price_one).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Result<SecurityValuation, PricingError>> =
        deal.securities.iter().map(price_one).collect();

    let mut result = DealResult {
        deal_name: deal.deal_name.clone(),
        total_value: 0.0,
        host_value: 0.0,
        derivative_value: 0.0,
        total_asset: 0.0,
        total_liability: 0.0,
        derivative_asset: 0.0,
        derivative_liability: 0.0,
        price_per_share: None,
        securities: Vec::with_capacity(deal.securities.len()),
        failures: Vec::new(),
    };

    for (holding, outcome) in deal.securities.iter().zip(outcomes) {
        match outcome {
            Ok(valuation) => {
                result.total_value += valuation.fair_value_total;
                result.host_value += valuation.fair_value_host;
                result.derivative_value += valuation.fair_value_deriv;
                result.total_asset += valuation.asset();
                result.total_liability += valuation.liability();
                result.derivative_asset += valuation.fair_value_deriv_asset;
                result.derivative_liability += valuation.fair_value_deriv_liab;
                result.securities.push(SecurityReport {
                    name: holding.name.clone(),
                    position: holding.position,
                    valuation,
                });
            }
            Err(error) => result.failures.push(SecurityFailure {
                name: holding.name.clone(),
                error,
            }),
        }
    }

    if deal.underlying_num_shares > 0.0 {
        result.price_per_share = Some(result.total_value / deal.underlying_num_shares);
    }

    Ok(result)
}
