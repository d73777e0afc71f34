//! Deal-level input value object.

use chrono::NaiveDate;

use crate::core::{Position, PricingError};
use crate::instruments::Security;
use crate::market::Market;
use crate::rates::CurvePair;

/// One security held within a deal.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DealSecurity {
    /// Reporting name of the holding.
    pub name: String,
    /// Which side of the book the holding sits on.
    pub position: Position,
    /// Contract terms.
    pub security: Security,
}

/// Read-only deal input: global market fields plus the ordered
/// securities. Deal-level fields are injected into one [`Market`]
/// snapshot shared by every pricing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Deal {
    /// Reporting name of the deal.
    pub deal_name: String,
    /// Valuation date for every security.
    pub valuation_date: NaiveDate,
    /// Current underlying share price.
    pub share_price_current: f64,
    /// Underlying shares outstanding; drives deal price-per-share.
    pub underlying_num_shares: f64,
    /// Flat annual volatility.
    pub volatility: f64,
    /// Flat fallback risk-free rate.
    pub risk_free_rate: f64,
    /// Flat fallback credit spread.
    pub credit_spread: f64,
    /// Optional market curve pair.
    pub curves: Option<CurvePair>,
    /// Securities in reporting order.
    pub securities: Vec<DealSecurity>,
}

impl Deal {
    /// Builds the shared market snapshot from the deal-level fields.
    pub fn market(&self) -> Result<Market, PricingError> {
        let mut builder = Market::builder()
            .valuation_date(self.valuation_date)
            .spot(self.share_price_current)
            .volatility(self.volatility)
            .risk_free_rate(self.risk_free_rate)
            .credit_spread(self.credit_spread);
        if let Some(curves) = &self.curves {
            builder = builder.curves(curves.clone());
        }
        builder.build()
    }
}
