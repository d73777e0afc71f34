//! Market snapshot consumed by the valuation engines.
//!
//! One snapshot per deal: the underlying spot, a flat volatility, flat
//! fallback rates, and optionally the par-yield curve pair from which
//! stepwise discount arrays are derived.

use chrono::NaiveDate;

use crate::core::PricingError;
use crate::rates::CurvePair;

/// Market state shared by every security priced under a deal.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Market {
    /// Valuation date; step 0 of every grid.
    pub valuation_date: NaiveDate,
    /// Underlying share price.
    pub spot: f64,
    /// Flat annual volatility of the underlying.
    pub volatility: f64,
    /// Flat fallback risk-free rate.
    pub risk_free_rate: f64,
    /// Flat fallback credit spread.
    pub credit_spread: f64,
    /// Optional market curves; when present, stepwise arrays are
    /// extracted from them unless a security carries explicit arrays.
    pub curves: Option<CurvePair>,
}

impl Market {
    /// Starts a market builder.
    #[inline]
    pub fn builder() -> MarketBuilder {
        MarketBuilder::default()
    }
}

/// Builder for [`Market`].
#[derive(Debug, Clone, Default)]
pub struct MarketBuilder {
    valuation_date: Option<NaiveDate>,
    spot: Option<f64>,
    volatility: Option<f64>,
    risk_free_rate: Option<f64>,
    credit_spread: Option<f64>,
    curves: Option<CurvePair>,
}

impl MarketBuilder {
    /// Sets the valuation date.
    #[inline]
    pub fn valuation_date(mut self, date: NaiveDate) -> Self {
        self.valuation_date = Some(date);
        self
    }

    /// Sets the underlying spot price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the flat annual volatility.
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the flat fallback risk-free rate.
    #[inline]
    pub fn risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = Some(rate);
        self
    }

    /// Sets the flat fallback credit spread.
    #[inline]
    pub fn credit_spread(mut self, spread: f64) -> Self {
        self.credit_spread = Some(spread);
        self
    }

    /// Sets the market curve pair.
    pub fn curves(mut self, curves: CurvePair) -> Self {
        self.curves = Some(curves);
        self
    }

    /// Validates and builds a [`Market`].
    pub fn build(self) -> Result<Market, PricingError> {
        let valuation_date = self.valuation_date.ok_or_else(|| {
            PricingError::InvalidInput("market valuation_date is required".to_string())
        })?;
        let spot = self
            .spot
            .ok_or_else(|| PricingError::InvalidInput("market spot is required".to_string()))?;
        if spot <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market spot must be > 0".to_string(),
            ));
        }
        let volatility = self.volatility.ok_or_else(|| {
            PricingError::InvalidInput("market volatility is required".to_string())
        })?;
        if volatility <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market volatility must be > 0".to_string(),
            ));
        }

        Ok(Market {
            valuation_date,
            spot,
            volatility,
            risk_free_rate: self.risk_free_rate.unwrap_or(0.0),
            credit_spread: self.credit_spread.unwrap_or(0.0),
            curves: self.curves,
        })
    }
}
