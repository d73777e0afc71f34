//! Hybrid-security contract terms.
//!
//! All four supported instruments — redeemable convertible preferred
//! (RCPS), convertible bond (CB), convertible preferred (CPS), and
//! employee stock option (ESO) — are variants of one [`Security`]
//! union so engine dispatch is an exhaustive match. Contract terms are
//! immutable pricing inputs; valuation logic lives in the engine
//! modules.

use chrono::NaiveDate;

use crate::core::PricingError;

/// Anti-dilution policy applied when a dilutive issue resets the
/// conversion price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AntiDilution {
    /// No refixing; reset events are ignored.
    None,
    /// Conversion price drops to the new issue price.
    FullRatchet,
    /// Broad-based weighted-average adjustment, downward only.
    WeightedAverage,
}

/// Participation feature of a preferred instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Participation {
    /// Liquidation preference only.
    NonParticipating,
    /// Preference plus pro-rata common proceeds at the horizon.
    Participating,
}

/// A dilutive issue that may reset the conversion price.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResetEvent {
    /// Date of the new issue.
    pub date: NaiveDate,
    /// Price per share of the new issue.
    pub new_price: f64,
    /// Number of shares issued.
    pub new_shares: f64,
    /// Shares outstanding immediately before the issue; the
    /// weighted-average formula falls back to a documented constant
    /// when absent.
    pub shares_outstanding_before: Option<f64>,
}

/// American exercise window with a fixed strike price.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExerciseWindow {
    /// Cash price exchanged on exercise (call or put price per unit).
    pub price: f64,
    /// First date of the window, inclusive.
    pub start: NaiveDate,
    /// Last date of the window, inclusive.
    pub end: NaiveDate,
}

impl ExerciseWindow {
    /// True when `date` lies inside the window, endpoints included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Which convertible variant a set of terms belongs to.
///
/// CB is valued per bond; RCPS and CPS are valued per share with the
/// face split across the share count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConvertibleKind {
    Rcps,
    Cb,
    Cps,
}

impl ConvertibleKind {
    /// True for instruments valued per share rather than per bond.
    pub fn is_per_share(self) -> bool {
        !matches!(self, Self::Cb)
    }
}

/// Contract terms shared by RCPS, CB, and CPS.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConvertibleTerms {
    /// Contractual maturity date.
    pub maturity_date: NaiveDate,
    /// Total issue price across the holding.
    pub face_total: f64,
    /// Number of shares in the issue; unused for CB.
    pub share_count: f64,
    /// Annual coupon rate on face.
    pub coupon_rate: f64,
    /// Annual dividend rate on face; unused for CB.
    pub dividend_rate: f64,
    /// Redemption premium over face at maturity.
    pub redemption_premium: f64,
    /// Conversion price at issue.
    pub initial_conversion_price: f64,
    /// Explicit conversion ratio; honored only when `anti_dilution`
    /// is [`AntiDilution::None`].
    pub conversion_ratio_override: Option<f64>,
    /// Refixing policy for dilutive issues.
    pub anti_dilution: AntiDilution,
    /// Lower bound on the refixed conversion price.
    pub refixing_floor: Option<f64>,
    /// Dilutive issues in chronological order.
    pub reset_events: Vec<ResetEvent>,
    /// Participation feature; the payoff branch applies to RCPS only.
    pub participation: Participation,
    /// Participation cap as a multiple of face.
    pub participation_cap: Option<f64>,
    /// Issuer call window.
    pub issuer_call: Option<ExerciseWindow>,
    /// Holder put window.
    pub holder_put: Option<ExerciseWindow>,
    /// Explicit per-step risk-free rates; used verbatim when at least
    /// `N` entries are supplied.
    pub stepwise_risk_free: Option<Vec<f64>>,
    /// Explicit per-step credit spreads; same length rule.
    pub stepwise_spread: Option<Vec<f64>>,
}

impl ConvertibleTerms {
    /// Validates the terms for the given variant.
    pub fn validate(&self, kind: ConvertibleKind) -> Result<(), PricingError> {
        if self.face_total <= 0.0 {
            return Err(PricingError::InvalidInput(
                "face_total must be > 0".to_string(),
            ));
        }
        if kind.is_per_share() && self.share_count <= 0.0 {
            return Err(PricingError::InvalidInput(
                "share_count must be > 0 for per-share instruments".to_string(),
            ));
        }
        if self.coupon_rate < 0.0 || self.dividend_rate < 0.0 {
            return Err(PricingError::InvalidInput(
                "coupon_rate and dividend_rate must be >= 0".to_string(),
            ));
        }
        if self.redemption_premium < 0.0 {
            return Err(PricingError::InvalidInput(
                "redemption_premium must be >= 0".to_string(),
            ));
        }
        if self.initial_conversion_price <= 0.0 {
            return Err(PricingError::InvalidInput(
                "initial_conversion_price must be > 0".to_string(),
            ));
        }
        if self.conversion_ratio_override.is_some_and(|r| r <= 0.0) {
            return Err(PricingError::InvalidInput(
                "conversion_ratio_override must be > 0 when provided".to_string(),
            ));
        }
        if let Some(floor) = self.refixing_floor {
            if floor <= 0.0 || floor > self.initial_conversion_price {
                return Err(PricingError::InvalidInput(
                    "refixing_floor must be in (0, initial_conversion_price]".to_string(),
                ));
            }
        }
        if self.participation_cap.is_some_and(|c| c < 1.0) {
            return Err(PricingError::InvalidInput(
                "participation_cap must be >= 1 when provided".to_string(),
            ));
        }
        for event in &self.reset_events {
            if event.new_price <= 0.0 {
                return Err(PricingError::InvalidInput(
                    "reset event new_price must be > 0".to_string(),
                ));
            }
            if event.new_shares < 0.0 {
                return Err(PricingError::InvalidInput(
                    "reset event new_shares must be >= 0".to_string(),
                ));
            }
            if event.shares_outstanding_before.is_some_and(|s| s <= 0.0) {
                return Err(PricingError::InvalidInput(
                    "reset event shares_outstanding_before must be > 0 when provided".to_string(),
                ));
            }
        }
        for window in [&self.issuer_call, &self.holder_put].into_iter().flatten() {
            if window.price <= 0.0 {
                return Err(PricingError::InvalidInput(
                    "exercise window price must be > 0".to_string(),
                ));
            }
            if window.end < window.start {
                return Err(PricingError::InvalidInput(
                    "exercise window end must not precede start".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Default behavioral exercise multiple; effectively disables early
/// exercise until a caller sets a realistic boundary.
pub const DEFAULT_EXERCISE_MULTIPLE: f64 = 1000.0;

fn default_exercise_multiple() -> f64 {
    DEFAULT_EXERCISE_MULTIPLE
}

/// Employee stock option terms.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EsoTerms {
    /// Contractual maturity date.
    pub maturity_date: NaiveDate,
    /// Number of options granted.
    pub option_count: f64,
    /// Contract strike.
    pub strike: f64,
    /// End of the vesting window; maturity when absent.
    pub vesting_end: Option<NaiveDate>,
    /// Annualized employee-exit intensity.
    pub exit_rate: f64,
    /// Behavioral boundary `m`: exercise is considered once the share
    /// price reaches `m * strike`.
    #[serde(default = "default_exercise_multiple")]
    pub early_exercise_multiple: f64,
    /// Explicit per-step risk-free rates; used verbatim when at least
    /// `N` entries are supplied.
    pub stepwise_risk_free: Option<Vec<f64>>,
}

impl EsoTerms {
    /// Validates the terms.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.option_count <= 0.0 {
            return Err(PricingError::InvalidInput(
                "option_count must be > 0".to_string(),
            ));
        }
        if self.strike <= 0.0 {
            return Err(PricingError::InvalidInput("strike must be > 0".to_string()));
        }
        if self.exit_rate < 0.0 {
            return Err(PricingError::InvalidInput(
                "exit_rate must be >= 0".to_string(),
            ));
        }
        if self.early_exercise_multiple <= 0.0 {
            return Err(PricingError::InvalidInput(
                "early_exercise_multiple must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// A hybrid security: one tagged variant per supported instrument.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Security {
    /// Redeemable convertible preferred stock.
    Rcps(ConvertibleTerms),
    /// Convertible bond.
    Cb(ConvertibleTerms),
    /// Convertible preferred stock.
    Cps(ConvertibleTerms),
    /// Employee stock option grant.
    Eso(EsoTerms),
}

impl Security {
    /// Contractual maturity date of the instrument.
    pub fn maturity_date(&self) -> NaiveDate {
        match self {
            Self::Rcps(t) | Self::Cb(t) | Self::Cps(t) => t.maturity_date,
            Self::Eso(t) => t.maturity_date,
        }
    }

    /// Short type label for diagnostics and reporting.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Rcps(_) => "RCPS",
            Self::Cb(_) => "CB",
            Self::Cps(_) => "CPS",
            Self::Eso(_) => "ESO",
        }
    }

    /// Validates the instrument terms.
    pub fn validate(&self) -> Result<(), PricingError> {
        match self {
            Self::Rcps(t) => t.validate(ConvertibleKind::Rcps),
            Self::Cb(t) => t.validate(ConvertibleKind::Cb),
            Self::Cps(t) => t.validate(ConvertibleKind::Cps),
            Self::Eso(t) => t.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn base_terms() -> ConvertibleTerms {
        ConvertibleTerms {
            maturity_date: date(2028, 1, 1),
            face_total: 1_000_000_000.0,
            share_count: 50_000.0,
            coupon_rate: 0.02,
            dividend_rate: 0.0,
            redemption_premium: 0.05,
            initial_conversion_price: 20_000.0,
            conversion_ratio_override: None,
            anti_dilution: AntiDilution::None,
            refixing_floor: None,
            reset_events: Vec::new(),
            participation: Participation::NonParticipating,
            participation_cap: None,
            issuer_call: None,
            holder_put: None,
            stepwise_risk_free: None,
            stepwise_spread: None,
        }
    }

    #[test]
    fn cb_ignores_share_count() {
        let mut terms = base_terms();
        terms.share_count = 0.0;
        assert!(terms.validate(ConvertibleKind::Cb).is_ok());
        assert!(terms.validate(ConvertibleKind::Rcps).is_err());
    }

    #[test]
    fn floor_above_issue_price_is_rejected() {
        let mut terms = base_terms();
        terms.refixing_floor = Some(25_000.0);
        assert!(terms.validate(ConvertibleKind::Rcps).is_err());
        terms.refixing_floor = Some(14_000.0);
        assert!(terms.validate(ConvertibleKind::Rcps).is_ok());
    }

    #[test]
    fn participation_cap_below_one_is_rejected() {
        let mut terms = base_terms();
        terms.participation_cap = Some(0.5);
        assert!(terms.validate(ConvertibleKind::Rcps).is_err());
        terms.participation_cap = Some(1.0);
        assert!(terms.validate(ConvertibleKind::Rcps).is_ok());
    }

    #[test]
    fn window_ordering_is_checked() {
        let mut terms = base_terms();
        terms.issuer_call = Some(ExerciseWindow {
            price: 1.0,
            start: date(2027, 1, 1),
            end: date(2026, 1, 1),
        });
        assert!(terms.validate(ConvertibleKind::Rcps).is_err());
    }

    #[test]
    fn exercise_window_bounds_are_inclusive() {
        let window = ExerciseWindow {
            price: 1.0,
            start: date(2026, 1, 1),
            end: date(2026, 6, 30),
        };
        assert!(window.contains(date(2026, 1, 1)));
        assert!(window.contains(date(2026, 6, 30)));
        assert!(!window.contains(date(2026, 7, 1)));
    }

    #[test]
    fn eso_validation() {
        let terms = EsoTerms {
            maturity_date: date(2030, 1, 1),
            option_count: 10_000.0,
            strike: 20_000.0,
            vesting_end: Some(date(2027, 1, 1)),
            exit_rate: 0.05,
            early_exercise_multiple: 2.0,
            stepwise_risk_free: None,
        };
        assert!(terms.validate().is_ok());

        let mut bad = terms.clone();
        bad.strike = 0.0;
        assert!(bad.validate().is_err());
    }
}
