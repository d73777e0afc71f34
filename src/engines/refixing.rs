//! Pre-computation of the effective conversion price along the grid.
//!
//! Reset events carry calendar dates independent of the share-price
//! path, so the refixed conversion price is a per-step vector computed
//! once before induction, never node-level state.

use crate::instruments::{AntiDilution, ConvertibleTerms, ResetEvent};
use crate::rates::TimeGrid;

/// Shares-outstanding fallback for weighted-average resets that omit
/// `shares_outstanding_before`. Using it is surfaced as a warning.
pub const WA_SHARES_OUTSTANDING_FALLBACK: f64 = 1_000_000.0;

/// Effective conversion price per grid step.
///
/// Monotone non-increasing over time and clamped at the refixing floor
/// from below.
#[derive(Debug, Clone, PartialEq)]
pub struct RefixingSchedule {
    conversion_prices: Vec<f64>,
    used_shares_fallback: bool,
}

impl RefixingSchedule {
    /// Sweeps the grid forward, consuming reset events as their date
    /// falls at or before each node's date.
    ///
    /// An event only ever lowers the running conversion price; the
    /// floor clamps after each applied event. Under
    /// [`AntiDilution::None`] the schedule is the constant issue
    /// price.
    pub fn build(terms: &ConvertibleTerms, grid: &TimeGrid) -> Self {
        let mut events: Vec<&ResetEvent> = terms.reset_events.iter().collect();
        events.sort_by_key(|event| event.date);

        let mut current = terms.initial_conversion_price;
        let mut next_event = 0;
        let mut used_fallback = false;
        let mut conversion_prices = Vec::with_capacity(grid.points().len());

        for point in grid.points() {
            if terms.anti_dilution != AntiDilution::None {
                while next_event < events.len() && events[next_event].date <= point.date {
                    let event = events[next_event];
                    next_event += 1;
                    if event.new_price >= current {
                        continue;
                    }
                    current = match terms.anti_dilution {
                        AntiDilution::FullRatchet => event.new_price,
                        AntiDilution::WeightedAverage => {
                            let outstanding = event.shares_outstanding_before.unwrap_or_else(|| {
                                used_fallback = true;
                                WA_SHARES_OUTSTANDING_FALLBACK
                            });
                            current * (outstanding + (event.new_price / current) * event.new_shares)
                                / (outstanding + event.new_shares)
                        }
                        AntiDilution::None => unreachable!("events skipped under None"),
                    };
                    if let Some(floor) = terms.refixing_floor {
                        current = current.max(floor);
                    }
                }
            }
            conversion_prices.push(current);
        }

        Self {
            conversion_prices,
            used_shares_fallback: used_fallback,
        }
    }

    /// Effective conversion price at step `t`.
    pub fn conversion_price(&self, t: usize) -> f64 {
        self.conversion_prices[t]
    }

    /// Effective conversion price at the terminal step.
    pub fn final_conversion_price(&self) -> f64 {
        self.conversion_prices[self.conversion_prices.len() - 1]
    }

    /// True when a weighted-average reset used the shares-outstanding
    /// fallback constant.
    pub fn used_shares_fallback(&self) -> bool {
        self.used_shares_fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{ConvertibleKind, Participation};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms(anti_dilution: AntiDilution, events: Vec<ResetEvent>) -> ConvertibleTerms {
        let terms = ConvertibleTerms {
            maturity_date: date(2026, 1, 1),
            face_total: 1_000_000_000.0,
            share_count: 50_000.0,
            coupon_rate: 0.02,
            dividend_rate: 0.0,
            redemption_premium: 0.05,
            initial_conversion_price: 20_000.0,
            conversion_ratio_override: None,
            anti_dilution,
            refixing_floor: Some(14_000.0),
            reset_events: events,
            participation: Participation::NonParticipating,
            participation_cap: None,
            issuer_call: None,
            holder_put: None,
            stepwise_risk_free: None,
            stepwise_spread: None,
        };
        terms.validate(ConvertibleKind::Rcps).unwrap();
        terms
    }

    #[test]
    fn full_ratchet_steps_down_at_event_date() {
        let grid = TimeGrid::weekly(date(2025, 1, 1), date(2026, 1, 1));
        let event = ResetEvent {
            date: date(2025, 1, 31),
            new_price: 15_000.0,
            new_shares: 10_000.0,
            shares_outstanding_before: None,
        };
        let schedule = RefixingSchedule::build(&terms(AntiDilution::FullRatchet, vec![event]), &grid);

        // Event lands between nodes 4 (day 28) and 5 (day 35).
        assert_relative_eq!(schedule.conversion_price(4), 20_000.0);
        assert_relative_eq!(schedule.conversion_price(5), 15_000.0);
        assert_relative_eq!(schedule.final_conversion_price(), 15_000.0);
    }

    #[test]
    fn weighted_average_formula_and_fallback() {
        let grid = TimeGrid::weekly(date(2025, 1, 1), date(2026, 1, 1));
        let event = ResetEvent {
            date: date(2025, 2, 1),
            new_price: 10_000.0,
            new_shares: 500_000.0,
            shares_outstanding_before: None,
        };
        let schedule =
            RefixingSchedule::build(&terms(AntiDilution::WeightedAverage, vec![event]), &grid);
        assert!(schedule.used_shares_fallback());

        let so = WA_SHARES_OUTSTANDING_FALLBACK;
        let expected = 20_000.0 * (so + (10_000.0 / 20_000.0) * 500_000.0) / (so + 500_000.0);
        assert_relative_eq!(schedule.final_conversion_price(), expected, epsilon = 1e-9);
    }

    #[test]
    fn floor_clamps_from_below() {
        let grid = TimeGrid::weekly(date(2025, 1, 1), date(2026, 1, 1));
        let event = ResetEvent {
            date: date(2025, 3, 1),
            new_price: 5_000.0,
            new_shares: 1_000.0,
            shares_outstanding_before: Some(1_000_000.0),
        };
        let schedule = RefixingSchedule::build(&terms(AntiDilution::FullRatchet, vec![event]), &grid);
        assert_relative_eq!(schedule.final_conversion_price(), 14_000.0);
    }

    #[test]
    fn schedule_is_monotone_non_increasing() {
        let grid = TimeGrid::weekly(date(2025, 1, 1), date(2026, 1, 1));
        let events = vec![
            ResetEvent {
                date: date(2025, 2, 1),
                new_price: 18_000.0,
                new_shares: 1_000.0,
                shares_outstanding_before: Some(1_000_000.0),
            },
            ResetEvent {
                date: date(2025, 8, 1),
                new_price: 16_000.0,
                new_shares: 2_000.0,
                shares_outstanding_before: Some(1_001_000.0),
            },
            // Up-round: must not raise the conversion price.
            ResetEvent {
                date: date(2025, 10, 1),
                new_price: 30_000.0,
                new_shares: 1_000.0,
                shares_outstanding_before: Some(1_003_000.0),
            },
        ];
        let schedule = RefixingSchedule::build(&terms(AntiDilution::FullRatchet, events), &grid);
        for t in 0..grid.steps() {
            assert!(schedule.conversion_price(t + 1) <= schedule.conversion_price(t));
            assert!(schedule.conversion_price(t) >= 14_000.0);
        }
    }

    #[test]
    fn none_policy_ignores_events() {
        let grid = TimeGrid::weekly(date(2025, 1, 1), date(2026, 1, 1));
        let event = ResetEvent {
            date: date(2025, 2, 1),
            new_price: 10_000.0,
            new_shares: 1_000.0,
            shares_outstanding_before: Some(1_000_000.0),
        };
        let schedule = RefixingSchedule::build(&terms(AntiDilution::None, vec![event]), &grid);
        assert_relative_eq!(schedule.final_conversion_price(), 20_000.0);
    }
}
