use chrono::{Duration, NaiveDate};

use crate::rates::day_count::{year_fraction, DayCountConvention};

/// A single node on the valuation grid.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridPoint {
    /// Zero-based step index; step 0 is the valuation date.
    pub step: usize,
    /// Calendar date of the node.
    pub date: NaiveDate,
    /// ACT/365F year fraction from the valuation date.
    pub years: f64,
}

/// Weekly valuation grid from valuation date to maturity.
///
/// Nodes are emitted every seven calendar days strictly before
/// maturity, then a final node is pinned to the maturity date itself,
/// so the terminal stub may be shorter than a week. The lattice step
/// `dt` is the uniform `horizon / steps`; calendar dates on the grid
/// are what exercise windows and reset events are matched against.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Vec<GridPoint>,
    degenerate: bool,
}

impl TimeGrid {
    /// Builds the weekly grid between two dates.
    ///
    /// A maturity at or before the valuation date yields a trivial
    /// two-point grid spanning one day; callers detect this through
    /// [`TimeGrid::is_degenerate`] and short-circuit.
    pub fn weekly(valuation: NaiveDate, maturity: NaiveDate) -> Self {
        if maturity <= valuation {
            let points = vec![
                GridPoint {
                    step: 0,
                    date: valuation,
                    years: 0.0,
                },
                GridPoint {
                    step: 1,
                    date: valuation,
                    years: 1.0 / 365.0,
                },
            ];
            return Self {
                points,
                degenerate: true,
            };
        }

        let mut points = Vec::new();
        let mut date = valuation;
        let mut step = 0;
        while date < maturity {
            points.push(GridPoint {
                step,
                date,
                years: year_fraction(valuation, date, DayCountConvention::Act365Fixed),
            });
            date = date + Duration::days(7);
            step += 1;
        }
        points.push(GridPoint {
            step,
            date: maturity,
            years: year_fraction(valuation, maturity, DayCountConvention::Act365Fixed),
        });

        Self {
            points,
            degenerate: false,
        }
    }

    /// Number of lattice steps `N` (one less than the node count).
    pub fn steps(&self) -> usize {
        self.points.len() - 1
    }

    /// Year fraction of the terminal node.
    pub fn horizon(&self) -> f64 {
        self.points[self.points.len() - 1].years
    }

    /// Uniform lattice step `horizon / steps`.
    pub fn dt(&self) -> f64 {
        self.horizon() / self.steps() as f64
    }

    /// Calendar date at step `t`.
    pub fn date(&self, t: usize) -> NaiveDate {
        self.points[t].date
    }

    /// All grid nodes in step order.
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// True when maturity was at or before the valuation date.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}
