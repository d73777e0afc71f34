//! Rates primitives: day counts, the weekly valuation grid, curve
//! interpolation, and stepwise forward extraction.

pub mod curve;
pub mod day_count;
pub mod stepwise;
pub mod time_grid;

pub use curve::{CurvePair, TenorCurve, ZeroCurve, STANDARD_TENORS};
pub use day_count::{days_between, year_fraction, DayCountConvention};
pub use stepwise::{CurveSource, StepwiseRates};
pub use time_grid::{GridPoint, TimeGrid};
