//! Day-count conventions for accrual and discounting.
//!
//! Hybrid-security term sheets in this library quote accrual on
//! ACT/365F; ACT/360 is provided for money-market curve inputs.

use chrono::NaiveDate;

/// Supported day-count conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DayCountConvention {
    /// Actual day count over a 360-day year.
    Act360,
    /// Actual day count over a 365-day year.
    Act365Fixed,
}

/// Calendar-day difference `end - start`.
///
/// Dates are civil dates; working in whole days avoids time-of-day and
/// timezone drift.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Computes the year fraction between two dates under a day-count
/// convention.
///
/// If `start > end` the negative of the reversed interval is returned.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use mezzanine::rates::{DayCountConvention, year_fraction};
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
///
/// let yf = year_fraction(start, end, DayCountConvention::Act365Fixed);
/// assert!((yf - 181.0 / 365.0).abs() < 1e-12);
/// ```
pub fn year_fraction(start: NaiveDate, end: NaiveDate, convention: DayCountConvention) -> f64 {
    if start == end {
        return 0.0;
    }
    if start > end {
        return -year_fraction(end, start, convention);
    }

    match convention {
        DayCountConvention::Act360 => days_between(start, end) as f64 / 360.0,
        DayCountConvention::Act365Fixed => days_between(start, end) as f64 / 365.0,
    }
}
