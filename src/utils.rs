use crate::constants::HOURS_PER_DAY;
use crate::error::{FrequencyError, Result};
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// A period derived from a frequency. A zero frequency has no finite period,
/// so it is carried explicitly as `Unbounded` instead of as an infinity.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Days(f64),
    Unbounded,
}

impl Period {
    /// Period of a frequency given in cycles per day.
    pub fn from_cpd(frequency_cpd: f64) -> Self {
        if frequency_cpd == 0.0 {
            Period::Unbounded
        } else {
            Period::Days(frequency_cpd.recip())
        }
    }

    pub fn days(&self) -> Option<f64> {
        match *self {
            Period::Days(days) => Some(days),
            Period::Unbounded => None,
        }
    }

    pub fn hours(&self) -> Option<f64> {
        self.days().map(|days| days * HOURS_PER_DAY)
    }

    /// Like `days`, but an unbounded period is an error.
    pub fn finite_days(&self) -> Result<f64> {
        self.days().ok_or(FrequencyError::UndefinedPeriod)
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Period::Unbounded)
    }
}

impl fmt::Display for Period {
    /// Honours width/precision for the finite case, e.g. `{:8.3}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(days) => fmt::Display::fmt(days, f),
            // precision would truncate the word, so only width is honoured
            Period::Unbounded => match f.width() {
                Some(width) => write!(f, "{:>width$}", "unbounded"),
                None => f.write_str("unbounded"),
            },
        }
    }
}

/// Converts a frequency in cycles per day to a period in days.
pub fn cpd_to_days(frequency_cpd: f64) -> Period {
    Period::from_cpd(frequency_cpd)
}

/// Converts a period in days to a frequency in cycles per day.
/// A zero-length period has no finite frequency and yields `None`.
pub fn days_to_cpd(period_days: f64) -> Option<f64> {
    if period_days == 0.0 {
        None
    } else {
        Some(period_days.recip())
    }
}

/// Frequency in cycles per day of a period given in hours.
pub fn hours_to_cpd(period_hours: f64) -> Option<f64> {
    if period_hours == 0.0 {
        None
    } else {
        Some(HOURS_PER_DAY / period_hours)
    }
}

#[test]
fn test_cpd_days_round_trip() {
    for x in [1e-6, 0.0028453, 0.5, 1.0, 2.0057014, 1234.5] {
        let days = cpd_to_days(x).days().unwrap();
        approx::assert_relative_eq!(days_to_cpd(days).unwrap(), x, max_relative = 1e-12);
    }
}

#[test]
fn test_zero_frequency_is_unbounded() {
    let period = cpd_to_days(0.0);
    assert!(period.is_unbounded());
    assert_eq!(period.days(), None);
    assert!(matches!(period.finite_days(), Err(FrequencyError::UndefinedPeriod)));
}

#[test]
fn test_zero_period_has_no_frequency() {
    assert_eq!(days_to_cpd(0.0), None);
    assert_eq!(hours_to_cpd(0.0), None);
}

#[test]
fn test_hours_conversion() {
    approx::assert_relative_eq!(hours_to_cpd(11.967).unwrap(), 2.0055151667084483, max_relative = 1e-12);
    approx::assert_relative_eq!(cpd_to_days(2.0).hours().unwrap(), 12.0);
}

#[test]
fn test_period_display() {
    assert_eq!(format!("{:8.3}", Period::Days(181.3183)), " 181.318");
    assert_eq!(format!("{:>10}", Period::Unbounded), " unbounded");
}
