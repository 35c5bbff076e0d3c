//! Subdaily aliasing, equation 8 of Zajdel et al. (2022).

use crate::constants::{DAILY_SAMPLING_HOURS, HOURS_PER_DAY};
use crate::error::{require_positive, Result};
use crate::utils::Period;
use serde_derive::{Deserialize, Serialize};

/// A validated sampling interval, in hours.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SamplingInterval(f64);

impl SamplingInterval {
    pub const DAILY: SamplingInterval = SamplingInterval(DAILY_SAMPLING_HOURS);

    pub fn hours(hours: f64) -> Result<Self> {
        Ok(SamplingInterval(require_positive("sampling_interval_hours", hours)?))
    }

    /// The interval whose sampling rate is `frequency_cpd`, e.g. a ground-repeat frequency.
    pub fn from_frequency(frequency_cpd: f64) -> Result<Self> {
        let frequency_cpd = require_positive("sampling_frequency_cpd", frequency_cpd)?;
        Self::hours(HOURS_PER_DAY / frequency_cpd)
    }

    pub fn as_hours(&self) -> f64 {
        self.0
    }

    pub fn as_days(&self) -> f64 {
        self.0 / HOURS_PER_DAY
    }

    /// Upper edge of the resolvable band, in cpd.
    pub fn nyquist_cpd(&self) -> f64 {
        0.5 / self.as_days()
    }
}

impl Default for SamplingInterval {
    fn default() -> Self {
        Self::DAILY
    }
}

impl TryFrom<f64> for SamplingInterval {
    type Error = crate::error::FrequencyError;

    fn try_from(hours: f64) -> Result<Self> {
        Self::hours(hours)
    }
}

impl From<SamplingInterval> for f64 {
    fn from(interval: SamplingInterval) -> f64 {
        interval.0
    }
}

/// Folds `frequency_cpd` onto the band resolvable at `interval`:
///
/// f' = | f - (1/T) floor(f T + 1/2) |,  T in days.
///
/// The result is non-negative and at most half the sampling rate.
pub fn subdaily_alias(frequency_cpd: f64, interval: SamplingInterval) -> f64 {
    let t = interval.as_days();
    (frequency_cpd - t.recip() * (frequency_cpd * t + 0.5).floor()).abs()
}

/// One frequency together with its folded counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasedEntry {
    pub source_frequency_cpd: f64,
    pub sampling_interval_hours: f64,
    pub aliased_frequency_cpd: f64,
    pub aliased_period: Period,
}

impl AliasedEntry {
    pub fn new(source_frequency_cpd: f64, interval: SamplingInterval) -> Self {
        let aliased_frequency_cpd = subdaily_alias(source_frequency_cpd, interval);
        AliasedEntry {
            source_frequency_cpd,
            sampling_interval_hours: interval.as_hours(),
            aliased_frequency_cpd,
            aliased_period: Period::from_cpd(aliased_frequency_cpd),
        }
    }
}

#[test]
fn test_gps_orbital_frequency_folds_to_half_year() {
    // n0_m1 for GPS: 2.0055152 cpd aliases to ~181.318 days
    let entry = AliasedEntry::new(24.0 / 11.967, SamplingInterval::DAILY);
    approx::assert_abs_diff_eq!(entry.aliased_frequency_cpd, 0.0055152, epsilon = 1e-7);
    approx::assert_abs_diff_eq!(entry.aliased_period.days().unwrap(), 181.318, epsilon = 1e-3);
}

#[test]
fn test_gps_catalog_orbital_frequency_fold() {
    approx::assert_abs_diff_eq!(
        subdaily_alias(2.0057014, SamplingInterval::DAILY),
        0.0057014,
        epsilon = 1e-9
    );
}

#[test]
fn test_zero_folds_to_zero() {
    assert_eq!(subdaily_alias(0.0, SamplingInterval::DAILY), 0.0);
    assert!(AliasedEntry::new(0.0, SamplingInterval::DAILY)
        .aliased_period
        .is_unbounded());
}

#[test]
fn test_fold_is_bounded_and_non_negative() {
    let mut f = -7.3;
    while f < 11.0 {
        let folded = subdaily_alias(f, SamplingInterval::DAILY);
        assert!(folded >= 0.0, "{f} folded to {folded}");
        assert!(folded <= 0.5, "{f} folded to {folded}");
        f += 0.0137;
    }
}

#[test]
fn test_half_integer_is_a_valid_boundary() {
    assert_eq!(subdaily_alias(0.5, SamplingInterval::DAILY), 0.5);
    assert_eq!(subdaily_alias(1.5, SamplingInterval::DAILY), 0.5);
}

#[test]
fn test_fold_is_idempotent() {
    let intervals = [
        SamplingInterval::DAILY,
        SamplingInterval::hours(6.0).unwrap(),
        SamplingInterval::from_frequency(0.1253540).unwrap(),
    ];
    for interval in intervals {
        for f in [0.0, 0.0028453, 0.9295357, 1.9322734, 2.1310182, 17.25, 1.0e6 + 0.3] {
            let once = subdaily_alias(f, interval);
            let twice = subdaily_alias(once, interval);
            approx::assert_abs_diff_eq!(once, twice, epsilon = 1e-9);
            assert!(once <= interval.nyquist_cpd() + 1e-9);
        }
    }
}

#[test]
fn test_folding_against_a_repeat_frequency() {
    // Against a reference rate f_r the fold is |f - f_r * round(f / f_r)|
    let f_r = 1.0028507;
    let interval = SamplingInterval::from_frequency(f_r).unwrap();
    let f = 1.9322734;
    let expected = (f - f_r * (f / f_r).round()).abs();
    approx::assert_abs_diff_eq!(subdaily_alias(f, interval), expected, epsilon = 1e-9);
}

#[test]
fn test_invalid_interval_is_rejected() {
    assert!(SamplingInterval::hours(0.0).is_err());
    assert!(SamplingInterval::hours(-24.0).is_err());
    assert!(SamplingInterval::from_frequency(0.0).is_err());
}
