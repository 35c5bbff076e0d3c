//! The orbital period calculator (equation 7), and the two sweeps built on
//! top of it: orbital signals and orbital peaks.

pub mod peaks;
pub mod signals;

use crate::constants::DEGENERATE_TOLERANCE;
use crate::error::{require_positive, FrequencyError, Result};
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Hours. Used for T_S, T_E and P_nm.
pub type Hours = f64;

/// Integer coefficients (n, m) of equation 7.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoefficientPair {
    pub n: i64,
    pub m: i64,
}

impl CoefficientPair {
    pub fn new(n: i64, m: i64) -> Self {
        CoefficientPair { n, m }
    }

    /// `n{n}_m{m}`, e.g. `n-2_m1`.
    pub fn label(&self) -> String {
        format!("n{}_m{}", self.n, self.m)
    }
}

impl fmt::Display for CoefficientPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.label())
    }
}

/// Orbital period P_nm as per eq 7 in Zajdel et al. (2022):
///
/// 1 / P_nm = n / T_E + m / T_S
///
/// The magnitude is returned, so the result is always positive. Combinations
/// for which the right hand side vanishes have no finite period and are reported
/// as `DegenerateCombination`.
pub fn orbital_period(pair: CoefficientPair, satellite_period: Hours, earth_period: Hours) -> Result<Hours> {
    let t_s = require_positive("satellite_period_hours", satellite_period)?;
    let t_e = require_positive("earth_rotation_period_hours", earth_period)?;

    let CoefficientPair { n, m } = pair;
    if n == 0 && m == 0 {
        return Err(FrequencyError::DegenerateCombination { n, m });
    }

    let denominator = n as f64 / t_e + m as f64 / t_s;
    if denominator.abs() < DEGENERATE_TOLERANCE {
        return Err(FrequencyError::DegenerateCombination { n, m });
    }

    Ok(denominator.abs().recip())
}

#[cfg(test)]
const T_E: f64 = 23.9345;

#[cfg(test)]
const T_S_GPS: f64 = 11.967;

#[test]
fn test_n0_m1_is_the_satellite_period() {
    let period = orbital_period(CoefficientPair::new(0, 1), T_S_GPS, T_E).unwrap();
    approx::assert_relative_eq!(period, T_S_GPS, max_relative = 1e-12);
}

#[test]
fn test_n1_m0_is_the_earth_rotation_period() {
    let period = orbital_period(CoefficientPair::new(1, 0), T_S_GPS, T_E).unwrap();
    approx::assert_relative_eq!(period, T_E, max_relative = 1e-12);
}

#[test]
fn test_matches_closed_form() {
    for (n, m, t_s) in [(-2, 1, T_S_GPS), (1, 1, T_S_GPS), (-1, 2, 11.264), (-4, 2, 14.077), (2, 3, 14.077)] {
        let expected = (t_s * T_E / (n as f64 * t_s + m as f64 * T_E)).abs();
        let period = orbital_period(CoefficientPair::new(n, m), t_s, T_E).unwrap();
        approx::assert_relative_eq!(period, expected, max_relative = 1e-9);
    }
}

#[test]
fn test_gps_near_resonance() {
    // T_E is almost exactly 2 T_S, so n=-2, m=1 gives a very long period (~65 years)
    let period = orbital_period(CoefficientPair::new(-2, 1), T_S_GPS, T_E).unwrap();
    approx::assert_relative_eq!(period, 572848.323, max_relative = 1e-6);
}

#[test]
fn test_period_is_positive_for_negative_denominator() {
    let period = orbital_period(CoefficientPair::new(-3, 1), T_S_GPS, T_E).unwrap();
    assert!(period > 0.0);
}

#[test]
fn test_exact_cancellation_is_degenerate() {
    match orbital_period(CoefficientPair::new(-2, 1), 12.0, 24.0) {
        Err(FrequencyError::DegenerateCombination { n, m }) => assert_eq!((n, m), (-2, 1)),
        other => panic!("expected DegenerateCombination, got {other:?}"),
    }
    assert!(matches!(
        orbital_period(CoefficientPair::new(0, 0), T_S_GPS, T_E),
        Err(FrequencyError::DegenerateCombination { .. })
    ));
}

#[test]
fn test_non_positive_periods_are_invalid() {
    assert!(matches!(
        orbital_period(CoefficientPair::new(0, 1), 0.0, T_E),
        Err(FrequencyError::InvalidConstant { .. })
    ));
    assert!(matches!(
        orbital_period(CoefficientPair::new(0, 1), T_S_GPS, -1.0),
        Err(FrequencyError::InvalidConstant { .. })
    ));
}

#[test]
fn test_label() {
    assert_eq!(CoefficientPair::new(-2, 1).label(), "n-2_m1");
    assert_eq!(CoefficientPair::new(0, 4).to_string(), "n0_m4");
}
