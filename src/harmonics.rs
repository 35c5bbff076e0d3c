use crate::error::{require_positive, Result};
use crate::utils::Period;
use serde_derive::{Deserialize, Serialize};

/// The k-th integer multiple of a base frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harmonic {
    pub index: usize,
    pub frequency_cpd: f64,
    pub period: Period,
}

/// The first `count` harmonics of `base_freq`, unaliased. Harmonic k is
/// computed as `k * base_freq` directly rather than by accumulation.
pub fn harmonics(base_freq: f64, count: usize) -> Result<Vec<Harmonic>> {
    let base_freq = require_positive("harmonic_base_frequency", base_freq)?;

    Ok((1..=count)
        .map(|index| {
            let frequency_cpd = index as f64 * base_freq;
            Harmonic {
                index,
                frequency_cpd,
                period: Period::from_cpd(frequency_cpd),
            }
        })
        .collect())
}

/// Harmonics of a constellation's draconitic frequency f_d.
pub fn draconitic_harmonics(draconitic_freq: f64, count: usize) -> Result<Vec<Harmonic>> {
    harmonics(draconitic_freq, count)
}

/// Harmonics of the Earth's orbital (annual) frequency f_E.
pub fn annual_harmonics(earth_orbital_freq: f64, count: usize) -> Result<Vec<Harmonic>> {
    harmonics(earth_orbital_freq, count)
}

#[test]
fn test_harmonics_are_exact_multiples() {
    let f_d = 0.0028453;
    let harmonics = draconitic_harmonics(f_d, 15).unwrap();
    assert_eq!(harmonics.len(), 15);
    for (k, harmonic) in (1..=15).zip(harmonics.iter()) {
        assert_eq!(harmonic.index, k);
        approx::assert_abs_diff_eq!(harmonic.frequency_cpd, k as f64 * f_d, epsilon = 1e-9);
    }
}

#[test]
fn test_gps_third_harmonic() {
    let harmonics = draconitic_harmonics(0.0028453, 15).unwrap();
    approx::assert_abs_diff_eq!(harmonics[2].frequency_cpd, 0.0085359, epsilon = 1e-7);
}

#[test]
fn test_gps_draconitic_year() {
    let harmonics = draconitic_harmonics(0.0028453, 1).unwrap();
    approx::assert_abs_diff_eq!(harmonics[0].period.days().unwrap(), 351.457, epsilon = 1e-3);
}

#[test]
fn test_zero_count_is_empty() {
    assert!(draconitic_harmonics(0.0028453, 0).unwrap().is_empty());
}

#[test]
fn test_annual_harmonics() {
    let annual = annual_harmonics(0.0027378, 12).unwrap();
    assert_eq!(annual.len(), 12);
    approx::assert_abs_diff_eq!(annual[1].period.days().unwrap(), 182.628, epsilon = 1e-3);
}

#[test]
fn test_non_positive_base_is_rejected() {
    assert!(draconitic_harmonics(0.0, 15).is_err());
    assert!(draconitic_harmonics(-0.0028, 15).is_err());
}
