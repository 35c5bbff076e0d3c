use super::{orbital_period, CoefficientPair, Hours};
use crate::aliasing::{AliasedEntry, SamplingInterval};
use crate::constants::HOURS_PER_DAY;
use crate::error::{FrequencyError, Result};
use itertools::iproduct;
use log::{debug, trace};
use serde_derive::{Deserialize, Serialize};

/// The (n, m) pairs to evaluate, in output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSweep {
    pub pairs: Vec<CoefficientPair>,
}

impl SignalSweep {
    /// Every `n` in `n_range` for every `m` in `m_values`, ordered by `m` then `n`.
    pub fn cross(n_range: std::ops::RangeInclusive<i64>, m_values: &[i64]) -> Self {
        let mut m_values = m_values.to_vec();
        m_values.sort_unstable();
        m_values.dedup();

        let pairs = iproduct!(m_values, n_range)
            .map(|(m, n)| CoefficientPair::new(n, m))
            .collect();

        SignalSweep { pairs }
    }

    /// The combinations with the most power in subdaily solutions, after
    /// Table 4 of Zajdel et al. (2022).
    pub fn zajdel_table4() -> Self {
        let rows: [(i64, std::ops::RangeInclusive<i64>); 4] = [(1, -4..=2), (2, -4..=2), (3, -2..=1), (4, -1..=1)];
        let pairs = rows
            .into_iter()
            .flat_map(|(m, ns)| ns.map(move |n| CoefficientPair::new(n, m)))
            .collect();

        SignalSweep { pairs }
    }
}

impl Default for SignalSweep {
    fn default() -> Self {
        SignalSweep::cross(-4..=2, &[1, 2, 3, 4])
    }
}

/// An orbital artifact and its alias in daily solutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalSignal {
    pub label: String,
    pub coefficients: CoefficientPair,
    pub orbital_period_hours: Hours,
    pub frequency_cpd: f64,
    pub aliased: AliasedEntry,
}

impl OrbitalSignal {
    /// Evaluates a single coefficient pair. Fails with `DegenerateCombination`
    /// if equation 7 has no finite solution for it.
    pub fn new(pair: CoefficientPair, satellite_period: Hours, earth_period: Hours) -> Result<Self> {
        let orbital_period_hours = orbital_period(pair, satellite_period, earth_period)?;
        let frequency_cpd = HOURS_PER_DAY / orbital_period_hours;

        Ok(OrbitalSignal {
            label: pair.label(),
            coefficients: pair,
            orbital_period_hours,
            frequency_cpd,
            aliased: AliasedEntry::new(frequency_cpd, SamplingInterval::DAILY),
        })
    }
}

/// Runs the sweep for one satellite period. Degenerate pairs are skipped; any
/// other error (i.e. an invalid period) aborts the sweep.
pub fn orbital_signals(satellite_period: Hours, earth_period: Hours, sweep: &SignalSweep) -> Result<Vec<OrbitalSignal>> {
    let mut signals = Vec::with_capacity(sweep.pairs.len());

    for &pair in sweep.pairs.iter() {
        match OrbitalSignal::new(pair, satellite_period, earth_period) {
            Ok(signal) => {
                trace!(
                    "{}: P = {:.4} h, f = {:.7} cpd, aliased {:.7} cpd",
                    signal.label,
                    signal.orbital_period_hours,
                    signal.frequency_cpd,
                    signal.aliased.aliased_frequency_cpd
                );
                signals.push(signal);
            }
            Err(FrequencyError::DegenerateCombination { n, m }) => {
                debug!("skipping degenerate combination n={n}, m={m} for T_S = {satellite_period} h");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(signals)
}

#[cfg(test)]
const T_E: f64 = 23.9345;

#[test]
fn test_default_sweep_order() {
    let sweep = SignalSweep::default();
    assert_eq!(sweep.pairs.len(), 28);
    assert_eq!(sweep.pairs[0], CoefficientPair::new(-4, 1));
    assert_eq!(sweep.pairs[6], CoefficientPair::new(2, 1));
    assert_eq!(sweep.pairs[7], CoefficientPair::new(-4, 2));
    assert_eq!(sweep.pairs[27], CoefficientPair::new(2, 4));
}

#[test]
fn test_cross_sorts_m_values() {
    let sweep = SignalSweep::cross(0..=1, &[2, 1, 2]);
    let labels: Vec<String> = sweep.pairs.iter().map(|p| p.label()).collect();
    assert_eq!(labels, ["n0_m1", "n1_m1", "n0_m2", "n1_m2"]);
}

#[test]
fn test_table4_has_21_combinations() {
    let sweep = SignalSweep::zajdel_table4();
    assert_eq!(sweep.pairs.len(), 21);
    assert_eq!(sweep.pairs[14], CoefficientPair::new(-2, 3));
    assert_eq!(sweep.pairs[20], CoefficientPair::new(1, 4));
}

#[test]
fn test_gps_n0_m1() {
    let signals = orbital_signals(11.967, T_E, &SignalSweep::default()).unwrap();
    let n0_m1 = signals.iter().find(|s| s.label == "n0_m1").unwrap();
    approx::assert_abs_diff_eq!(n0_m1.frequency_cpd, 2.0055152, epsilon = 1e-7);
    approx::assert_abs_diff_eq!(n0_m1.aliased.aliased_period.days().unwrap(), 181.318, epsilon = 1e-3);
    assert_eq!(n0_m1.aliased.sampling_interval_hours, 24.0);
}

#[test]
fn test_output_follows_sweep_order() {
    let sweep = SignalSweep::default();
    let signals = orbital_signals(14.077, T_E, &sweep).unwrap();
    assert_eq!(signals.len(), sweep.pairs.len());
    for (signal, pair) in signals.iter().zip(sweep.pairs.iter()) {
        assert_eq!(&signal.coefficients, pair);
        assert_eq!(signal.label, pair.label());
        assert!(signal.aliased.aliased_frequency_cpd <= 0.5);
    }
}

#[test]
fn test_degenerate_pairs_are_skipped() {
    // With T_E = 2 T_S exactly, n=-2, m=1 cancels (as does n=-4, m=2)
    let signals = orbital_signals(12.0, 24.0, &SignalSweep::default()).unwrap();
    assert_eq!(signals.len(), 26);
    assert!(signals.iter().all(|s| s.label != "n-2_m1" && s.label != "n-4_m2"));
    assert!(signals.iter().all(|s| s.frequency_cpd.is_finite()));
}

#[test]
fn test_invalid_period_aborts() {
    assert!(matches!(
        orbital_signals(0.0, T_E, &SignalSweep::default()),
        Err(FrequencyError::InvalidConstant { .. })
    ));
}
