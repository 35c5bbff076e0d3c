//! Orbital peaks after Rebischung et al. (2024): harmonics of the sun
//! argument-of-latitude frequency shifted by multiples of the draconitic
//! frequency, folded onto the daily band and sorted into period bands.

use crate::aliasing::{subdaily_alias, SamplingInterval};
use crate::error::{require_positive, Result};
use crate::utils::Period;
use itertools::Itertools;
use log::{debug, trace};
use serde_derive::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A named day-length range `(min_days, max_days]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakBand {
    pub name: String,
    pub min_days: f64,
    pub max_days: f64,
}

impl PeakBand {
    pub fn new(name: &str, min_days: f64, max_days: f64) -> Self {
        PeakBand {
            name: name.to_string(),
            min_days,
            max_days,
        }
    }

    /// Lower bound exclusive, upper bound inclusive.
    pub fn contains(&self, period_days: f64) -> bool {
        self.min_days < period_days && period_days <= self.max_days
    }
}

/// Ordered band definitions. A period is assigned to the first band that
/// contains it, so for overlapping ranges the earlier band wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandBreakpoints {
    pub bands: Vec<PeakBand>,
}

impl BandBreakpoints {
    /// Index of the band a period belongs to. Unbounded periods belong to none.
    pub fn classify(&self, period: Period) -> Option<usize> {
        let days = period.days()?;
        self.bands.iter().position(|band| band.contains(days))
    }
}

impl Default for BandBreakpoints {
    fn default() -> Self {
        BandBreakpoints {
            bands: vec![
                PeakBand::new("8d", 6.0, 12.0),
                PeakBand::new("4d", 3.0, 6.0),
                PeakBand::new("2-7d", 2.0, 3.5),
                PeakBand::new("2d", 1.5, 2.5),
                PeakBand::new("1d", 0.5, 1.5),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakSweep {
    /// Multiples of f_u, evaluated in this order.
    pub sun_multiples: Vec<u32>,
    /// Signed multiples of f_d.
    pub draconitic_multiples: RangeInclusive<i32>,
    pub breakpoints: BandBreakpoints,
    /// If set, only the highest-frequency entries of each band are kept.
    pub max_per_band: Option<usize>,
}

impl Default for PeakSweep {
    fn default() -> Self {
        PeakSweep {
            sun_multiples: vec![1, 2, 4],
            draconitic_multiples: -6..=6,
            breakpoints: BandBreakpoints::default(),
            max_per_band: None,
        }
    }
}

/// `u·f_u ± |d|·f_d`, e.g. `2f_u-3f_d`. Zero renders as `+0`.
pub fn peak_label(sun_multiple: u32, draconitic_multiple: i32) -> String {
    let sign = if draconitic_multiple < 0 { '-' } else { '+' };
    format!("{sun_multiple}f_u{sign}{}f_d", draconitic_multiple.unsigned_abs())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakCombination {
    pub label: String,
    pub sun_multiple: u32,
    pub draconitic_multiple: i32,
    /// |u·f_u + d·f_d|, before folding.
    pub combined_frequency_cpd: f64,
    /// The combined frequency folded onto the daily band.
    pub frequency_cpd: f64,
    pub period: Period,
}

impl PeakCombination {
    pub fn new(sun_multiple: u32, draconitic_multiple: i32, sun_arg_lat_freq: f64, draconitic_freq: f64) -> Self {
        let combined_frequency_cpd =
            (sun_multiple as f64 * sun_arg_lat_freq + draconitic_multiple as f64 * draconitic_freq).abs();
        let frequency_cpd = subdaily_alias(combined_frequency_cpd, SamplingInterval::DAILY);

        PeakCombination {
            label: peak_label(sun_multiple, draconitic_multiple),
            sun_multiple,
            draconitic_multiple,
            combined_frequency_cpd,
            frequency_cpd,
            period: Period::from_cpd(frequency_cpd),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPeaks {
    pub band: PeakBand,
    pub peaks: Vec<PeakCombination>,
}

/// Every combination of a sweep, each held in exactly one place: either its
/// band or `unbanded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakTable {
    /// Bands that received at least one combination, in breakpoint order.
    pub bands: Vec<BandPeaks>,
    pub unbanded: Vec<PeakCombination>,
}

impl PeakTable {
    /// `None` if no combination fell into the band.
    pub fn band(&self, name: &str) -> Option<&BandPeaks> {
        self.bands.iter().find(|b| b.band.name == name)
    }

    /// Number of banded combinations.
    pub fn banded_len(&self) -> usize {
        self.bands.iter().map(|b| b.peaks.len()).sum()
    }
}

/// Generates and classifies all combinations for one constellation. Within a
/// band, entries keep sweep order (sun multiple, then signed draconitic
/// multiple ascending).
pub fn orbital_peaks(sun_arg_lat_freq: f64, draconitic_freq: f64, sweep: &PeakSweep) -> Result<PeakTable> {
    let f_u = require_positive("sun_arg_lat_frequency", sun_arg_lat_freq)?;
    let f_d = require_positive("draconitic_frequency", draconitic_freq)?;

    let mut bands: Vec<BandPeaks> = sweep
        .breakpoints
        .bands
        .iter()
        .map(|band| BandPeaks {
            band: band.clone(),
            peaks: vec![],
        })
        .collect();
    let mut unbanded = vec![];

    for &u in sweep.sun_multiples.iter() {
        for d in sweep.draconitic_multiples.clone() {
            let peak = PeakCombination::new(u, d, f_u, f_d);
            match sweep.breakpoints.classify(peak.period) {
                Some(index) => {
                    trace!("{} -> {} ({:.3} days)", peak.label, bands[index].band.name, peak.period);
                    bands[index].peaks.push(peak);
                }
                None => {
                    debug!("{} ({} days) falls outside every band", peak.label, peak.period);
                    unbanded.push(peak);
                }
            }
        }
    }

    if let Some(limit) = sweep.max_per_band {
        for band in bands.iter_mut() {
            keep_highest(&mut band.peaks, limit);
        }
    }

    bands.retain(|b| !b.peaks.is_empty());

    Ok(PeakTable { bands, unbanded })
}

/// Drops all but the `limit` highest-frequency peaks, preserving order.
/// Ties are broken by position so the result does not depend on float ordering.
fn keep_highest(peaks: &mut Vec<PeakCombination>, limit: usize) {
    if peaks.len() <= limit {
        return;
    }

    let keep: Vec<usize> = peaks
        .iter()
        .enumerate()
        .sorted_by(|(i, a), (j, b)| b.frequency_cpd.total_cmp(&a.frequency_cpd).then(i.cmp(j)))
        .take(limit)
        .map(|(i, _)| i)
        .sorted()
        .collect();

    let mut index = 0;
    peaks.retain(|_| {
        let kept = keep.binary_search(&index).is_ok();
        index += 1;
        kept
    });
}

#[cfg(test)]
const GLONASS_F_U: f64 = 2.1281882;
#[cfg(test)]
const GLONASS_F_D: f64 = 0.0028300;

#[test]
fn test_peak_labels() {
    assert_eq!(peak_label(1, 3), "1f_u+3f_d");
    assert_eq!(peak_label(2, -3), "2f_u-3f_d");
    assert_eq!(peak_label(4, 0), "4f_u+0f_d");
}

#[test]
fn test_combination_frequency() {
    let peak = PeakCombination::new(2, -1, GLONASS_F_U, GLONASS_F_D);
    approx::assert_abs_diff_eq!(peak.combined_frequency_cpd, 2.0 * GLONASS_F_U - GLONASS_F_D, epsilon = 1e-12);
    approx::assert_abs_diff_eq!(peak.frequency_cpd, 0.2535464, epsilon = 1e-9);
}

#[test]
fn test_negative_combination_takes_magnitude() {
    let peak = PeakCombination::new(1, -6, 0.001, 0.002);
    approx::assert_abs_diff_eq!(peak.combined_frequency_cpd, 0.011, epsilon = 1e-12);
}

#[test]
fn test_every_combination_appears_exactly_once() {
    let sweep = PeakSweep::default();
    let table = orbital_peaks(GLONASS_F_U, GLONASS_F_D, &sweep).unwrap();

    let expected = sweep.sun_multiples.len() * sweep.draconitic_multiples.clone().count();
    assert_eq!(table.banded_len() + table.unbanded.len(), expected);

    let labels: Vec<&str> = table
        .bands
        .iter()
        .flat_map(|b| b.peaks.iter())
        .chain(table.unbanded.iter())
        .map(|p| p.label.as_str())
        .collect();
    assert_eq!(labels.iter().unique().count(), expected);
}

#[test]
fn test_banded_periods_lie_in_their_band() {
    let table = orbital_peaks(1.7238896, 0.0028104, &PeakSweep::default()).unwrap();
    for band in table.bands.iter() {
        for peak in band.peaks.iter() {
            assert!(band.band.contains(peak.period.days().unwrap()), "{} in {}", peak.label, band.band.name);
        }
    }
}

#[test]
fn test_glonass_bands() {
    let table = orbital_peaks(GLONASS_F_U, GLONASS_F_D, &PeakSweep::default()).unwrap();

    // 1f_u folds to ~0.128 cpd (~7.8 d), 2f_u to ~0.256 cpd (~3.9 d), 4f_u to ~0.487 cpd (~2.05 d)
    let eight = table.band("8d").unwrap();
    assert_eq!(eight.peaks.len(), 13);
    assert!(eight.peaks.iter().all(|p| p.sun_multiple == 1));

    let four = table.band("4d").unwrap();
    assert_eq!(four.peaks.len(), 13);
    assert!(four.peaks.iter().all(|p| p.sun_multiple == 2));

    assert_eq!(table.band("2-7d").unwrap().peaks.len(), 13);
    assert!(table.band("2d").is_none());
    assert!(table.band("1d").is_none());
    assert_eq!(table.bands.len(), 3);
    assert!(table.unbanded.is_empty());
}

#[test]
fn test_band_order_follows_sweep() {
    let table = orbital_peaks(GLONASS_F_U, GLONASS_F_D, &PeakSweep::default()).unwrap();
    let multiples: Vec<i32> = table.band("8d").unwrap().peaks.iter().map(|p| p.draconitic_multiple).collect();
    assert_eq!(multiples, (-6..=6).collect::<Vec<_>>());
}

#[test]
fn test_boundary_policy() {
    let breakpoints = BandBreakpoints::default();
    // upper bound inclusive
    assert_eq!(breakpoints.classify(Period::Days(12.0)), Some(0));
    // lower bound exclusive: 6 days belongs to 4d
    assert_eq!(breakpoints.classify(Period::Days(6.0)), Some(1));
    // overlap: 3.2 days matches both 4d and 2-7d, earlier band wins
    assert_eq!(breakpoints.classify(Period::Days(3.2)), Some(1));
    assert_eq!(breakpoints.classify(Period::Days(3.0)), Some(2));
    assert_eq!(breakpoints.classify(Period::Days(0.5)), None);
    assert_eq!(breakpoints.classify(Period::Days(12.5)), None);
    assert_eq!(breakpoints.classify(Period::Unbounded), None);
}

#[test]
fn test_max_per_band_keeps_highest_in_sweep_order() {
    let sweep = PeakSweep {
        max_per_band: Some(10),
        ..PeakSweep::default()
    };
    let table = orbital_peaks(GLONASS_F_U, GLONASS_F_D, &sweep).unwrap();
    let eight = table.band("8d").unwrap();
    assert_eq!(eight.peaks.len(), 10);
    // frequency grows with d for 1f_u, so the three lowest multiples are dropped
    let multiples: Vec<i32> = eight.peaks.iter().map(|p| p.draconitic_multiple).collect();
    assert_eq!(multiples, (-3..=6).collect::<Vec<_>>());
}

#[test]
fn test_invalid_inputs() {
    assert!(orbital_peaks(0.0, GLONASS_F_D, &PeakSweep::default()).is_err());
    assert!(orbital_peaks(GLONASS_F_U, -1.0, &PeakSweep::default()).is_err());
}

#[test]
fn test_empty_bands_are_not_serialized() {
    let table = orbital_peaks(GLONASS_F_U, GLONASS_F_D, &PeakSweep::default()).unwrap();
    let json = serde_json::to_string(&table).unwrap();
    assert!(json.contains("\"8d\""));
    assert!(!json.contains("\"2d\""));
    assert!(!json.contains("\"1d\""));
    assert!(table.bands.iter().all(|b| !b.peaks.is_empty()));
}
