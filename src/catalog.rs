//! Assembles every generator's output into one catalog, and the summary
//! statistics and JSON persistence that go with it.

use crate::aliases::{alias_table, AliasTableEntry};
use crate::constants::{
    Constellation, ConstellationConstants, EarthConstants, Tide, ANNUAL_HARMONICS, CONSTELLATIONS,
    DRACONITIC_HARMONICS, TIDES,
};
use crate::error::Result;
use crate::harmonics::{annual_harmonics, draconitic_harmonics, Harmonic};
use crate::orbital::peaks::{orbital_peaks, PeakSweep, PeakTable};
use crate::orbital::signals::{orbital_signals, OrbitalSignal, SignalSweep};
use crate::utils::{cpd_to_days, Period};
use log::info;
use rayon::prelude::*;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

/// Everything the catalog is built from. Missing fields in a JSON config take
/// their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub earth: EarthConstants,
    pub constellations: Vec<ConstellationConstants>,
    pub tides: Vec<Tide>,
    pub draconitic_harmonics: usize,
    pub annual_harmonics: usize,
    pub signal_sweep: SignalSweep,
    pub peak_sweep: PeakSweep,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            earth: EarthConstants::default(),
            constellations: CONSTELLATIONS.clone(),
            tides: TIDES.clone(),
            draconitic_harmonics: DRACONITIC_HARMONICS,
            annual_harmonics: ANNUAL_HARMONICS,
            signal_sweep: SignalSweep::default(),
            peak_sweep: PeakSweep::default(),
        }
    }
}

impl CatalogConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.earth.validate()?;
        for constants in self.constellations.iter() {
            constants.validate()?;
        }
        for tide in self.tides.iter() {
            crate::error::require_positive(&format!("tide.{}", tide.name), tide.frequency)?;
        }
        Ok(())
    }
}

/// A named scalar frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedFrequency {
    pub name: String,
    pub frequency_cpd: f64,
    pub period: Period,
}

impl NamedFrequency {
    pub fn new(name: &str, frequency_cpd: f64) -> Self {
        NamedFrequency {
            name: name.to_string(),
            frequency_cpd,
            period: cpd_to_days(frequency_cpd),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationCatalog {
    pub constellation: Constellation,
    pub base_frequencies: Vec<NamedFrequency>,
    pub draconitic_harmonics: Vec<Harmonic>,
    /// Only for constellations with a sun argument-of-latitude frequency.
    pub orbital_peaks: Option<PeakTable>,
    pub orbital_signals: Vec<OrbitalSignal>,
}

impl ConstellationCatalog {
    pub fn build(constants: &ConstellationConstants, earth: &EarthConstants, config: &CatalogConfig) -> Result<Self> {
        let base_frequencies = constants
            .base_frequencies()
            .into_iter()
            .map(|(name, f)| NamedFrequency::new(name, f))
            .collect();

        let draconitic_harmonics = draconitic_harmonics(constants.draconitic_frequency, config.draconitic_harmonics)?;

        let orbital_peaks = match constants.sun_arg_lat_frequency {
            Some(f_u) => Some(orbital_peaks(f_u, constants.draconitic_frequency, &config.peak_sweep)?),
            None => None,
        };

        let orbital_signals = orbital_signals(
            constants.satellite_period_hours,
            earth.rotation_period_hours,
            &config.signal_sweep,
        )?;

        Ok(ConstellationCatalog {
            constellation: constants.constellation,
            base_frequencies,
            draconitic_harmonics,
            orbital_peaks,
            orbital_signals,
        })
    }

    fn peak_count(&self) -> usize {
        self.orbital_peaks.as_ref().map_or(0, PeakTable::banded_len)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyCatalog {
    pub earth: Vec<NamedFrequency>,
    pub constellations: Vec<ConstellationCatalog>,
    pub tides: Vec<NamedFrequency>,
    pub annual: Vec<Harmonic>,
    pub aliases: Vec<AliasTableEntry>,
}

impl FrequencyCatalog {
    /// Validates the configuration, then runs every generator. Constellations
    /// are independent and are built in parallel; output keeps config order.
    pub fn build(config: &CatalogConfig) -> Result<Self> {
        config.validate()?;

        let earth = vec![
            NamedFrequency::new("angular_speed", config.earth.angular_speed),
            NamedFrequency::new("orbital_frequency", config.earth.orbital_frequency),
        ];

        let constellations = config
            .constellations
            .par_iter()
            .map(|constants| ConstellationCatalog::build(constants, &config.earth, config))
            .collect::<Result<Vec<_>>>()?;

        let tides = config
            .tides
            .iter()
            .map(|tide| NamedFrequency::new(&tide.name, tide.frequency))
            .collect();

        let annual = annual_harmonics(config.earth.orbital_frequency, config.annual_harmonics)?;
        let aliases = alias_table(&config.tides, &config.constellations)?;

        let catalog = FrequencyCatalog {
            earth,
            constellations,
            tides,
            annual,
            aliases,
        };
        info!(
            "built catalog for {} constellations with {} frequencies",
            catalog.constellations.len(),
            catalog.summary().total_frequencies
        );

        Ok(catalog)
    }

    pub fn constellation(&self, constellation: Constellation) -> Option<&ConstellationCatalog> {
        self.constellations.iter().find(|c| c.constellation == constellation)
    }

    /// Every frequency value held by the catalog. Orbital signals contribute
    /// both their unaliased and aliased frequency.
    pub fn frequencies(&self) -> Vec<f64> {
        let mut all = vec![];
        all.extend(self.earth.iter().map(|f| f.frequency_cpd));
        for c in self.constellations.iter() {
            all.extend(c.base_frequencies.iter().map(|f| f.frequency_cpd));
            all.extend(c.draconitic_harmonics.iter().map(|h| h.frequency_cpd));
            if let Some(peaks) = c.orbital_peaks.as_ref() {
                all.extend(peaks.bands.iter().flat_map(|b| b.peaks.iter()).map(|p| p.frequency_cpd));
            }
            for s in c.orbital_signals.iter() {
                all.push(s.frequency_cpd);
                all.push(s.aliased.aliased_frequency_cpd);
            }
        }
        all.extend(self.tides.iter().map(|t| t.frequency_cpd));
        all.extend(self.annual.iter().map(|h| h.frequency_cpd));
        all.extend(self.aliases.iter().map(|a| a.alias.aliased_frequency_cpd));
        all
    }

    pub fn summary(&self) -> CatalogSummary {
        let positive: Vec<f64> = self.frequencies().into_iter().filter(|&f| f > 0.0).collect();

        let frequency_range = if positive.is_empty() {
            None
        } else {
            let min_cpd = positive.iter().copied().fold(f64::INFINITY, f64::min);
            let max_cpd = positive.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Some(FrequencyRange {
                min_cpd,
                max_cpd,
                min_period_days: max_cpd.recip(),
                max_period_days: min_cpd.recip(),
            })
        };

        let constellations = self
            .constellations
            .iter()
            .map(|c| ConstellationCounts {
                constellation: c.constellation,
                draconitic_harmonics: c.draconitic_harmonics.len(),
                orbital_peaks: c.orbital_peaks.as_ref().map(|_| c.peak_count()),
                orbital_signals: c.orbital_signals.len(),
            })
            .collect();

        CatalogSummary {
            total_frequencies: positive.len(),
            frequency_range,
            constellations,
            tides: self.tides.len(),
            annual: self.annual.len(),
            aliases: self.aliases.len(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes pretty JSON to `path` and returns the number of bytes written.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<usize> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), &json)?;
        info!("wrote catalog to {}", path.as_ref().display());
        Ok(json.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub min_cpd: f64,
    pub max_cpd: f64,
    pub min_period_days: f64,
    pub max_period_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationCounts {
    pub constellation: Constellation,
    pub draconitic_harmonics: usize,
    pub orbital_peaks: Option<usize>,
    pub orbital_signals: usize,
}

impl ConstellationCounts {
    pub fn total(&self) -> usize {
        self.draconitic_harmonics + self.orbital_peaks.unwrap_or(0) + self.orbital_signals
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    /// Number of strictly positive frequencies in the catalog.
    pub total_frequencies: usize,
    /// `None` for a catalog without any positive frequency.
    pub frequency_range: Option<FrequencyRange>,
    pub constellations: Vec<ConstellationCounts>,
    pub tides: usize,
    pub annual: usize,
    pub aliases: usize,
}

#[test]
fn test_default_catalog_shape() {
    let catalog = FrequencyCatalog::build(&CatalogConfig::default()).unwrap();

    let order: Vec<Constellation> = catalog.constellations.iter().map(|c| c.constellation).collect();
    assert_eq!(order, [Constellation::Gps, Constellation::Glonass, Constellation::Galileo]);

    let gps = catalog.constellation(Constellation::Gps).unwrap();
    assert_eq!(gps.draconitic_harmonics.len(), 15);
    assert_eq!(gps.orbital_signals.len(), 28);
    assert!(gps.orbital_peaks.is_none());

    let glonass = catalog.constellation(Constellation::Glonass).unwrap();
    assert_eq!(glonass.orbital_peaks.as_ref().unwrap().banded_len(), 39);

    assert_eq!(catalog.earth.len(), 2);
    assert_eq!(catalog.tides.len(), 8);
    assert_eq!(catalog.annual.len(), 12);
    assert_eq!(catalog.aliases.len(), 32);
}

#[test]
fn test_summary_counts() {
    let catalog = FrequencyCatalog::build(&CatalogConfig::default()).unwrap();
    let summary = catalog.summary();

    assert_eq!(summary.tides, 8);
    assert_eq!(summary.annual, 12);
    assert_eq!(summary.aliases, 32);
    assert_eq!(summary.constellations[0].orbital_peaks, None);
    assert_eq!(summary.constellations[1].orbital_peaks, Some(39));
    assert_eq!(summary.constellations[2].total(), 15 + 39 + 28);

    // 359 values in total; the three negative nodal precession rates are not counted
    assert_eq!(catalog.frequencies().len(), 359);
    assert_eq!(summary.total_frequencies, 356);

    // lowest is the GPS n-2_m1 signal (~65 years), highest the unaliased GLONASS n2_m4
    let range = summary.frequency_range.unwrap();
    approx::assert_relative_eq!(range.min_cpd, 4.1895906885414114e-5, max_relative = 1e-9);
    approx::assert_relative_eq!(range.max_cpd, 10.528200543528836, max_relative = 1e-9);
    approx::assert_relative_eq!(range.min_period_days, range.max_cpd.recip());
    approx::assert_relative_eq!(range.max_period_days, range.min_cpd.recip());
}

#[test]
fn test_build_is_reproducible() {
    let config = CatalogConfig::default();
    let first = FrequencyCatalog::build(&config).unwrap();
    let second = FrequencyCatalog::build(&config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_constant_fails_build() {
    let mut config = CatalogConfig::default();
    config.constellations[1].draconitic_frequency = 0.0;
    match FrequencyCatalog::build(&config) {
        Err(crate::error::FrequencyError::InvalidConstant { name, .. }) => {
            assert_eq!(name, "glonass.draconitic_frequency")
        }
        other => panic!("expected InvalidConstant, got {other:?}"),
    }
}

#[test]
fn test_json_round_trip() {
    let catalog = FrequencyCatalog::build(&CatalogConfig::default()).unwrap();
    let json = catalog.to_json().unwrap();
    assert!(json.contains("\"n0_m1\""));
    assert!(json.contains("\"1f_u+0f_d\""));

    // every float must come back bit for bit
    let restored = FrequencyCatalog::from_json(&json).unwrap();
    assert_eq!(restored, catalog);
    assert_eq!(restored.frequencies(), catalog.frequencies());
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = CatalogConfig::from_json(r#"{ "draconitic_harmonics": 4 }"#).unwrap();
    assert_eq!(config.draconitic_harmonics, 4);
    assert_eq!(config.constellations.len(), 3);
    assert_eq!(config.peak_sweep, PeakSweep::default());

    let catalog = FrequencyCatalog::build(&config).unwrap();
    assert!(catalog.constellations.iter().all(|c| c.draconitic_harmonics.len() == 4));
}
