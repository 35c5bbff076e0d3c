use crate::aliasing::{AliasedEntry, SamplingInterval};
use crate::constants::{ConstellationConstants, Tide};
use crate::error::Result;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// What a tide is folded against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasTarget {
    /// Plain 24 h sampling.
    Daily,
    /// Sampling at the constellation's ground-repeat frequency.
    Constellation(crate::constants::Constellation),
}

impl fmt::Display for AliasTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasTarget::Daily => f.pad("daily"),
            AliasTarget::Constellation(constellation) => f.pad(constellation.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasTableEntry {
    /// `{tide_name}_{target}`
    pub label: String,
    pub tide: String,
    pub target: AliasTarget,
    pub alias: AliasedEntry,
}

/// Folds every tide against the daily interval and each constellation's
/// ground-repeat interval. Output is grouped by tide, in table order; within a
/// tide, `daily` comes first followed by the constellations in the order given.
pub fn alias_table(tides: &[Tide], constellations: &[ConstellationConstants]) -> Result<Vec<AliasTableEntry>> {
    let mut targets = vec![(AliasTarget::Daily, SamplingInterval::DAILY)];
    for constants in constellations {
        targets.push((
            AliasTarget::Constellation(constants.constellation),
            SamplingInterval::from_frequency(constants.ground_repeat_frequency)?,
        ));
    }

    let mut table = Vec::with_capacity(tides.len() * targets.len());
    for tide in tides {
        for &(target, interval) in targets.iter() {
            table.push(AliasTableEntry {
                label: format!("{}_{}", tide.name, target),
                tide: tide.name.clone(),
                target,
                alias: AliasedEntry::new(tide.frequency, interval),
            });
        }
    }

    Ok(table)
}

#[test]
fn test_table_shape_and_labels() {
    use crate::constants::{CONSTELLATIONS, TIDES};

    let table = alias_table(&TIDES, &CONSTELLATIONS).unwrap();
    assert_eq!(table.len(), 8 * 4);

    let labels: Vec<&str> = table.iter().take(4).map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["145_545_daily", "145_545_gps", "145_545_glonass", "145_545_galileo"]);
    assert_eq!(table[31].label, "M_f_galileo");
}

#[test]
fn test_m2_daily_alias() {
    use crate::constants::TIDES;

    let table = alias_table(&TIDES, &[]).unwrap();
    let m2 = table.iter().find(|e| e.label == "M_2_daily").unwrap();
    // M_2 aliases to the ~14.77 day period in daily solutions
    approx::assert_abs_diff_eq!(m2.alias.aliased_frequency_cpd, 0.0677266, epsilon = 1e-7);
    approx::assert_abs_diff_eq!(m2.alias.aliased_period.days().unwrap(), 14.765, epsilon = 1e-3);
}

#[test]
fn test_constellation_alias_uses_ground_repeat() {
    use crate::constants::{GLONASS, TIDES};

    let table = alias_table(&TIDES, &[*GLONASS]).unwrap();
    let o1 = table.iter().find(|e| e.label == "O_1_glonass").unwrap();
    let f_r = GLONASS.ground_repeat_frequency;
    let expected = (0.9295357 - f_r * (0.9295357_f64 / f_r).round()).abs();
    approx::assert_abs_diff_eq!(o1.alias.aliased_frequency_cpd, expected, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(o1.alias.sampling_interval_hours, 24.0 / f_r, epsilon = 1e-9);
    assert_eq!(o1.target, AliasTarget::Constellation(crate::constants::Constellation::Glonass));
}

#[test]
fn test_invalid_ground_repeat_is_rejected() {
    use crate::constants::{GPS, TIDES};

    let mut broken = *GPS;
    broken.ground_repeat_frequency = 0.0;
    assert!(alias_table(&TIDES, &[broken]).is_err());
}
