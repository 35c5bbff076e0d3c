//! Plain text rendering of a `FrequencyCatalog`.

use crate::catalog::{ConstellationCatalog, FrequencyCatalog, NamedFrequency};
use crate::utils::Period;
use itertools::Itertools;
use std::io::{self, Write};

const RULE_WIDTH: usize = 80;

const REFERENCES: [&str; 5] = [
    "References:",
    "- Zajdel et al. (2022): Orbital artifacts in multi-GNSS precise point positioning",
    "  time series. J. Geophys. Res. Solid Earth, 127(2), 19.",
    "- Rebischung et al. (2024): Analysis of the IGS contribution to ITRF2020.",
    "  Journal of Geodesy, 98(6), 49.",
];

fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(40))
}

fn named_line(out: &mut impl Write, indent: &str, name: &str, frequency_cpd: f64, period: Period) -> io::Result<()> {
    writeln!(out, "{indent}{name:30}: {frequency_cpd:12.7} cpd ({period:8.3} days)")
}

fn named_section(out: &mut impl Write, frequencies: &[NamedFrequency]) -> io::Result<()> {
    for f in frequencies {
        named_line(out, "", &f.name, f.frequency_cpd, f.period)?;
    }
    writeln!(out)
}

fn constellation_section(out: &mut impl Write, c: &ConstellationCatalog) -> io::Result<()> {
    let display = c.constellation.display_name();

    heading(out, &format!("{} FREQUENCIES", display.to_uppercase()))?;
    for f in c.base_frequencies.iter() {
        named_line(out, "", &f.name, f.frequency_cpd, f.period)?;
    }

    writeln!(out, "\n  {display} Draconitic Harmonics:")?;
    for h in c.draconitic_harmonics.iter() {
        let name = format!("{:2}f_d^{display}", h.index);
        named_line(out, "    ", &name, h.frequency_cpd, h.period)?;
    }

    if let Some(peaks) = c.orbital_peaks.as_ref() {
        writeln!(out, "\n  {display} Orbital Peaks (Rebischung et al. 2024 method):")?;
        for band in peaks.bands.iter() {
            writeln!(out, "    {}_peaks:", band.band.name)?;
            for p in band.peaks.iter() {
                writeln!(out, "      {:<20}: {:12.7} cpd ({:8.3} days)", p.label, p.frequency_cpd, p.period)?;
            }
        }
    }

    writeln!(out, "\n  {display} Orbital Signals (Zajdel et al. 2022 method):")?;
    for s in c.orbital_signals.iter() {
        // Periods of sub-cpd signals read better in days
        let (period, unit) = if s.frequency_cpd < 1.0 {
            (s.orbital_period_hours / 24.0, "days")
        } else {
            (s.orbital_period_hours, "hrs")
        };
        writeln!(
            out,
            "    {:<12}: {:12.7} cpd ({:8.3} {}) -> aliased: {:8.3} days",
            s.label, s.frequency_cpd, period, unit, s.aliased.aliased_period
        )?;
    }
    writeln!(out)
}

/// Writes the full report: every catalog section followed by summary statistics.
pub fn write_report(catalog: &FrequencyCatalog, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "COMPREHENSIVE GNSS AND TIDAL FREQUENCY REPORT")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "All frequencies are given in cycles per day (cpd)")?;
    writeln!(out, "Corresponding periods are shown in parentheses")?;
    writeln!(out)?;
    for line in REFERENCES {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;

    heading(out, "EARTH REFERENCE FREQUENCIES")?;
    named_section(out, &catalog.earth)?;

    for c in catalog.constellations.iter() {
        constellation_section(out, c)?;
    }

    heading(out, "TIDAL FREQUENCIES")?;
    named_section(out, &catalog.tides)?;

    heading(out, "ANNUAL HARMONICS")?;
    for h in catalog.annual.iter() {
        named_line(out, "", &format!("{:2}f_annual", h.index), h.frequency_cpd, h.period)?;
    }
    writeln!(out)?;

    heading(out, "ALIAS FREQUENCIES")?;
    for a in catalog.aliases.iter().sorted_by(|a, b| a.label.cmp(&b.label)) {
        named_line(out, "", &a.label, a.alias.aliased_frequency_cpd, a.alias.aliased_period)?;
    }
    writeln!(out)?;

    heading(out, "SUMMARY STATISTICS")?;
    let summary = catalog.summary();
    writeln!(out, "Total number of frequencies: {}", summary.total_frequencies)?;
    if let Some(range) = summary.frequency_range.as_ref() {
        writeln!(out, "Frequency range: {:.7} to {:.7} cpd", range.min_cpd, range.max_cpd)?;
        writeln!(out, "Period range: {:.3} to {:.3} days", range.min_period_days, range.max_period_days)?;
    }
    writeln!(out, "\nFrequencies by category:")?;
    for counts in summary.constellations.iter() {
        writeln!(out, "  {}: {} frequencies", counts.constellation.name().to_uppercase(), counts.total())?;
        writeln!(out, "    draconitic_harmonics: {}", counts.draconitic_harmonics)?;
        if let Some(peaks) = counts.orbital_peaks {
            writeln!(out, "    orbital_peaks: {peaks}")?;
        }
        writeln!(out, "    orbital_signals: {}", counts.orbital_signals)?;
    }
    writeln!(out, "  TIDES: {} frequencies", summary.tides)?;
    writeln!(out, "  ANNUAL: {} frequencies", summary.annual)?;
    writeln!(out, "  ALIASES: {} frequencies", summary.aliases)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

#[test]
fn test_report_has_every_section() {
    use crate::catalog::CatalogConfig;

    let catalog = FrequencyCatalog::build(&CatalogConfig::default()).unwrap();
    let mut buffer = vec![];
    write_report(&catalog, &mut buffer).unwrap();
    let report = String::from_utf8(buffer).unwrap();

    for section in [
        "EARTH REFERENCE FREQUENCIES",
        "GPS FREQUENCIES",
        "GLONASS FREQUENCIES",
        "GALILEO FREQUENCIES",
        "GLONASS Orbital Peaks",
        "8d_peaks:",
        "TIDAL FREQUENCIES",
        "ANNUAL HARMONICS",
        "ALIAS FREQUENCIES",
        "SUMMARY STATISTICS",
    ] {
        assert!(report.contains(section), "missing {section}");
    }
    assert!(!report.contains("GPS Orbital Peaks"));
    assert!(report.contains("n0_m1       :    2.0055152 cpd (  11.967 hrs) -> aliased:  181.318 days"));
}

#[test]
fn test_unbounded_period_renders() {
    let mut buffer = vec![];
    named_line(&mut buffer, "", "zero", 0.0, Period::Unbounded).unwrap();
    let line = String::from_utf8(buffer).unwrap();
    assert!(line.contains("(unbounded days)"));
}

#[test]
fn test_report_header_cites_references() {
    use crate::catalog::CatalogConfig;

    let catalog = FrequencyCatalog::build(&CatalogConfig::default()).unwrap();
    let mut buffer = vec![];
    write_report(&catalog, &mut buffer).unwrap();
    let report = String::from_utf8(buffer).unwrap();

    let references = report.find("References:").expect("no references block");
    assert!(references < report.find("EARTH REFERENCE FREQUENCIES").unwrap());
    assert!(report.contains("- Zajdel et al. (2022): Orbital artifacts in multi-GNSS precise point positioning"));
    assert!(report.contains("- Rebischung et al. (2024): Analysis of the IGS contribution to ITRF2020."));
}
