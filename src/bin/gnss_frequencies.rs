use anyhow::Context;
use gnss_frequencies::catalog::{CatalogConfig, FrequencyCatalog};
use gnss_frequencies::report::write_report;
use log::info;
use num_format::{Locale, ToFormattedString};
use std::io::Write;

const DEFAULT_OUTPUT: &str = "gnss_frequencies.json";

/// Usage: gnss_frequencies [OUTPUT_JSON] [CONFIG_JSON]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let config = match args.next() {
        Some(path) => CatalogConfig::read_json(&path).with_context(|| format!("failed to load config from {path}"))?,
        None => CatalogConfig::default(),
    };

    let catalog = FrequencyCatalog::build(&config).context("failed to build frequency catalog")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&catalog, &mut out).context("failed to write report")?;
    out.flush()?;

    let bytes = catalog
        .write_json(&output)
        .with_context(|| format!("failed to write {output}"))?;
    info!(
        "saved {} frequencies to {output} ({} bytes, {:.1} KB)",
        catalog.summary().total_frequencies,
        bytes.to_formatted_string(&Locale::en),
        bytes as f64 / 1024.0
    );

    Ok(())
}
