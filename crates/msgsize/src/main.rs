mod bootstrap;

use anyhow::{bail, Result};
use msgsize_core::settings::Settings;
use msgsize_data::analysis::analyze_logs;
use msgsize_report::export::write_export;
use msgsize_report::render_report;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("msgsize v{} starting", env!("CARGO_PKG_VERSION"));

    let config = settings.analysis_config()?;
    tracing::debug!(
        "Baseline: {}, Challenger: {}, Variant: {}, Top: {}",
        config.baseline,
        config.challenger,
        config.variant,
        config.top_n
    );

    let analysis = analyze_logs(&settings.log_dir)?;
    if analysis.aggregates.is_empty() {
        bail!(
            "No usable message records found in {}",
            settings.log_dir.display()
        );
    }
    tracing::info!(
        "Analysis finished in {:.2}s ({} size entries rejected)",
        analysis.metadata.load_time_seconds,
        analysis.metadata.sizes_rejected
    );

    print!("{}", render_report(&analysis.aggregates, &config));

    if let Some(path) = settings.export.as_ref() {
        write_export(&analysis.aggregates, path)?;
        println!("Exported statistics to {}", path.display());
    }

    Ok(())
}
