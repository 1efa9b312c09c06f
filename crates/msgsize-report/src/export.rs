use std::path::Path;

use msgsize_core::aggregate::AggregateSet;
use msgsize_core::error::{AnalyzerError, Result};
use msgsize_core::export::ExportDocument;
use tracing::info;

/// Write per-type statistics for every aggregate as pretty-printed JSON.
///
/// An existing file at `path` is overwritten.
pub fn write_export(aggregates: &AggregateSet, path: &Path) -> Result<()> {
    let document = ExportDocument::from_aggregates(aggregates);
    let json = document.to_json_pretty()?;

    std::fs::write(path, json).map_err(|source| AnalyzerError::Export {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Exported {} entries to {}", document.len(), path.display());
    Ok(())
}
