use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    binning::{bin_series, AggregateMode, FactField, GraphPoint, BLOCK_WEEK},
    block_facts::ExplorerDb,
};

/// The companion static page loads this file with a script tag.
pub const DEFAULT_DATA_SCRIPT_PATH: &str = "frontend/data.js";

const DATA_SCRIPT_PREFIX: &str = "var data = ";

/// Serialize the series as a `var data = [...]` script fragment and swap it
/// into place atomically: the bytes land in a temp file in the destination
/// directory first, then a rename replaces the old file. A reader of the old
/// script never observes a partial write, and earlier failures leave the
/// destination untouched.
pub fn write_data_script(series: &[GraphPoint], path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    file.write_all(DATA_SCRIPT_PREFIX.as_bytes())?;
    serde_json::to_writer(&mut file, series)?;
    file.flush()?;
    file.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    debug!(points = series.len(), "wrote data script to {}", path.display());
    Ok(())
}

/// Read the store, bin the chosen field, and refresh the frontend's data
/// script.
pub fn update_frontend_data(
    db_path: &Path,
    field: FactField,
    output: &Path,
    mode: AggregateMode,
) -> Result<()> {
    let facts = ExplorerDb::open(db_path)?.read_block_facts()?;
    let series = bin_series(&facts, BLOCK_WEEK, field, mode)?;
    write_data_script(&series, output)?;
    info!(
        points = series.len(),
        "data script for {field} generated, open frontend/index.html"
    );
    Ok(())
}
