//! Text and JSON output modes.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use covidcases_core::{CacheSnapshot, CaseTable, SnapshotOrigin};
use geojson::FeatureCollection;
use tracing::{debug, warn};

/// One area name per line, in column order
pub fn write_area_names<W: Write>(table: &CaseTable, out: &mut W) -> io::Result<()> {
    for name in table.columns() {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

pub fn write_table<W: Write>(table: &CaseTable, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", table)
}

/// Write the merged collection to `path`, or stdout when there is none.
/// A file that cannot be written is reported and skipped.
pub fn export_geojson<W: Write>(
    collection: &FeatureCollection,
    path: Option<&Path>,
    stdout: &mut W,
) -> Result<()> {
    let json = serde_json::to_string(collection)?;
    match path {
        Some(path) => match std::fs::write(path, json) {
            Ok(()) => debug!(path = %path.display(), "Wrote GeoJSON"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to write GeoJSON");
                eprintln!("Could not save to file: {}", e);
            }
        },
        None => writeln!(stdout, "{}", json)?,
    }
    Ok(())
}

/// Tell the user where the data came from when it was not a plain cache hit
pub fn origin_notice(snapshot: &CacheSnapshot, label: &str) -> Option<String> {
    match &snapshot.origin {
        SnapshotOrigin::Cache => None,
        SnapshotOrigin::Fetched => Some(format!("Fetched new {} data.", label)),
        SnapshotOrigin::StaleFallback { reason } => Some(format!(
            "Failed to acquire data, running in offline mode ({}).\nUsing {} data cached {}.",
            reason,
            label,
            snapshot.age_display()
        )),
    }
}
