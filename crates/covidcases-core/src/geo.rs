//! Merge case time series into GeoJSON features.
//!
//! Each feature is matched to a table column by its area-name property
//! (`eer16nm` for regions, `lad17nm` for local authorities). A match gains
//! a `{ "<unix timestamp>": value }` object under `Total` or `Delta`;
//! anything that cannot be matched gets the placeholder `[0]` so a single
//! bad feature never spoils the export.

use std::path::{Path, PathBuf};

use geojson::{FeatureCollection, GeoJson};
use serde_json::{json, Map, Number, Value};
use thiserror::Error;
use tracing::debug;

use crate::models::{AreaKind, CaseKind};
use crate::table::CaseTable;
use crate::utils::date_timestamp;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Failed to read GeoJSON file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse GeoJSON file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: geojson::Error,
    },

    #[error("GeoJSON file {} is not a FeatureCollection", path.display())]
    NotACollection { path: PathBuf },
}

/// Read a GeoJSON feature collection from disk
pub fn load_feature_collection(path: &Path) -> Result<FeatureCollection, GeoError> {
    let contents = std::fs::read_to_string(path).map_err(|source| GeoError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let geojson: GeoJson = contents.parse().map_err(|source| GeoError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        _ => Err(GeoError::NotACollection {
            path: path.to_path_buf(),
        }),
    }
}

/// Value attached to features with no usable time series
pub fn placeholder() -> Value {
    json!([0])
}

/// Timestamp -> value object for one area column, in ascending date order.
/// Empty and NaN cells are dropped. `None` if the column does not exist or
/// a date or value cannot be represented.
pub fn series_object(table: &CaseTable, name: &str) -> Option<Value> {
    let series = table.series(name)?;
    let mut object = Map::new();
    for (date, value) in series {
        let Some(value) = value.filter(|v| !v.is_nan()) else {
            continue;
        };
        let timestamp = date_timestamp(date)?;
        object.insert(timestamp.to_string(), Value::Number(Number::from_f64(value)?));
    }
    Some(Value::Object(object))
}

/// Attach each feature's time series under `kind`'s key, matching features
/// to table columns by the name property of `area`.
pub fn merge_into_features(
    table: &CaseTable,
    mut collection: FeatureCollection,
    area: AreaKind,
    kind: CaseKind,
) -> FeatureCollection {
    let key = kind.geojson_key();
    let mut matched = 0;

    for feature in collection.features.iter_mut() {
        let series = feature
            .property(area.name_property())
            .and_then(Value::as_str)
            .and_then(|name| series_object(table, name));

        let value = match series {
            Some(series) => {
                matched += 1;
                series
            }
            None => placeholder(),
        };
        feature.set_property(key, value);
    }

    debug!(
        features = collection.features.len(),
        matched,
        key,
        "Merged case data into GeoJSON"
    );
    collection
}
