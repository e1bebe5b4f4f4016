use serde::{Deserialize, Serialize};

/// Geographic granularity of a dataset.
///
/// Each granularity has its own API filter, cache file, GeoJSON file and
/// GeoJSON name property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaKind {
    /// European Electoral Regions ("region" in the API).
    Region,
    /// Lower-tier local authorities.
    Ltla,
}

impl AreaKind {
    /// Value of the `areaType` filter sent to the API
    pub fn api_area_type(&self) -> &'static str {
        match self {
            AreaKind::Region => "region",
            AreaKind::Ltla => "ltla",
        }
    }

    pub fn cache_file_name(&self) -> &'static str {
        match self {
            AreaKind::Region => "regional_covid_data.json",
            AreaKind::Ltla => "ltlas_covid_data.json",
        }
    }

    pub fn geojson_file_name(&self) -> &'static str {
        match self {
            AreaKind::Region => "EER.json",
            AreaKind::Ltla => "LAD.json",
        }
    }

    /// Feature property holding the area name in the matching GeoJSON file
    pub fn name_property(&self) -> &'static str {
        match self {
            AreaKind::Region => "eer16nm",
            AreaKind::Ltla => "lad17nm",
        }
    }

    /// Short label used in log lines and user notices
    pub fn label(&self) -> &'static str {
        match self {
            AreaKind::Region => "regional",
            AreaKind::Ltla => "ltla",
        }
    }
}

impl std::fmt::Display for AreaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaKind::Region => write!(f, "Region"),
            AreaKind::Ltla => write!(f, "LTLA"),
        }
    }
}

/// Which case count a table is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseKind {
    #[default]
    Cumulative,
    Delta,
}

impl CaseKind {
    pub fn from_cumulative(cumulative: bool) -> Self {
        if cumulative {
            CaseKind::Cumulative
        } else {
            CaseKind::Delta
        }
    }

    /// Property key the merged time series is stored under in GeoJSON output
    pub fn geojson_key(&self) -> &'static str {
        match self {
            CaseKind::Cumulative => "Total",
            CaseKind::Delta => "Delta",
        }
    }
}
