use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CaseKind;

/// One daily observation for one area, as returned by the case API.
///
/// Counts are nullable: the API reports `null` for days it has no figure for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub date: NaiveDate,
    #[serde(rename = "areaName")]
    pub area_name: String,
    #[serde(rename = "areaCode", default)]
    pub area_code: Option<String>,
    #[serde(rename = "newCasesBySpecimenDate", default)]
    pub new_cases: Option<i64>,
    #[serde(rename = "cumCasesBySpecimenDate", default)]
    pub cum_cases: Option<i64>,
    #[serde(rename = "newDeathsByDeathDate", default)]
    pub new_deaths: Option<i64>,
    #[serde(rename = "cumDeathsByDeathDate", default)]
    pub cum_deaths: Option<i64>,
}

impl CaseRecord {
    /// The case count this record contributes to a table of the given kind
    pub fn case_count(&self, kind: CaseKind) -> Option<i64> {
        match kind {
            CaseKind::Cumulative => self.cum_cases,
            CaseKind::Delta => self.new_cases,
        }
    }
}

/// Typed view of a case API document.
///
/// Only `data` is required. Any other top-level keys the API sends
/// (`length`, `totalPages`, ...) are ignored here; the cache keeps the
/// document on disk exactly as it was fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseResponse {
    pub data: Vec<CaseRecord>,
    #[serde(rename = "lastUpdate", default)]
    pub last_update: Option<String>,
}

impl CaseResponse {
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Distinct area names in order of first appearance
    pub fn area_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.data
            .iter()
            .filter(|r| seen.insert(r.area_name.as_str()))
            .map(|r| r.area_name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_record() {
        let json = r#"{
            "date": "2020-11-03",
            "areaName": "North East",
            "areaCode": "E12000001",
            "newCasesBySpecimenDate": 1204,
            "cumCasesBySpecimenDate": 45012,
            "newDeathsByDeathDate": null,
            "cumDeathsByDeathDate": 2101
        }"#;
        let record: CaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2020, 11, 3).unwrap());
        assert_eq!(record.area_name, "North East");
        assert_eq!(record.area_code.as_deref(), Some("E12000001"));
        assert_eq!(record.case_count(CaseKind::Delta), Some(1204));
        assert_eq!(record.case_count(CaseKind::Cumulative), Some(45012));
        assert_eq!(record.new_deaths, None);
    }

    #[test]
    fn test_missing_counts_default_to_none() {
        let json = r#"{"date": "2020-01-01", "areaName": "X", "cumCasesBySpecimenDate": 5}"#;
        let record: CaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.cum_cases, Some(5));
        assert_eq!(record.new_cases, None);
        assert_eq!(record.area_code, None);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let json = r#"{"date": "03/11/2020", "areaName": "X"}"#;
        assert!(serde_json::from_str::<CaseRecord>(json).is_err());
    }

    #[test]
    fn test_missing_area_name_rejected() {
        let json = r#"{"date": "2020-01-01"}"#;
        assert!(serde_json::from_str::<CaseRecord>(json).is_err());
    }

    #[test]
    fn test_response_ignores_extra_keys() {
        let value = serde_json::json!({
            "data": [
                {"date": "2020-01-02", "areaName": "B"},
                {"date": "2020-01-02", "areaName": "A"},
                {"date": "2020-01-01", "areaName": "B"}
            ],
            "lastUpdate": "2020-01-03T15:00:00.000000Z",
            "length": 3,
            "totalPages": 1
        });
        let response = CaseResponse::from_value(value).unwrap();
        assert_eq!(response.data.len(), 3);
        assert_eq!(response.area_names(), vec!["B", "A"]);
        assert!(response.last_update.is_some());
    }
}
