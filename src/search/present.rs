// src/search/present.rs
use super::dedup::desc_present_first;
use crate::dataset::EmployerRecord;
use crate::utils::round_to;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DISPLAY_COLUMNS: [&str; 7] = [
    "Employer Name",
    "City",
    "State",
    "Cap-Exempt Score",
    "Approval Rate",
    "Total Petitions",
    "Year",
];

const SCORE_DECIMALS: i32 = 3;

/// One row of the results table, keyed by its display column names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayRow {
    #[serde(rename = "Employer Name")]
    pub employer_name: String,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Cap-Exempt Score")]
    pub cap_exempt_score: Option<f64>,
    #[serde(rename = "Approval Rate")]
    pub approval_rate: Option<f64>,
    #[serde(rename = "Total Petitions")]
    pub total_petitions: Option<u64>,
    #[serde(rename = "Year")]
    pub year: String,
}

impl From<&EmployerRecord> for DisplayRow {
    fn from(record: &EmployerRecord) -> Self {
        Self {
            employer_name: record.employer_name.clone(),
            city: record.city.clone(),
            state: record.state.clone(),
            cap_exempt_score: record.cap_exempt_score.map(|v| round_to(v, SCORE_DECIMALS)),
            approval_rate: record.approval_rate.map(|v| round_to(v, SCORE_DECIMALS)),
            total_petitions: record.total_petitions,
            year: record.data_year.clone(),
        }
    }
}

/// Table order: employer name ascending (case-insensitive), then total
/// petitions descending.
pub fn display_order(a: &EmployerRecord, b: &EmployerRecord) -> Ordering {
    a.employer_name
        .to_lowercase()
        .cmp(&b.employer_name.to_lowercase())
        .then_with(|| a.employer_name.cmp(&b.employer_name))
        .then_with(|| desc_present_first(a.total_petitions, b.total_petitions))
}

pub fn to_display_rows(records: &[&EmployerRecord], limit: Option<usize>) -> Vec<DisplayRow> {
    let take = limit.unwrap_or(records.len());
    records.iter().take(take).map(|r| DisplayRow::from(*r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_row_rounds_scores() {
        let record = EmployerRecord::new("Acme University", "MA", "2024")
            .with_city("Boston")
            .with_scores(0.87654, 0.91)
            .with_petitions(7);

        let row = DisplayRow::from(&record);
        assert_eq!(row.cap_exempt_score, Some(0.877));
        assert_eq!(row.approval_rate, Some(0.91));
        assert_eq!(row.year, "2024");
    }

    #[test]
    fn test_display_order() {
        let beta = EmployerRecord::new("beta labs", "CA", "2024");
        let alpha_small = EmployerRecord::new("Alpha", "NY", "2024").with_petitions(2);
        let alpha_big = EmployerRecord::new("Alpha", "NJ", "2024").with_petitions(20);

        let mut records = vec![&beta, &alpha_small, &alpha_big];
        records.sort_by(|a, b| display_order(a, b));

        assert_eq!(records[0].state, "NJ");
        assert_eq!(records[1].state, "NY");
        assert_eq!(records[2].employer_name, "beta labs");
    }

    #[test]
    fn test_serialized_row_uses_display_columns() {
        let row = DisplayRow::from(&EmployerRecord::new("Acme", "MA", "2024"));
        let json = serde_json::to_value(&row).unwrap();
        let object = json.as_object().unwrap();

        for column in DISPLAY_COLUMNS {
            assert!(object.contains_key(column), "missing {}", column);
        }
        assert_eq!(object.len(), DISPLAY_COLUMNS.len());
    }
}
