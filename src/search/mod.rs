// src/search/mod.rs
//! Search pipeline: filter -> keep best record per employer -> order -> present

pub mod chart;
pub mod dedup;
pub mod filters;
pub mod present;
pub mod query;
pub mod summary;

pub use chart::{ChartBar, ChartPayload};
pub use filters::RecordFilter;
pub use present::{DisplayRow, DISPLAY_COLUMNS};
pub use query::{OrgCategory, SearchQuery, YearFilter, ALL_YEARS};

use crate::dataset::EmployerRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchOutcome {
    /// Deduplicated matches before the display limit
    pub total_matches: usize,
    pub showing: usize,
    pub truncated: bool,
    pub rows: Vec<DisplayRow>,
    pub summary: String,
    pub chart: Option<ChartPayload>,
}

impl SearchOutcome {
    pub fn unavailable() -> Self {
        Self {
            total_matches: 0,
            showing: 0,
            truncated: false,
            rows: Vec::new(),
            summary: summary::NO_DATA_SUMMARY.to_string(),
            chart: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FullResults {
    pub total_matches: usize,
    pub rows: Vec<DisplayRow>,
    pub summary: String,
}

/// Filter, deduplicate and order. Every returned record matches the query
/// and no two share a normalized employer name.
pub fn matching_records<'a>(
    records: &'a [EmployerRecord],
    query: &SearchQuery,
) -> Vec<&'a EmployerRecord> {
    let filtered = RecordFilter::new(query).apply(records);
    let mut best = dedup::best_per_employer(filtered);
    best.sort_by(|a, b| present::display_order(a, b));
    best
}

pub fn run(
    records: &[EmployerRecord],
    query: &SearchQuery,
    display_limit: usize,
    chart_top_n: usize,
) -> SearchOutcome {
    let matches = matching_records(records, query);
    let rows = present::to_display_rows(&matches, Some(display_limit));

    SearchOutcome {
        total_matches: matches.len(),
        showing: rows.len(),
        truncated: matches.len() > rows.len(),
        summary: summary::render_summary(matches.len(), &rows),
        chart: chart::state_distribution(&rows, chart_top_n),
        rows,
    }
}

pub fn run_full(records: &[EmployerRecord], query: &SearchQuery) -> FullResults {
    let matches = matching_records(records, query);

    FullResults {
        total_matches: matches.len(),
        rows: present::to_display_rows(&matches, None),
        summary: summary::render_full_summary(matches.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample() -> Vec<EmployerRecord> {
        vec![
            EmployerRecord::new("Acme University", "MA", "2024")
                .with_city("Boston")
                .with_classifications("university")
                .with_cap_exempt(true)
                .with_scores(0.9, 0.95)
                .with_petitions(30),
            EmployerRecord::new("Acme University", "MA", "2025")
                .with_city("Boston")
                .with_classifications("university")
                .with_cap_exempt(true)
                .with_scores(0.92, 0.9)
                .with_petitions(12),
            EmployerRecord::new("City General Hospital", "NY", "2024")
                .with_city("New York")
                .with_classifications("hospital")
                .with_cap_exempt(false)
                .with_scores(0.3, 0.8)
                .with_petitions(8),
            EmployerRecord::new("State Dept of Health", "CA", "2025")
                .with_city("Sacramento")
                .with_classifications("government")
                .with_cap_exempt(true)
                .with_scores(0.7, 0.75),
        ]
    }

    fn normalized_names(rows: &[DisplayRow]) -> HashSet<String> {
        rows.iter()
            .map(|r| crate::utils::normalize_employer_name(&r.employer_name))
            .collect()
    }

    #[test]
    fn test_empty_query_returns_full_deduplicated_dataset() {
        let records = sample();
        let outcome = run(&records, &SearchQuery::default(), 100, 10);

        assert_eq!(outcome.total_matches, 3);
        assert_eq!(outcome.rows.len(), 3);
        assert!(!outcome.truncated);
        assert_eq!(normalized_names(&outcome.rows).len(), outcome.rows.len());
    }

    #[test]
    fn test_cap_exempt_scenario() {
        let records = sample();
        let query = SearchQuery::default()
            .cap_exempt_only(true)
            .with_states(&["MA", "NY"]);
        let outcome = run(&records, &query, 100, 10);

        assert_eq!(outcome.total_matches, 1);
        assert_eq!(outcome.rows[0].employer_name, "Acme University");
        assert_eq!(outcome.rows[0].year, "2025");
        assert!(outcome
            .rows
            .iter()
            .all(|r| r.employer_name != "City General Hospital"));
    }

    #[test]
    fn test_cap_exempt_results_are_subset() {
        let records = sample();
        let all = run(&records, &SearchQuery::default(), 100, 10);
        let exempt = run(&records, &SearchQuery::default().cap_exempt_only(true), 100, 10);

        assert!(exempt.total_matches <= all.total_matches);
        let all_names = normalized_names(&all.rows);
        assert!(normalized_names(&exempt.rows).is_subset(&all_names));

        for row in &exempt.rows {
            let record = records
                .iter()
                .find(|r| r.employer_name == row.employer_name && r.data_year == row.year)
                .unwrap();
            assert!(record.is_likely_cap_exempt(), "{} is not cap-exempt", row.employer_name);
        }
    }

    #[test]
    fn test_display_limit_truncates_but_counts_everything() {
        let records = sample();
        let outcome = run(&records, &SearchQuery::default(), 2, 10);

        assert_eq!(outcome.total_matches, 3);
        assert_eq!(outcome.showing, 2);
        assert!(outcome.truncated);
        assert_eq!(outcome.rows[0].employer_name, "Acme University");
        assert_eq!(outcome.rows[1].employer_name, "City General Hospital");
        assert!(outcome.summary.contains("(top matches)"));
        assert_eq!(outcome.chart.unwrap().bars.len(), 2);
    }

    #[test]
    fn test_no_matches_has_no_chart() {
        let records = sample();
        let outcome = run(&records, &SearchQuery::default().with_text("zzz"), 100, 10);
        assert_eq!(outcome.total_matches, 0);
        assert!(outcome.chart.is_none());
    }

    #[test]
    fn test_full_results_ignore_display_limit() {
        let records = sample();
        let full = run_full(&records, &SearchQuery::default());
        assert_eq!(full.total_matches, 3);
        assert_eq!(full.rows.len(), 3);
    }
}
