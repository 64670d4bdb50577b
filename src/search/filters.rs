// src/search/filters.rs
use super::query::{SearchQuery, YearFilter};
use crate::dataset::EmployerRecord;
use crate::utils::{normalize_state, split_city_state, title_case};
use std::collections::HashSet;

/// A `SearchQuery` compiled into predicates. Inactive dimensions are `None`
/// and every active dimension must match.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    text: Option<String>,
    states: Option<HashSet<String>>,
    cities: Option<Vec<(String, String)>>,
    keywords: Option<Vec<&'static str>>,
    cap_exempt_only: bool,
    min_score: f64,
    min_approval: f64,
    year: YearFilter,
}

impl RecordFilter {
    pub fn new(query: &SearchQuery) -> Self {
        let text = Some(query.text.trim().to_lowercase()).filter(|t| !t.is_empty());

        let states: HashSet<String> = query
            .states
            .iter()
            .map(|s| normalize_state(s))
            .filter(|s| !s.is_empty())
            .collect();

        let cities: Vec<(String, String)> = query
            .cities
            .iter()
            .filter_map(|label| split_city_state(label))
            .collect();

        let mut keywords: Vec<&'static str> = Vec::new();
        for category in &query.categories {
            for &keyword in category.keywords() {
                if !keywords.contains(&keyword) {
                    keywords.push(keyword);
                }
            }
        }

        Self {
            text,
            states: Some(states).filter(|s| !s.is_empty()),
            cities: Some(cities).filter(|c| !c.is_empty()),
            keywords: Some(keywords).filter(|k| !k.is_empty()),
            cap_exempt_only: query.cap_exempt_only,
            min_score: query.min_score,
            min_approval: query.min_approval,
            year: query.year.clone(),
        }
    }

    pub fn matches(&self, record: &EmployerRecord) -> bool {
        self.matches_text(record)
            && self.matches_state(record)
            && self.matches_city(record)
            && self.matches_category(record)
            && (!self.cap_exempt_only || record.is_likely_cap_exempt())
            && meets_threshold(record.cap_exempt_score, self.min_score)
            && meets_threshold(record.approval_rate, self.min_approval)
            && self.year.matches(&record.data_year)
    }

    pub fn apply<'a>(&self, records: &'a [EmployerRecord]) -> Vec<&'a EmployerRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    fn matches_text(&self, record: &EmployerRecord) -> bool {
        match &self.text {
            Some(text) => record.employer_name.to_lowercase().contains(text.as_str()),
            None => true,
        }
    }

    fn matches_state(&self, record: &EmployerRecord) -> bool {
        match &self.states {
            Some(states) => states.contains(&normalize_state(&record.state)),
            None => true,
        }
    }

    fn matches_city(&self, record: &EmployerRecord) -> bool {
        let Some(cities) = &self.cities else {
            return true;
        };
        let Some(city) = record.city.as_deref() else {
            return false;
        };

        let city = title_case(city);
        let state = normalize_state(&record.state);
        cities.iter().any(|(c, s)| *c == city && *s == state)
    }

    fn matches_category(&self, record: &EmployerRecord) -> bool {
        let Some(keywords) = &self.keywords else {
            return true;
        };

        let classifications = record
            .classifications
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        keywords.iter().any(|k| classifications.contains(k))
    }
}

/// A record without the value only passes an inactive (<= 0) threshold
fn meets_threshold(value: Option<f64>, minimum: f64) -> bool {
    match value {
        Some(v) => v >= minimum,
        None => minimum <= 0.0,
    }
}
