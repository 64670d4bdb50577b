// src/options.rs
use crate::dataset::Dataset;
use crate::search::{OrgCategory, ALL_YEARS};
use crate::utils::{city_state_label, is_all_digits, normalize_state, title_case};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const ALL_STATES: [&str; 55] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "GU", "HI", "IA", "ID", "IL",
    "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MP", "MS", "MT", "NC", "ND", "NE",
    "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA", "PR", "RI", "SC", "SD", "TN", "TX", "UT",
    "VA", "VI", "VT", "WA", "WI", "WV", "WY",
];

pub const TOP_CITIES: [&str; 50] = [
    "New York, NY", "Los Angeles, CA", "Chicago, IL", "Houston, TX", "Philadelphia, PA",
    "Phoenix, AZ", "San Antonio, TX", "San Diego, CA", "Dallas, TX", "San Jose, CA",
    "Austin, TX", "Jacksonville, FL", "Fort Worth, TX", "Columbus, OH", "Charlotte, NC",
    "San Francisco, CA", "Indianapolis, IN", "Seattle, WA", "Denver, CO", "Washington, DC",
    "Boston, MA", "El Paso, TX", "Nashville, TN", "Detroit, MI", "Oklahoma City, OK",
    "Portland, OR", "Las Vegas, NV", "Memphis, TN", "Louisville, KY", "Baltimore, MD",
    "Milwaukee, WI", "Albuquerque, NM", "Tucson, AZ", "Fresno, CA", "Sacramento, CA",
    "Mesa, AZ", "Kansas City, MO", "Atlanta, GA", "Long Beach, CA", "Colorado Springs, CO",
    "Raleigh, NC", "Miami, FL", "Virginia Beach, VA", "Omaha, NE", "Oakland, CA",
    "Minneapolis, MN", "Tulsa, OK", "Arlington, TX", "Tampa, FL", "New Orleans, LA",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryOption {
    pub id: OrgCategory,
    pub label: String,
}

/// Choices offered by the dashboard's filter widgets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub classifications: Vec<String>,
    pub categories: Vec<CategoryOption>,
    pub years: Vec<String>,
}

fn category_options() -> Vec<CategoryOption> {
    OrgCategory::ALL
        .iter()
        .map(|c| CategoryOption {
            id: *c,
            label: c.label().to_string(),
        })
        .collect()
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset, city_limit: usize, classification_limit: usize) -> Self {
        let mut states: BTreeSet<String> = BTreeSet::new();
        let mut cities: BTreeSet<String> = BTreeSet::new();
        let mut classifications: BTreeSet<String> = BTreeSet::new();

        for record in &dataset.records {
            let state = normalize_state(&record.state);
            if !state.is_empty() {
                states.insert(state.clone());
            }

            if let Some(city) = record.city.as_deref() {
                let city = title_case(city);
                // ZIP codes sometimes land in the city column
                if !city.is_empty() && !state.is_empty() && !is_all_digits(&city) {
                    cities.insert(city_state_label(&city, &state));
                }
            }

            if let Some(text) = record.classifications.as_deref() {
                classifications.extend(
                    text.split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(str::to_string),
                );
            }
        }

        let mut years = vec![ALL_YEARS.to_string()];
        years.extend(dataset.loaded_years.iter().cloned());

        Self {
            states: states.into_iter().collect(),
            cities: cities.into_iter().take(city_limit).collect(),
            classifications: classifications
                .into_iter()
                .take(classification_limit)
                .collect(),
            categories: category_options(),
            years,
        }
    }

    /// Built-in lists used while no dataset is loaded
    pub fn fallback() -> Self {
        let states: Vec<String> = ALL_STATES.iter().map(|s| s.to_string()).collect();
        let mut cities: Vec<String> = TOP_CITIES.iter().map(|s| s.to_string()).collect();
        cities.sort();

        Self {
            states,
            cities,
            classifications: Vec::new(),
            categories: category_options(),
            years: vec![ALL_YEARS.to_string(), "2024".to_string(), "2025".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::EmployerRecord;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            EmployerRecord::new("Acme University", "MA", "2024")
                .with_city("boston")
                .with_classifications("university, education"),
            EmployerRecord::new("Acme Labs", "ma", "2025")
                .with_city("BOSTON ")
                .with_classifications("research_org"),
            EmployerRecord::new("Zip Co", "NY", "2024").with_city("10001"),
            EmployerRecord::new("Austin Co", "TX", "2024")
                .with_city("austin")
                .with_classifications(" , nonprofit"),
        ])
    }

    #[test]
    fn test_cities_are_normalized_and_deduplicated() {
        let options = FilterOptions::from_dataset(&dataset(), 50, 20);
        assert_eq!(options.cities, vec!["Austin, TX", "Boston, MA"]);
    }

    #[test]
    fn test_states_and_classifications_sorted() {
        let options = FilterOptions::from_dataset(&dataset(), 50, 20);
        assert_eq!(options.states, vec!["MA", "NY", "TX"]);
        assert_eq!(
            options.classifications,
            vec!["education", "nonprofit", "research_org", "university"]
        );
        assert_eq!(options.years, vec!["All Years", "2024", "2025"]);
        assert_eq!(options.categories.len(), 8);
    }

    #[test]
    fn test_limits_apply_after_sorting() {
        let options = FilterOptions::from_dataset(&dataset(), 1, 2);
        assert_eq!(options.cities, vec!["Austin, TX"]);
        assert_eq!(options.classifications, vec!["education", "nonprofit"]);
    }

    #[test]
    fn test_fallback_lists() {
        let options = FilterOptions::fallback();
        assert_eq!(options.states.len(), ALL_STATES.len());
        assert_eq!(options.cities.len(), 50);
        assert!(options.cities.windows(2).all(|w| w[0] <= w[1]));
    }
}
