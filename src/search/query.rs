// src/search/query.rs
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub const ALL_YEARS: &str = "All Years";

/// User-facing organization categories offered by the category filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OrgCategory {
    #[serde(alias = "Universities & Colleges")]
    Universities,
    #[serde(alias = "Hospitals & Medical Centers")]
    Hospitals,
    #[serde(alias = "Research Organizations")]
    Research,
    #[serde(alias = "Government Agencies")]
    Government,
    #[serde(alias = "Educational Institutions")]
    Educational,
    #[serde(alias = "Healthcare Systems")]
    Healthcare,
    #[serde(alias = "Professional Services")]
    ProfessionalServices,
    #[serde(alias = "Non-profit Organizations")]
    Nonprofit,
}

impl OrgCategory {
    pub const ALL: [OrgCategory; 8] = [
        OrgCategory::Universities,
        OrgCategory::Hospitals,
        OrgCategory::Research,
        OrgCategory::Government,
        OrgCategory::Educational,
        OrgCategory::Healthcare,
        OrgCategory::ProfessionalServices,
        OrgCategory::Nonprofit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrgCategory::Universities => "Universities & Colleges",
            OrgCategory::Hospitals => "Hospitals & Medical Centers",
            OrgCategory::Research => "Research Organizations",
            OrgCategory::Government => "Government Agencies",
            OrgCategory::Educational => "Educational Institutions",
            OrgCategory::Healthcare => "Healthcare Systems",
            OrgCategory::ProfessionalServices => "Professional Services",
            OrgCategory::Nonprofit => "Non-profit Organizations",
        }
    }

    /// Lowercase keywords searched for in a record's classification text
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            OrgCategory::Universities => &["university", "education"],
            OrgCategory::Hospitals => &["hospital"],
            OrgCategory::Research => &["research_org", "research"],
            OrgCategory::Government => &["government"],
            OrgCategory::Educational => &["education", "university"],
            OrgCategory::Healthcare => &["healthcare", "hospital"],
            OrgCategory::ProfessionalServices => &["professional_services"],
            OrgCategory::Nonprofit => &["nonprofit"],
        }
    }
}

impl fmt::Display for OrgCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum YearFilter {
    #[default]
    All,
    Year(String),
}

impl From<String> for YearFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case(ALL_YEARS)
            || trimmed.eq_ignore_ascii_case("all")
        {
            YearFilter::All
        } else {
            YearFilter::Year(trimmed.to_string())
        }
    }
}

impl From<YearFilter> for String {
    fn from(value: YearFilter) -> Self {
        match value {
            YearFilter::All => ALL_YEARS.to_string(),
            YearFilter::Year(year) => year,
        }
    }
}

impl FromStr for YearFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(YearFilter::from(s.to_string()))
    }
}

impl YearFilter {
    pub fn matches(&self, year: &str) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(wanted) => wanted == year,
        }
    }
}

/// Every input of one dashboard search. `Default` has no active filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub text: String,
    pub states: Vec<String>,
    /// "City, ST" labels
    pub cities: Vec<String>,
    pub categories: Vec<OrgCategory>,
    pub min_score: f64,
    pub min_approval: f64,
    pub cap_exempt_only: bool,
    pub year: YearFilter,
}

impl SearchQuery {
    pub const DEFAULT_MIN_SCORE: f64 = 0.6;
    pub const DEFAULT_MIN_APPROVAL: f64 = 0.7;

    /// The dashboard's initial filter state
    pub fn dashboard_defaults() -> Self {
        Self {
            min_score: Self::DEFAULT_MIN_SCORE,
            min_approval: Self::DEFAULT_MIN_APPROVAL,
            cap_exempt_only: true,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_states(mut self, states: &[&str]) -> Self {
        self.states = states.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_cities(mut self, cities: &[&str]) -> Self {
        self.cities = cities.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_categories(mut self, categories: &[OrgCategory]) -> Self {
        self.categories = categories.to_vec();
        self
    }

    pub fn with_thresholds(mut self, min_score: f64, min_approval: f64) -> Self {
        self.min_score = min_score;
        self.min_approval = min_approval;
        self
    }

    pub fn cap_exempt_only(mut self, only: bool) -> Self {
        self.cap_exempt_only = only;
        self
    }

    pub fn with_year(mut self, year: &str) -> Self {
        self.year = YearFilter::from(year.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_filter_parsing() {
        assert_eq!(YearFilter::from("All Years".to_string()), YearFilter::All);
        assert_eq!(YearFilter::from(" ".to_string()), YearFilter::All);
        assert_eq!(
            "2025".parse::<YearFilter>().unwrap(),
            YearFilter::Year("2025".to_string())
        );
        assert!(YearFilter::All.matches("2024"));
        assert!(!YearFilter::Year("2025".to_string()).matches("2024"));
    }

    #[test]
    fn test_query_deserializes_with_defaults() {
        let query: SearchQuery = serde_json::from_str(
            r#"{"text": "acme", "categories": ["universities", "Government Agencies"], "year": "2024"}"#,
        )
        .unwrap();

        assert_eq!(query.text, "acme");
        assert_eq!(
            query.categories,
            vec![OrgCategory::Universities, OrgCategory::Government]
        );
        assert_eq!(query.year, YearFilter::Year("2024".to_string()));
        assert_eq!(query.min_score, 0.0);
        assert!(!query.cap_exempt_only);
        assert!(query.states.is_empty());
    }

    #[test]
    fn test_dashboard_defaults() {
        let query = SearchQuery::dashboard_defaults();
        assert_eq!(query.min_score, 0.6);
        assert_eq!(query.min_approval, 0.7);
        assert!(query.cap_exempt_only);
        assert_eq!(query.year, YearFilter::All);
    }

    #[test]
    fn test_year_serializes_as_label() {
        let json = serde_json::to_value(SearchQuery::default()).unwrap();
        assert_eq!(json["year"], "All Years");
    }
}
