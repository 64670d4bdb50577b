// src/dataset/record.rs
use crate::utils::{parse_count, parse_flag, parse_number};
use serde::{Deserialize, Serialize};

pub const EMPLOYER_NAME: &str = "Employer_Name";
pub const STATE: &str = "State";
pub const CITY: &str = "City";
pub const CLASSIFICATIONS: &str = "Classifications";
pub const LIKELY_CAP_EXEMPT: &str = "Likely_Cap_Exempt";
pub const CAP_EXEMPT_SCORE: &str = "Cap_Exempt_Score";
pub const APPROVAL_RATE: &str = "Approval_Rate";
pub const TOTAL_PETITIONS: &str = "Total_Petitions";

pub const REQUIRED_COLUMNS: [&str; 2] = [EMPLOYER_NAME, STATE];

/// A source whose header lacks one of the required columns
#[derive(Debug, Clone, PartialEq)]
pub struct MissingColumns(pub Vec<&'static str>);

impl std::fmt::Display for MissingColumns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing columns {:?}", self.0)
    }
}

impl std::error::Error for MissingColumns {}

/// Broad organization type derived from the classification text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrgKind {
    University,
    Hospital,
    Government,
    Research,
    Other,
}

impl OrgKind {
    pub fn from_classifications(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("university") || lower.contains("education") {
            OrgKind::University
        } else if lower.contains("hospital") || lower.contains("healthcare") {
            OrgKind::Hospital
        } else if lower.contains("government") {
            OrgKind::Government
        } else if lower.contains("research") {
            OrgKind::Research
        } else {
            OrgKind::Other
        }
    }
}

/// One LCA-derived employer row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployerRecord {
    pub employer_name: String,
    pub state: String,
    pub city: Option<String>,
    pub classifications: Option<String>,
    pub likely_cap_exempt: Option<bool>,
    pub cap_exempt_score: Option<f64>,
    pub approval_rate: Option<f64>,
    pub total_petitions: Option<u64>,
    pub data_year: String,
}

impl EmployerRecord {
    pub fn new(employer_name: &str, state: &str, data_year: &str) -> Self {
        Self {
            employer_name: employer_name.to_string(),
            state: state.to_string(),
            city: None,
            classifications: None,
            likely_cap_exempt: None,
            cap_exempt_score: None,
            approval_rate: None,
            total_petitions: None,
            data_year: data_year.to_string(),
        }
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    pub fn with_classifications(mut self, classifications: &str) -> Self {
        self.classifications = Some(classifications.to_string());
        self
    }

    pub fn with_cap_exempt(mut self, flag: bool) -> Self {
        self.likely_cap_exempt = Some(flag);
        self
    }

    pub fn with_scores(mut self, cap_exempt_score: f64, approval_rate: f64) -> Self {
        self.cap_exempt_score = Some(cap_exempt_score);
        self.approval_rate = Some(approval_rate);
        self
    }

    pub fn with_petitions(mut self, total: u64) -> Self {
        self.total_petitions = Some(total);
        self
    }

    pub fn org_kind(&self) -> OrgKind {
        self.classifications
            .as_deref()
            .map(OrgKind::from_classifications)
            .unwrap_or(OrgKind::Other)
    }

    /// Explicit flag when the source carries one, otherwise inferred from
    /// the organization type.
    pub fn is_likely_cap_exempt(&self) -> bool {
        match self.likely_cap_exempt {
            Some(flag) => flag,
            None => self.org_kind() != OrgKind::Other,
        }
    }
}

/// Positions of the known columns within a source's header
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    employer_name: Option<usize>,
    state: Option<usize>,
    city: Option<usize>,
    classifications: Option<usize>,
    likely_cap_exempt: Option<usize>,
    cap_exempt_score: Option<usize>,
    approval_rate: Option<usize>,
    total_petitions: Option<usize>,
}

impl ColumnMap {
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map = Self::default();

        for (index, header) in headers.into_iter().enumerate() {
            let slot = match header.trim() {
                EMPLOYER_NAME => &mut map.employer_name,
                STATE => &mut map.state,
                CITY => &mut map.city,
                CLASSIFICATIONS => &mut map.classifications,
                LIKELY_CAP_EXEMPT => &mut map.likely_cap_exempt,
                CAP_EXEMPT_SCORE => &mut map.cap_exempt_score,
                APPROVAL_RATE => &mut map.approval_rate,
                TOTAL_PETITIONS => &mut map.total_petitions,
                _ => continue,
            };
            slot.get_or_insert(index);
        }

        map
    }

    /// Source positions of every recognised column
    pub fn used_indices(&self) -> Vec<usize> {
        [
            self.employer_name,
            self.state,
            self.city,
            self.classifications,
            self.likely_cap_exempt,
            self.cap_exempt_score,
            self.approval_rate,
            self.total_petitions,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_COLUMNS
            .into_iter()
            .zip([self.employer_name, self.state])
            .filter(|(_, slot)| slot.is_none())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn ensure_required(&self) -> Result<(), MissingColumns> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingColumns(missing))
        }
    }

    /// Build a record from one row. Rows without an employer name are
    /// dropped; the year always comes from the source definition.
    pub fn build<'a, F>(&self, cell: F, data_year: &str) -> Option<EmployerRecord>
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        let text = |slot: Option<usize>| -> Option<String> {
            slot.and_then(&cell)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let employer_name = text(self.employer_name)?;

        Some(EmployerRecord {
            employer_name,
            state: text(self.state).unwrap_or_default(),
            city: text(self.city),
            classifications: text(self.classifications),
            likely_cap_exempt: self.likely_cap_exempt.and_then(&cell).and_then(parse_flag),
            cap_exempt_score: self.cap_exempt_score.and_then(&cell).and_then(parse_number),
            approval_rate: self.approval_rate.and_then(&cell).and_then(parse_number),
            total_petitions: self.total_petitions.and_then(&cell).and_then(parse_count),
            data_year: data_year.to_string(),
        })
    }
}
