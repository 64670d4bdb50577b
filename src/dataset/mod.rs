// src/dataset/mod.rs
//! Employer dataset: record types, CSV/Parquet readers and the source loader

pub mod csv_source;
pub mod loader;
pub mod parquet_source;
pub mod record;

pub use loader::load;
pub use record::{EmployerRecord, MissingColumns, OrgKind, REQUIRED_COLUMNS};

use crate::config::DataSource;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoadedSource {
    pub file: String,
    pub year: String,
    pub rows: usize,
}

impl LoadedSource {
    pub fn new(source: &DataSource, rows: usize) -> Self {
        Self {
            file: source.file.clone(),
            year: source.year.clone(),
            rows,
        }
    }
}

/// Loaded once at startup, read-only afterwards
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<EmployerRecord>,
    pub loaded_years: Vec<String>,
    pub sources: Vec<LoadedSource>,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(
        records: Vec<EmployerRecord>,
        loaded_years: Vec<String>,
        sources: Vec<LoadedSource>,
    ) -> Self {
        Self {
            records,
            loaded_years,
            sources,
            loaded_at: Utc::now(),
        }
    }

    /// Build a dataset straight from records, e.g. for tests
    pub fn from_records(records: Vec<EmployerRecord>) -> Self {
        let mut years: Vec<String> = records.iter().map(|r| r.data_year.clone()).collect();
        years.sort();
        years.dedup();
        Self::new(records, years, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
