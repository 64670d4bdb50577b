// src/dashboard.rs
use crate::config::DashboardConfig;
use crate::dataset::{self, Dataset, LoadedSource};
use crate::export;
use crate::options::FilterOptions;
use crate::search::{self, FullResults, SearchOutcome, SearchQuery};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub available: bool,
    pub records: usize,
    pub loaded_years: Vec<String>,
    pub sources: Vec<LoadedSource>,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// The loaded dataset plus the settings every query runs with. Without a
/// dataset the dashboard stays up in a degraded, empty state.
pub struct Dashboard {
    config: DashboardConfig,
    dataset: Option<Dataset>,
}

impl Dashboard {
    /// Load the configured sources. A load failure is logged, not returned.
    pub fn load(config: DashboardConfig) -> Self {
        match dataset::load(&config) {
            Ok(dataset) => Self::with_dataset(config, dataset),
            Err(e) => {
                warn!("Dashboard starting without data: {:#}", e);
                Self {
                    config,
                    dataset: None,
                }
            }
        }
    }

    pub fn with_dataset(config: DashboardConfig, dataset: Dataset) -> Self {
        Self {
            config,
            dataset: Some(dataset),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn info(&self) -> DatasetInfo {
        match &self.dataset {
            Some(dataset) => DatasetInfo {
                available: true,
                records: dataset.len(),
                loaded_years: dataset.loaded_years.clone(),
                sources: dataset.sources.clone(),
                loaded_at: Some(dataset.loaded_at),
            },
            None => DatasetInfo {
                available: false,
                records: 0,
                loaded_years: Vec::new(),
                sources: Vec::new(),
                loaded_at: None,
            },
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        match &self.dataset {
            Some(dataset) => FilterOptions::from_dataset(
                dataset,
                self.config.city_option_limit,
                self.config.classification_option_limit,
            ),
            None => FilterOptions::fallback(),
        }
    }

    pub fn search(&self, query: &SearchQuery) -> SearchOutcome {
        let Some(dataset) = &self.dataset else {
            return SearchOutcome::unavailable();
        };

        let outcome = search::run(
            &dataset.records,
            query,
            self.config.display_limit,
            self.config.chart_top_n,
        );
        info!(
            "Search matched {} employers (showing {})",
            outcome.total_matches, outcome.showing
        );
        outcome
    }

    pub fn full_results(&self, query: &SearchQuery) -> Option<FullResults> {
        let dataset = self.dataset.as_ref()?;
        Some(search::run_full(&dataset.records, query))
    }

    /// Export every match to a fresh CSV file in the export directory
    pub async fn export_csv(&self, query: &SearchQuery) -> Result<PathBuf> {
        let Some(full) = self.full_results(query) else {
            anyhow::bail!("No data available to export");
        };
        export::export_to_dir(&self.config.export_dir, &full.rows).await
    }
}
