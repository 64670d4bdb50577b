// src/config.rs
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One dataset file the loader may pick up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSource {
    pub file: String,
    pub year: String,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Stop scanning further sources once this one loads
    #[serde(default)]
    pub exclusive: bool,
}

impl DataSource {
    pub fn new(file: &str, year: &str) -> Self {
        Self {
            file: file.to_string(),
            year: year.to_string(),
            limit: None,
            exclusive: false,
        }
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_parquet(&self) -> bool {
        crate::utils::get_file_extension(&self.file).as_deref() == Some("parquet")
    }
}

/// Extra year pulled in when the scan only produced a single year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Backfill {
    pub year: String,
    pub limit: usize,
}

impl Default for Backfill {
    fn default() -> Self {
        Self {
            year: "2025".to_string(),
            limit: 7500,
        }
    }
}

pub fn default_sources() -> Vec<DataSource> {
    vec![
        DataSource::new("optimized_employers.parquet", "2024").exclusive(),
        DataSource::new("optimized_employers.csv", "2024"),
        DataSource::new("LCA_2025_dashboard_ready.csv", "2025"),
        DataSource::new("likely_cap_exempt_employers.csv", "2024"),
        DataSource::new("cap_exempt_analysis_results.csv", "2024"),
    ]
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub sources: Vec<DataSource>,
    pub backfill: Option<Backfill>,
    pub display_limit: usize,
    pub chart_top_n: usize,
    pub city_option_limit: usize,
    pub classification_option_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            export_dir: PathBuf::from("exports"),
            sources: default_sources(),
            backfill: Some(Backfill::default()),
            display_limit: 100,
            chart_top_n: 10,
            city_option_limit: 50,
            classification_option_limit: 20,
        }
    }
}

impl DashboardConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Self::default()
        }
    }

    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    pub fn with_sources(mut self, sources: Vec<DataSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_backfill(mut self, backfill: Option<Backfill>) -> Self {
        self.backfill = backfill;
        self
    }

    pub fn with_display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit;
        self
    }

    pub fn source_path(&self, source: &DataSource) -> PathBuf {
        let file = Path::new(&source.file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }
}
