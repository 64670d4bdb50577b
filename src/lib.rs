//! H-1B cap-exempt employer search: dataset loading, filtering,
//! per-employer deduplication, chart/summary presentation and CSV export,
//! served over a Rocket JSON API or from the command line.

pub mod cli;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod dataset;
pub mod environment;
pub mod export;
pub mod options;
pub mod search;
pub mod utils;
pub mod web;

pub use config::{DashboardConfig, DataSource};
pub use dashboard::Dashboard;
pub use dataset::{Dataset, EmployerRecord};
pub use environment::EnvironmentConfig;
pub use search::{SearchOutcome, SearchQuery};
pub use web::start_web_server;
