// src/environment.rs
use crate::config::{default_sources, Backfill, DashboardConfig, DataSource};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7860
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConfigOrigin {
    #[default]
    Builtin,
    File(PathBuf),
    /// The requested file was absent so defaults were used
    Missing(PathBuf),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub data_path: PathBuf,
    pub export_path: PathBuf,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default = "default_sources")]
    pub sources: Vec<DataSource>,
    #[serde(default = "default_backfill")]
    pub backfill: Option<Backfill>,
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    #[serde(skip)]
    pub environment: String,
    #[serde(skip)]
    pub origin: ConfigOrigin,
}

fn default_backfill() -> Option<Backfill> {
    Some(Backfill::default())
}

fn default_display_limit() -> usize {
    100
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("."),
            export_path: PathBuf::from("exports"),
            log_file: None,
            server: ServerSettings::default(),
            sources: default_sources(),
            backfill: default_backfill(),
            display_limit: default_display_limit(),
            environment: String::new(),
            origin: ConfigOrigin::Builtin,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration for the active environment, falling back to
    /// built-in defaults when the config file does not exist. Logs nothing;
    /// call [`EnvironmentConfig::log_origin`] once a subscriber is installed.
    pub fn load(config_path: &Path) -> Result<Self> {
        let environment = Self::get_environment();

        let config = if config_path.exists() {
            Self {
                origin: ConfigOrigin::File(config_path.to_path_buf()),
                ..Self::load_from_file(config_path, &environment)?
            }
        } else {
            Self {
                origin: ConfigOrigin::Missing(config_path.to_path_buf()),
                ..Self::default()
            }
        };

        Self {
            environment,
            ..config
        }
        .resolved()
    }

    pub fn log_origin(&self) {
        info!("Loading configuration for environment: {}", self.environment);
        match &self.origin {
            ConfigOrigin::File(path) => info!("Configuration read from {}", path.display()),
            ConfigOrigin::Missing(path) => {
                warn!("{} not found, using built-in defaults", path.display())
            }
            ConfigOrigin::Builtin => info!("Using built-in defaults"),
        }
    }

    fn get_environment() -> String {
        std::env::var("DASHBOARD_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_yaml(&config_content, environment)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    fn resolved(self) -> Result<Self> {
        let log_file = match &self.log_file {
            Some(path) => Some(Self::resolve_path(path)?),
            None => None,
        };

        Ok(Self {
            data_path: Self::resolve_path(&self.data_path)?,
            export_path: Self::resolve_path(&self.export_path)?,
            log_file,
            ..self
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig::new(self.data_path.clone())
            .with_export_dir(self.export_path.clone())
            .with_sources(self.sources.clone())
            .with_backfill(self.backfill.clone())
            .with_display_limit(self.display_limit)
    }
}
