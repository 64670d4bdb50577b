use anyhow::{Context, Result};
use clap::Parser;
use employer_search::cli::{handle_command, Cli};
use employer_search::EnvironmentConfig;
use std::fs::OpenOptions;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "employer_search=info,capexempt=info,rocket=warn";

fn init_logging(environment: &EnvironmentConfig) -> Result<()> {
    let json_layer = match &environment.log_file {
        Some(path) => {
            // Truncated on startup
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(json_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let environment = EnvironmentConfig::load(&cli.config)?;
    init_logging(&environment)?;
    environment.log_origin();

    info!("Data: {}", environment.data_path.display());
    info!("Exports: {}", environment.export_path.display());

    handle_command(cli, environment).await
}
