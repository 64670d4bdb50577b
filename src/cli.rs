// src/cli.rs
use crate::core::FsOps;
use crate::dashboard::Dashboard;
use crate::dataset::REQUIRED_COLUMNS;
use crate::environment::EnvironmentConfig;
use crate::export;
use crate::search::{DisplayRow, OrgCategory, SearchQuery};
use crate::utils::{format_count, normalize_employer_name};
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "capexempt")]
#[command(about = "Search H-1B cap-exempt employers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = "config.yaml")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the dataset and start the API server
    Serve {
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run a search and print the matching employers
    Search(SearchArgs),
    /// Print the available filter options as JSON
    Options,
    /// Verify data files, loading, search and export
    Check,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive substring of the employer name
    #[arg(long, default_value = "")]
    pub text: String,
    #[arg(long = "state")]
    pub states: Vec<String>,
    /// "City, ST"
    #[arg(long = "city")]
    pub cities: Vec<String>,
    #[arg(long = "category", value_enum)]
    pub categories: Vec<OrgCategory>,
    #[arg(long, default_value_t = SearchQuery::DEFAULT_MIN_SCORE)]
    pub min_score: f64,
    #[arg(long, default_value_t = SearchQuery::DEFAULT_MIN_APPROVAL)]
    pub min_approval: f64,
    /// Also show employers not flagged as likely cap-exempt
    #[arg(long)]
    pub include_non_exempt: bool,
    #[arg(long, default_value = crate::search::ALL_YEARS)]
    pub year: String,
    /// Print every match instead of the display limit
    #[arg(long)]
    pub all: bool,
    /// Also write every match to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl SearchArgs {
    pub fn to_query(&self) -> SearchQuery {
        let states: Vec<&str> = self.states.iter().map(String::as_str).collect();
        let cities: Vec<&str> = self.cities.iter().map(String::as_str).collect();

        SearchQuery::default()
            .with_text(&self.text)
            .with_states(&states)
            .with_cities(&cities)
            .with_categories(&self.categories)
            .with_thresholds(self.min_score, self.min_approval)
            .cap_exempt_only(!self.include_non_exempt)
            .with_year(&self.year)
    }
}

pub async fn handle_command(cli: Cli, environment: EnvironmentConfig) -> Result<()> {
    match cli.command {
        Command::Serve { address, port } => {
            let mut settings = environment.server.clone();
            if let Some(address) = address {
                settings.address = address;
            }
            if let Some(port) = port {
                settings.port = port;
            }

            let dashboard = Dashboard::load(environment.dashboard_config());
            start_web_server(dashboard, &settings).await
        }
        Command::Search(args) => run_search(&environment, &args).await,
        Command::Options => {
            let dashboard = Dashboard::load(environment.dashboard_config());
            let options = serde_json::to_string_pretty(&dashboard.filter_options())
                .context("Failed to serialize filter options")?;
            println!("{}", options);
            Ok(())
        }
        Command::Check => run_check(&environment).await,
    }
}

async fn run_search(environment: &EnvironmentConfig, args: &SearchArgs) -> Result<()> {
    let dashboard = Dashboard::load(environment.dashboard_config());
    let query = args.to_query();
    info!("CLI search: {:?}", query);

    if args.all {
        match dashboard.full_results(&query) {
            Some(full) => {
                println!("{}\n", full.summary);
                print_rows(&full.rows);
            }
            None => println!("No data available"),
        }
    } else {
        let outcome = dashboard.search(&query);
        println!("{}\n", outcome.summary);
        print_rows(&outcome.rows);
    }

    if let Some(path) = &args.csv {
        let full = dashboard
            .full_results(&query)
            .context("No data available to export")?;
        let bytes = export::to_csv_bytes(&full.rows)?;
        FsOps::write_file_safe(path, &bytes).await?;
        println!(
            "\nExported {} employers to {}",
            format_count(full.rows.len()),
            path.display()
        );
    }

    Ok(())
}

fn print_rows(rows: &[DisplayRow]) {
    let fmt_score = |v: Option<f64>| v.map(|v| format!("{:.3}", v)).unwrap_or_default();

    println!("{}", crate::search::DISPLAY_COLUMNS.join("\t"));
    for row in rows {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.employer_name,
            row.city.as_deref().unwrap_or(""),
            row.state,
            fmt_score(row.cap_exempt_score),
            fmt_score(row.approval_rate),
            row.total_petitions.map(|p| p.to_string()).unwrap_or_default(),
            row.year
        );
    }
}

struct CheckReport {
    failures: Vec<String>,
}

impl CheckReport {
    fn pass(&self, step: &str, detail: String) {
        info!("✅ {}: {}", step, detail);
    }

    fn fail(&mut self, step: &str, detail: String) {
        error!("❌ {}: {}", step, detail);
        self.failures.push(format!("{}: {}", step, detail));
    }
}

async fn run_check(environment: &EnvironmentConfig) -> Result<()> {
    let config = environment.dashboard_config();
    let mut report = CheckReport {
        failures: Vec::new(),
    };

    info!("Data directory: {}", config.data_dir.display());
    info!("Required columns: {}", REQUIRED_COLUMNS.join(", "));

    let present: Vec<_> = config
        .sources
        .iter()
        .filter(|source| config.source_path(source).exists())
        .collect();
    for source in &config.sources {
        if !present.iter().any(|p| p.file == source.file) {
            warn!("Missing data file: {}", source.file);
        }
    }
    if present.is_empty() {
        report.fail("Data files", "none of the configured files exist".to_string());
    } else {
        report.pass(
            "Data files",
            format!("{} of {} present", present.len(), config.sources.len()),
        );
    }

    let dashboard = Dashboard::load(config.clone());
    match dashboard.dataset() {
        Some(dataset) => report.pass(
            "Dataset load",
            format!(
                "{} records, years {:?}",
                format_count(dataset.len()),
                dataset.loaded_years
            ),
        ),
        None => report.fail("Dataset load", "no dataset could be loaded".to_string()),
    }

    if dashboard.has_data() {
        check_search(&dashboard, &mut report);
        check_export(&dashboard, &mut report).await;
    }

    if report.failures.is_empty() {
        info!("All checks passed");
        Ok(())
    } else {
        anyhow::bail!(
            "{} check(s) failed: {}",
            report.failures.len(),
            report.failures.join("; ")
        )
    }
}

fn check_search(dashboard: &Dashboard, report: &mut CheckReport) {
    let all = dashboard.search(&SearchQuery::default());
    if all.total_matches == 0 {
        report.fail("Basic search", "an unfiltered search matched nothing".to_string());
        return;
    }
    report.pass(
        "Basic search",
        format!("{} unique employers", format_count(all.total_matches)),
    );

    let (Some(everything), Some(exempt)) = (
        dashboard.full_results(&SearchQuery::default()),
        dashboard.full_results(&SearchQuery::default().cap_exempt_only(true)),
    ) else {
        return;
    };

    // Dedup may keep a different spelling of the same employer per query
    let names: HashSet<String> = everything
        .rows
        .iter()
        .map(|r| normalize_employer_name(&r.employer_name))
        .collect();
    let outside = exempt
        .rows
        .iter()
        .filter(|r| !names.contains(&normalize_employer_name(&r.employer_name)))
        .count();

    if exempt.total_matches > everything.total_matches || outside > 0 {
        report.fail(
            "Cap-exempt search",
            format!("{} rows are not part of the unfiltered results", outside),
        );
    } else {
        report.pass(
            "Cap-exempt search",
            format!("{} likely cap-exempt employers", format_count(exempt.total_matches)),
        );
    }
}

async fn check_export(dashboard: &Dashboard, report: &mut CheckReport) {
    let query = SearchQuery::default();
    let expected = dashboard
        .full_results(&query)
        .map(|full| full.rows.len())
        .unwrap_or_default();

    let path = match dashboard.export_csv(&query).await {
        Ok(path) => path,
        Err(e) => {
            report.fail("CSV export", format!("{:#}", e));
            return;
        }
    };

    let read_back = FsOps::read_file_safe(&path)
        .await
        .and_then(|text| export::parse_rows(text.as_bytes()));
    match read_back {
        Ok(parsed) if parsed.rows.len() == expected => {
            report.pass("CSV export", format!("{} rows round-tripped", expected))
        }
        Ok(parsed) => report.fail(
            "CSV export",
            format!("wrote {} rows, read back {}", expected, parsed.rows.len()),
        ),
        Err(e) => report.fail("CSV export", format!("{:#}", e)),
    }

    if let Err(e) = FsOps::remove_file(&path).await {
        warn!("Could not remove check export {}: {}", path.display(), e);
    }
}
