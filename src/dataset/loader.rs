// src/dataset/loader.rs
use super::csv_source::read_csv_file;
use super::parquet_source::read_parquet_file;
use super::record::{EmployerRecord, MissingColumns};
use super::{Dataset, LoadedSource};
use crate::config::{DashboardConfig, DataSource};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, error, info, warn};

fn read_source(path: &Path, source: &DataSource, limit: Option<usize>) -> Result<Vec<EmployerRecord>> {
    if source.is_parquet() {
        read_parquet_file(path, &source.year, limit)
    } else {
        read_csv_file(path, &source.year, limit)
    }
}

/// Load every configured source that exists on disk.
///
/// Sources are visited in order and broken files are skipped. An exclusive
/// source ends the scan once it loads. When the scan yields a single year
/// other than the backfill year, the first backfill-year source is added
/// with the backfill row cap.
pub fn load(config: &DashboardConfig) -> Result<Dataset> {
    info!(
        "Loading employer data from {} ({} candidate sources)",
        config.data_dir.display(),
        config.sources.len()
    );

    let mut records: Vec<EmployerRecord> = Vec::new();
    let mut loaded_years: BTreeSet<String> = BTreeSet::new();
    let mut sources: Vec<LoadedSource> = Vec::new();

    for source in &config.sources {
        let path = config.source_path(source);
        if !path.exists() {
            debug!("Skipping {}: file not found", path.display());
            continue;
        }

        info!("Loading {} data from {}", source.year, path.display());
        match read_source(&path, source, source.limit) {
            Ok(rows) => {
                info!("Loaded {} records from {}", rows.len(), source.year);
                sources.push(LoadedSource::new(source, rows.len()));
                loaded_years.insert(source.year.clone());
                records.extend(rows);

                if source.exclusive {
                    debug!("{} is exclusive, stopping source scan", source.file);
                    break;
                }
            }
            Err(e) => {
                if let Some(missing) = e.downcast_ref::<MissingColumns>() {
                    warn!("Skipping {}: {}", source.file, missing);
                } else {
                    error!("Error loading {}: {:#}", source.file, e);
                }
            }
        }
    }

    if sources.is_empty() {
        error!("No valid data files found");
        anyhow::bail!("No valid data files found in {}", config.data_dir.display());
    }

    if let Some(backfill) = &config.backfill {
        if loaded_years.len() == 1 && !loaded_years.contains(&backfill.year) {
            info!("Looking for {} data", backfill.year);
            for source in config.sources.iter().filter(|s| s.year == backfill.year) {
                let path = config.source_path(source);
                if !path.exists() {
                    continue;
                }

                let limit = Some(source.limit.map_or(backfill.limit, |l| l.min(backfill.limit)));
                match read_source(&path, source, limit) {
                    Ok(rows) => {
                        info!("Added {} records from {}", rows.len(), backfill.year);
                        sources.push(LoadedSource::new(source, rows.len()));
                        loaded_years.insert(backfill.year.clone());
                        records.extend(rows);
                        break;
                    }
                    Err(e) => {
                        error!("Error loading {} data: {:#}", backfill.year, e);
                    }
                }
            }
        }
    }

    let dataset = Dataset::new(records, loaded_years.into_iter().collect(), sources);
    info!(
        "Total: {} records from years {:?}",
        dataset.len(),
        dataset.loaded_years
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backfill;
    use std::fs;
    use std::path::PathBuf;

    const HEADER: &str = "Employer_Name,State,City,Likely_Cap_Exempt,Cap_Exempt_Score,Approval_Rate\n";

    fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut content = HEADER.to_string();
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_combines_sources_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "a.csv", &["Acme University,MA,Boston,True,0.9,0.95"]);
        write_csv(dir.path(), "b.csv", &["Widget Co,TX,Austin,False,0.1,0.8"]);

        let config = DashboardConfig::new(dir.path().to_path_buf())
            .with_sources(vec![
                DataSource::new("a.csv", "2024"),
                DataSource::new("missing.csv", "2024"),
                DataSource::new("b.csv", "2025"),
            ])
            .with_backfill(None);

        let dataset = load(&config).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.loaded_years, vec!["2024", "2025"]);
        assert_eq!(dataset.sources.len(), 2);
        assert_eq!(dataset.records[1].data_year, "2025");
    }

    #[test]
    fn test_exclusive_source_stops_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "main.csv", &["Acme University,MA,Boston,True,0.9,0.95"]);
        write_csv(dir.path(), "other.csv", &["Widget Co,TX,Austin,False,0.1,0.8"]);

        let config = DashboardConfig::new(dir.path().to_path_buf())
            .with_sources(vec![
                DataSource::new("main.csv", "2024").exclusive(),
                DataSource::new("other.csv", "2024"),
            ])
            .with_backfill(None);

        let dataset = load(&config).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].employer_name, "Acme University");
    }

    #[test]
    fn test_backfill_adds_capped_second_year() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "main.csv", &["Acme University,MA,Boston,True,0.9,0.95"]);
        write_csv(
            dir.path(),
            "recent.csv",
            &[
                "Widget Co,TX,Austin,False,0.1,0.8",
                "Gadget Labs,CA,San Jose,False,0.2,0.7",
                "Third Row,WA,Seattle,False,0.3,0.6",
            ],
        );

        let config = DashboardConfig::new(dir.path().to_path_buf())
            .with_sources(vec![
                DataSource::new("main.csv", "2024").exclusive(),
                DataSource::new("recent.csv", "2025"),
            ])
            .with_backfill(Some(Backfill {
                year: "2025".to_string(),
                limit: 2,
            }));

        let dataset = load(&config).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.loaded_years, vec!["2024", "2025"]);
        assert_eq!(
            dataset
                .records
                .iter()
                .filter(|r| r.data_year == "2025")
                .count(),
            2
        );
    }

    #[test]
    fn test_sources_missing_columns_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.csv"), "Name,City\nAcme,Boston\n").unwrap();
        write_csv(dir.path(), "good.csv", &["Acme University,MA,Boston,True,0.9,0.95"]);

        let config = DashboardConfig::new(dir.path().to_path_buf())
            .with_sources(vec![
                DataSource::new("bad.csv", "2024"),
                DataSource::new("good.csv", "2024"),
            ])
            .with_backfill(None);

        let dataset = load(&config).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.sources[0].file, "good.csv");
    }

    #[test]
    fn test_no_sources_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::new(dir.path().to_path_buf());

        let err = load(&config).unwrap_err();
        assert!(err.to_string().contains("No valid data files found"));
    }
}
