// src/export.rs
use crate::core::FsOps;
use crate::search::{DisplayRow, DISPLAY_COLUMNS};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// CSV read back from an export
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExport {
    pub columns: Vec<String>,
    pub rows: Vec<DisplayRow>,
}

/// Write rows as CSV. The header is always written, even for zero rows.
pub fn write_rows<W: Write>(writer: W, rows: &[DisplayRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer
        .write_record(DISPLAY_COLUMNS)
        .context("Failed to write CSV header")?;
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    Ok(())
}

pub fn to_csv_bytes(rows: &[DisplayRow]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, rows)?;
    Ok(buffer)
}

pub fn parse_rows<R: Read>(reader: R) -> Result<ParsedExport> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let columns = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = reader
        .deserialize::<DisplayRow>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to parse exported rows")?;

    Ok(ParsedExport { columns, rows })
}

/// `employers_<UTC timestamp>_<short id>.csv`
pub fn export_file_name() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "employers_{}_{}.csv",
        chrono::Utc::now().format("%Y%m%d_%H%M%S"),
        &id[..8]
    )
}

pub async fn export_to_dir(dir: &Path, rows: &[DisplayRow]) -> Result<PathBuf> {
    let bytes = to_csv_bytes(rows)?;
    let path = dir.join(export_file_name());

    FsOps::write_file_safe(&path, &bytes).await?;
    info!("Exported {} rows to {}", rows.len(), path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::EmployerRecord;

    fn rows() -> Vec<DisplayRow> {
        vec![
            DisplayRow::from(
                &EmployerRecord::new("Acme University, Inc.", "MA", "2024")
                    .with_city("Boston")
                    .with_scores(0.91234, 0.9)
                    .with_petitions(30),
            ),
            DisplayRow::from(&EmployerRecord::new("Widget \"Co\"", "TX", "2025")),
        ]
    }

    #[test]
    fn test_export_round_trip_keeps_rows_and_columns() {
        let rows = rows();
        let bytes = to_csv_bytes(&rows).unwrap();
        let parsed = parse_rows(bytes.as_slice()).unwrap();

        assert_eq!(parsed.columns, DISPLAY_COLUMNS.to_vec());
        assert_eq!(parsed.rows.len(), rows.len());
        assert_eq!(parsed.rows, rows);
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let bytes = to_csv_bytes(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.trim_end(),
            "Employer Name,City,State,Cap-Exempt Score,Approval Rate,Total Petitions,Year"
        );
        assert!(parse_rows(text.as_bytes()).unwrap().rows.is_empty());
    }

    #[test]
    fn test_export_file_name_shape() {
        let name = export_file_name();
        assert!(name.starts_with("employers_"));
        assert!(name.ends_with(".csv"));
        assert_ne!(name, export_file_name());
    }

    #[tokio::test]
    async fn test_export_to_dir_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");

        let path = export_to_dir(&target, &rows()).await.unwrap();
        assert!(path.starts_with(&target));

        let parsed = parse_rows(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
    }
}
