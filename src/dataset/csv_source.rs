// src/dataset/csv_source.rs
use super::record::{ColumnMap, EmployerRecord};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

pub fn read_csv_file(path: &Path, year: &str, limit: Option<usize>) -> Result<Vec<EmployerRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    read_csv(file, year, limit).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Read employer rows from CSV text. Bails with the missing column names
/// when the header lacks a required column.
pub fn read_csv<R: Read>(reader: R, year: &str, limit: Option<usize>) -> Result<Vec<EmployerRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let columns = ColumnMap::from_headers(headers.iter());

    columns.ensure_required()?;

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        if limit.is_some_and(|limit| line >= limit) {
            break;
        }
        let row = row.with_context(|| format!("Malformed CSV row {}", line + 2))?;
        if let Some(record) = columns.build(|i| row.get(i), year) {
            records.push(record);
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Employer_Name,State,City,Classifications,Likely_Cap_Exempt,Cap_Exempt_Score,Approval_Rate,Total_Petitions,Data_Year
Acme University,MA,boston,\"university, education\",True,0.95,0.98,40,1999
City General Hospital,NY,New York,hospital,False,0.2,0.9,12.0,1999
,CA,Nowhere,,,,,,
";

    #[test]
    fn test_read_csv_assigns_source_year() {
        let records = read_csv(SAMPLE.as_bytes(), "2024", None).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.data_year == "2024"));

        let acme = &records[0];
        assert_eq!(acme.city.as_deref(), Some("boston"));
        assert_eq!(acme.classifications.as_deref(), Some("university, education"));
        assert_eq!(acme.likely_cap_exempt, Some(true));
        assert_eq!(acme.total_petitions, Some(40));

        let hospital = &records[1];
        assert_eq!(hospital.likely_cap_exempt, Some(false));
        assert_eq!(hospital.total_petitions, Some(12));
    }

    #[test]
    fn test_read_csv_honours_limit() {
        let records = read_csv(SAMPLE.as_bytes(), "2024", Some(1)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employer_name, "Acme University");
    }

    #[test]
    fn test_read_csv_rejects_missing_columns() {
        let err = read_csv("Name,City\nAcme,Boston\n".as_bytes(), "2024", None).unwrap_err();
        assert!(err.to_string().contains("Employer_Name"));
        assert!(err.to_string().contains("State"));
    }
}
