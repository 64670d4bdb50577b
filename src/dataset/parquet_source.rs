// src/dataset/parquet_source.rs
use super::record::{ColumnMap, EmployerRecord};
use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;

const BATCH_SIZE: usize = 8192;

/// Read employer rows from a Parquet file. Every recognised column is cast
/// to UTF-8 so CSV and Parquet rows share the same cell parsing.
pub fn read_parquet_file(
    path: &Path,
    year: &str,
    limit: Option<usize>,
) -> Result<Vec<EmployerRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("Failed to read Parquet metadata from {}", path.display()))?;

    let columns = ColumnMap::from_headers(
        builder
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().as_str()),
    );

    columns.ensure_required()?;

    let reader = builder
        .with_batch_size(BATCH_SIZE)
        .build()
        .with_context(|| format!("Failed to open Parquet reader for {}", path.display()))?;

    let mut records = Vec::new();
    let mut rows_seen = 0usize;

    'batches: for batch in reader {
        let batch = batch.with_context(|| format!("Failed to decode batch in {}", path.display()))?;

        let mut text_columns: Vec<Option<ArrayRef>> = vec![None; batch.num_columns()];
        for index in columns.used_indices() {
            let as_text = cast(batch.column(index), &DataType::Utf8)
                .with_context(|| format!("Column {} cannot be read as text", index))?;
            text_columns[index] = Some(as_text);
        }

        for row in 0..batch.num_rows() {
            if limit.is_some_and(|limit| rows_seen >= limit) {
                break 'batches;
            }
            rows_seen += 1;

            let cell = |index: usize| -> Option<&str> {
                let array = text_columns.get(index)?.as_ref()?.as_string::<i32>();
                if array.is_null(row) {
                    None
                } else {
                    Some(array.value(row))
                }
            };

            if let Some(record) = columns.build(cell, year) {
                records.push(record);
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    fn write_sample(path: &Path) {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Employer_Name", DataType::Utf8, true),
            Field::new("State", DataType::Utf8, true),
            Field::new("Likely_Cap_Exempt", DataType::Boolean, true),
            Field::new("Cap_Exempt_Score", DataType::Float64, true),
            Field::new("Total_Petitions", DataType::Int64, true),
        ]));

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![
                    Some("Acme University"),
                    Some("Widget Co"),
                    None,
                ])),
                Arc::new(StringArray::from(vec![Some("MA"), Some("TX"), Some("CA")])),
                Arc::new(BooleanArray::from(vec![Some(true), Some(false), None])),
                Arc::new(Float64Array::from(vec![Some(0.9), None, Some(0.1)])),
                Arc::new(Int64Array::from(vec![Some(40), Some(3), None])),
            ],
        )
        .unwrap();

        let file = File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_read_parquet_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employers.parquet");
        write_sample(&path);

        let records = read_parquet_file(&path, "2024", None).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].employer_name, "Acme University");
        assert_eq!(records[0].likely_cap_exempt, Some(true));
        assert_eq!(records[0].cap_exempt_score, Some(0.9));
        assert_eq!(records[0].total_petitions, Some(40));
        assert_eq!(records[0].data_year, "2024");

        assert_eq!(records[1].likely_cap_exempt, Some(false));
        assert_eq!(records[1].cap_exempt_score, None);
    }

    #[test]
    fn test_read_parquet_file_honours_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employers.parquet");
        write_sample(&path);

        let records = read_parquet_file(&path, "2024", Some(1)).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_corrupt_parquet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.parquet");
        std::fs::write(&path, b"not parquet").unwrap();

        assert!(read_parquet_file(&path, "2024", None).is_err());
    }
}
