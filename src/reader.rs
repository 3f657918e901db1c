//! Reader
//!
//! CSV loading and saving for schema-typed datasets. The delimiter is
//! detected by trying a fixed candidate list and keeping the first one that
//! yields a consistent multi-column table. Empty cells and unparseable
//! numbers are hard errors; validation policy lives in [`TableSchema`].
use crate::data::{Column, Dataset, FeatureKind};
use crate::errors::DriftwatchError;
use crate::schema::TableSchema;
use log::info;
use std::fs;
use std::path::Path;

const COMMON_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of leading records inspected per delimiter candidate.
const SNIFF_RECORDS: usize = 50;

fn detect_delimiter(raw: &str, path: &Path) -> Result<u8, DriftwatchError> {
    for delimiter in COMMON_DELIMITERS {
        let mut rdr = csv::ReaderBuilder::new().delimiter(delimiter).from_reader(raw.as_bytes());
        let width = match rdr.headers() {
            Ok(headers) => headers.len(),
            Err(_) => continue,
        };
        if width < 2 {
            continue;
        }
        let consistent = rdr
            .records()
            .take(SNIFF_RECORDS)
            .all(|record| matches!(record, Ok(r) if r.len() == width));
        if consistent {
            return Ok(delimiter);
        }
    }
    Err(DriftwatchError::DelimiterDetection(path.display().to_string()))
}

/// Load a dataset from a CSV file, typing columns by the schema and
/// validating the result against it.
pub fn read_csv<P: AsRef<Path>>(path: P, schema: &TableSchema) -> Result<Dataset, DriftwatchError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| DriftwatchError::UnableToRead(e.to_string()))?;
    let delimiter = detect_delimiter(&raw, path)?;
    info!("Loaded CSV {} using delimiter '{}'", path.display(), delimiter as char);

    let mut rdr = csv::ReaderBuilder::new().delimiter(delimiter).from_reader(raw.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| DriftwatchError::UnableToRead(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    // Columns the schema does not know about are read as categorical and
    // rejected by the validation pass below.
    let mut columns: Vec<Column> = headers
        .iter()
        .map(|name| match schema.kind_of(name) {
            Some(FeatureKind::Numerical) => Column::Numerical(Vec::new()),
            _ => Column::Categorical(Vec::new()),
        })
        .collect();

    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| DriftwatchError::UnableToRead(e.to_string()))?;
        if record.len() != headers.len() {
            return Err(DriftwatchError::UnableToRead(format!(
                "{}: row {} has {} fields, expected {}",
                path.display(),
                row + 1,
                record.len(),
                headers.len()
            )));
        }
        for (j, field) in record.iter().enumerate() {
            let field = field.trim();
            if field.is_empty() {
                return Err(DriftwatchError::NullValue(headers[j].clone(), row + 1));
            }
            match &mut columns[j] {
                Column::Numerical(values) => values.push(
                    field
                        .parse::<f64>()
                        .map_err(|_| DriftwatchError::InvalidNumericValue(field.to_string(), headers[j].clone()))?,
                ),
                Column::Categorical(values) => values.push(field.to_string()),
            }
        }
    }

    let dataset = Dataset::from_columns(headers.into_iter().zip(columns).collect())?;
    schema.validate(&dataset)?;
    Ok(dataset)
}

/// Write a dataset to a comma-separated file, creating parent directories.
pub fn write_csv<P: AsRef<Path>>(path: P, dataset: &Dataset) -> Result<(), DriftwatchError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DriftwatchError::UnableToWrite(e.to_string()))?;
    }
    let mut wtr = csv::Writer::from_path(path).map_err(|e| DriftwatchError::UnableToWrite(e.to_string()))?;
    wtr.write_record(dataset.names())
        .map_err(|e| DriftwatchError::UnableToWrite(e.to_string()))?;
    for row in 0..dataset.rows() {
        let record: Vec<String> = dataset
            .names()
            .iter()
            .map(|name| match dataset.column(name) {
                Some(Column::Numerical(values)) => values[row].to_string(),
                Some(Column::Categorical(values)) => values[row].clone(),
                None => unreachable!("names() only yields existing columns"),
            })
            .collect();
        wtr.write_record(&record)
            .map_err(|e| DriftwatchError::UnableToWrite(e.to_string()))?;
    }
    wtr.flush().map_err(|e| DriftwatchError::UnableToWrite(e.to_string()))
}
