// file: src/extractor/csv.rs
// description: CSV extraction with encoding fallback and type inference
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use crate::extractor::infer::infer_column;
use crate::models::{Column, Dataset};
use encoding_rs::WINDOWS_1252;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub struct CsvExtractor;

impl CsvExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Loads a delimited file into a typed [`Dataset`].
    ///
    /// Decodes as UTF-8 first, retrying with a Latin-1-compatible fallback
    /// on invalid byte sequences. Header row order is preserved as the
    /// column order.
    pub fn extract(&self, path: &Path) -> Result<Dataset> {
        let bytes = fs::read(path).map_err(|e| PipelineError::DataFormat {
            path: path.to_path_buf(),
            message: format!("cannot read file: {}", e),
        })?;

        let content = Self::decode(&bytes, path)?;
        self.parse(&content, path)
    }

    fn decode(bytes: &[u8], path: &Path) -> Result<String> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => {
                warn!(
                    "Invalid UTF-8 in {}, retrying with Windows-1252",
                    path.display()
                );
                let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
                if had_errors {
                    return Err(PipelineError::DataFormat {
                        path: path.to_path_buf(),
                        message: "file is not valid UTF-8 or Windows-1252 text".to_string(),
                    });
                }
                Ok(decoded.into_owned())
            }
        }
    }

    fn parse(&self, content: &str, path: &Path) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| PipelineError::DataFormat {
                path: path.to_path_buf(),
                message: format!("cannot parse header row: {}", e),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(PipelineError::EmptyDataset(format!(
                "{} has no columns",
                path.display()
            )));
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record.map_err(|e| PipelineError::DataFormat {
                path: path.to_path_buf(),
                message: format!("malformed row: {}", e),
            })?;
            for (idx, field) in record.iter().enumerate() {
                cells[idx].push(field.to_string());
            }
        }

        if cells[0].is_empty() {
            return Err(PipelineError::EmptyDataset(format!(
                "{} has a header but no data rows",
                path.display()
            )));
        }

        let columns: Vec<Column> = headers
            .iter()
            .zip(cells.iter())
            .map(|(name, column_cells)| infer_column(name, column_cells))
            .collect();

        let dataset = Dataset::new(columns)?;
        debug!(
            "Extracted {} rows x {} columns from {}",
            dataset.row_count(),
            dataset.column_count(),
            path.display()
        );

        Ok(dataset)
    }
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_extract_basic_csv() {
        let file = write_csv(b"Year,Sales,Category\n2020,100,A\n2021,150,B\n");
        let dataset = CsvExtractor::new().extract(file.path()).unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_names(), vec!["Year", "Sales", "Category"]);
        assert_eq!(
            dataset.column("Sales").unwrap().column_type(),
            ColumnType::Numeric
        );
        assert_eq!(
            dataset.column("Category").unwrap().column_type(),
            ColumnType::Categorical
        );
    }

    #[test]
    fn test_extract_latin1_fallback() {
        // "Café" with 0xE9, invalid as UTF-8.
        let file = write_csv(b"Name,Count\nCaf\xe9,3\n");
        let dataset = CsvExtractor::new().extract(file.path()).unwrap();

        assert_eq!(dataset.row_count(), 1);
        match &dataset.column("Name").unwrap().data {
            crate::models::ColumnData::Categorical(values) => {
                assert_eq!(values[0].as_deref(), Some("Café"));
            }
            other => panic!("expected categorical column, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_header_only_fails() {
        let file = write_csv(b"a,b,c\n");
        let err = CsvExtractor::new().extract(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset(_)));
    }

    #[test]
    fn test_extract_empty_file_fails() {
        let file = write_csv(b"");
        let err = CsvExtractor::new().extract(file.path()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::EmptyDataset(_) | PipelineError::DataFormat { .. }
        ));
    }

    #[test]
    fn test_extract_missing_file_fails() {
        let err = CsvExtractor::new()
            .extract(Path::new("/nonexistent/data.csv"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::DataFormat { .. }));
    }

    #[test]
    fn test_column_order_preserved() {
        let file = write_csv(b"z,a,m\n1,2,3\n");
        let dataset = CsvExtractor::new().extract(file.path()).unwrap();
        assert_eq!(dataset.column_names(), vec!["z", "a", "m"]);
    }
}
