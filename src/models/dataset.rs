// file: src/models/dataset.rs
// description: in-memory tabular dataset with typed columns
// reference: internal data structures

use crate::error::{PipelineError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    DateTime,
    Categorical,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::DateTime => "datetime",
            ColumnType::Categorical => "categorical",
        }
    }
}

/// Column values of one inferred type. A `None` entry is a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    DateTime(Vec<Option<NaiveDateTime>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::DateTime(_) => ColumnType::DateTime,
            ColumnData::Categorical(_) => ColumnType::Categorical,
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::DateTime(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    /// Non-missing numeric values, in row order. Empty for other column types.
    pub fn numeric_values(&self) -> Vec<f64> {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().flatten().copied().collect(),
            _ => Vec::new(),
        }
    }
}

/// Ordered collection of named, typed columns sharing one row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Builds a dataset, enforcing unique column names and a uniform row count.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(|c| c.data.len()).unwrap_or(0);

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(PipelineError::Validation(format!(
                    "Duplicate column name: {}",
                    column.name
                )));
            }
            if column.data.len() != row_count {
                return Err(PipelineError::Validation(format!(
                    "Column {} has {} rows, expected {}",
                    column.name,
                    column.data.len(),
                    row_count
                )));
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.column_type() == ColumnType::Numeric)
            .collect()
    }

    pub fn categorical_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.column_type() == ColumnType::Categorical)
            .collect()
    }

    pub fn missing_total(&self) -> usize {
        self.columns.iter().map(|c| c.data.missing_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(name: &str, values: Vec<Option<f64>>) -> Column {
        Column::new(name, ColumnData::Numeric(values))
    }

    #[test]
    fn test_dataset_creation() {
        let dataset = Dataset::new(vec![
            numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::new(
                "b",
                ColumnData::Categorical(vec![Some("x".to_string()), None]),
            ),
        ])
        .unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.missing_total(), 1);
        assert_eq!(dataset.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Dataset::new(vec![
            numeric("a", vec![Some(1.0)]),
            numeric("a", vec![Some(2.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let result = Dataset::new(vec![
            numeric("a", vec![Some(1.0), Some(2.0)]),
            numeric("b", vec![Some(1.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_values_skip_missing() {
        let column = numeric("a", vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(column.numeric_values(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_typed_column_lookups() {
        let dataset = Dataset::new(vec![
            numeric("n", vec![Some(1.0)]),
            Column::new("c", ColumnData::Categorical(vec![Some("x".to_string())])),
        ])
        .unwrap();

        assert_eq!(dataset.numeric_columns().len(), 1);
        assert_eq!(dataset.categorical_columns().len(), 1);
        assert!(dataset.column("n").is_some());
        assert!(dataset.column("missing").is_none());
    }
}
